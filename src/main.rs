// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::connector::VisionConnector;
use crate::ai::openai_vision::OpenAiVision;
use crate::config::{Config, InferenceOptions};

mod ai;
mod config;
mod imaging;
mod pipeline;
mod server;

#[derive(Parser)]
#[command(name = "visiondesk")]
#[command(about = "Describe images with a vision-capable chat model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the upload page
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, short = 'p', default_value_t = 7860)]
        port: u16,

        #[command(flatten)]
        inference: InferenceOptions,
    },
    /// Describe a single image file and print the result
    Describe {
        /// Image file to describe
        path: PathBuf,

        #[command(flatten)]
        inference: InferenceOptions,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info")
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, inference } => {
            run_server(host, port, inference)
        }
        Commands::Describe { path, inference } => {
            run_describe(path, inference)
        }
    }
}

// The blocking HTTP client must be built outside the async runtime, so this
// happens before the server starts.
fn build_connector(inference: InferenceOptions) -> Result<OpenAiVision> {
    let config = Config::from_env(inference).context("configuration error")?;
    OpenAiVision::new(config)
}

fn run_server(host: String, port: u16, inference: InferenceOptions) -> Result<()> {
    let connector: Arc<dyn VisionConnector> = Arc::new(build_connector(inference)?);

    info!("Serving upload page on http://{}:{}", host, port);
    actix_web::rt::System::new()
        .block_on(server::serve(Arc::clone(&connector), &host, port))
        .with_context(|| format!("server on {}:{} failed", host, port))?;

    Ok(())
}

fn run_describe(path: PathBuf, inference: InferenceOptions) -> Result<()> {
    let connector = build_connector(inference)?;

    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let bitmap = imaging::encoder::decode_upload(&bytes)
        .with_context(|| format!("{} is not a readable image", path.display()))?;

    info!("Describing {} with {}", path.display(), connector.config().model);

    match pipeline::describe_bitmap(&connector, &bitmap) {
        Ok(description) => {
            println!("\n=== Description ({}) ===", connector.config().model);
            println!("{}", description);
            println!("===========================================\n");
            Ok(())
        }
        Err(e) => {
            match e.upstream_status() {
                Some(status) => error!("Image description failed ({}, status {}): {}", e.kind(), status, e),
                None => error!("Image description failed ({}): {}", e.kind(), e),
            }
            Err(e).context("image description failed")
        }
    }
}
