// src/config.rs
use clap::Args;
use reqwest::Url;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the bearer credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment fallback for `--endpoint`
pub const ENDPOINT_VAR: &str = "OPENAI_API_URL";

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4-vision-preview";
pub const DEFAULT_PROMPT: &str =
    "I've uploaded an image and I'd like to know what it depicts and any interesting details you can provide.";
pub const DEFAULT_MAX_TOKENS: u32 = 4095;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set the {} environment variable.", API_KEY_VAR)]
    MissingApiKey,

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Bearer credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Inference flags shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct InferenceOptions {
    /// Chat completions endpoint (falls back to $OPENAI_API_URL)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name sent with every request
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Instruction sent alongside the image
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Upper bound on the length of the generated description
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Total time allowed for one inference request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Process-wide settings. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    /// Resolve settings from the process environment
    pub fn from_env(options: InferenceOptions) -> Result<Self, ConfigError> {
        Self::resolve(options, |name| std::env::var(name).ok())
    }

    /// Resolve settings, reading environment variables through `lookup`
    pub fn resolve<F>(options: InferenceOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = options
            .endpoint
            .or_else(|| lookup(ENDPOINT_VAR))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        match Url::parse(&endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "endpoint",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                })
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "endpoint",
                    reason: e.to_string(),
                })
            }
        }

        if options.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "model",
                reason: "must not be empty".to_string(),
            });
        }
        if options.prompt.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "prompt",
                reason: "must not be empty".to_string(),
            });
        }
        if options.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max-tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if options.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout-secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            api_key: ApiKey(api_key),
            endpoint,
            model: options.model,
            prompt: options.prompt,
            max_tokens: options.max_tokens,
            timeout: Duration::from_secs(options.timeout_secs),
            connect_timeout: CONNECT_TIMEOUT,
        })
    }
}
