// src/server/mod.rs
// The browser-facing side: one page with an upload control and a text area,
// plus the JSON route that page posts to.

use crate::ai::connector::VisionConnector;
use crate::ai::error::DescribeError;
use actix_web::error::BlockingError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use thiserror::Error;

mod protocol;
pub mod routes;

use protocol::{ErrorBody, ErrorDetail};

#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    InvalidUpload(String),

    #[error(transparent)]
    Describe(#[from] DescribeError),

    #[error("background task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl WebError {
    pub fn kind(&self) -> &'static str {
        match self {
            WebError::InvalidUpload(_) => "invalid_upload",
            WebError::Describe(e) => e.kind(),
            WebError::Blocking(_) => "internal",
        }
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            WebError::Describe(e) => e.upstream_status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl actix_web::error::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(ErrorBody {
                error: ErrorDetail {
                    kind: self.kind(),
                    message: self.to_string(),
                    upstream_status: self.upstream_status(),
                },
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            WebError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            WebError::Describe(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            WebError::Describe(DescribeError::Encoding(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Describe(_) => StatusCode::BAD_GATEWAY,
            WebError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Run the HTTP server until it is shut down
pub async fn serve(connector: Arc<dyn VisionConnector>, host: &str, port: u16) -> std::io::Result<()> {
    let connector = web::Data::from(connector);
    let limit = web::Data::new(routes::UploadLimit::default());

    HttpServer::new(move || {
        App::new()
            .app_data(connector.clone())
            .app_data(limit.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
