// src/server/routes.rs
use super::protocol::DescribeResponse;
use super::WebError;
use crate::ai::connector::VisionConnector;
use crate::imaging::encoder;
use crate::pipeline;
use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse, Responder};
use futures_util::StreamExt;
use log::{error, info};

type Result<T> = std::result::Result<T, WebError>;

/// Name of the multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Refuse uploads larger than this
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Upload size cap, registered as app data. Falls back to `MAX_UPLOAD_BYTES`.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

impl Default for UploadLimit {
    fn default() -> Self {
        Self(MAX_UPLOAD_BYTES)
    }
}

fn too_large(limit: usize) -> WebError {
    if limit >= 1024 * 1024 {
        WebError::InvalidUpload(format!("image is larger than {} MiB", limit / (1024 * 1024)))
    } else {
        WebError::InvalidUpload(format!("image is larger than {} bytes", limit))
    }
}

const INDEX_HTML: &str = include_str!("index.html");

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(describe);
}

/// The single page UI
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().insert_header(ContentType::html()).body(INDEX_HTML)
}

/// Describe the uploaded image. The blocking encode + upstream call runs on
/// the blocking pool.
#[post("/describe")]
pub async fn describe(
    mut payload: Multipart,
    connector: web::Data<dyn VisionConnector>,
    limit: Option<web::Data<UploadLimit>>,
) -> Result<web::Json<DescribeResponse>> {
    let UploadLimit(limit) = limit.map(|l| *l.get_ref()).unwrap_or_default();
    let mut upload: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            error!("Error reading multipart field: {}", e);
            WebError::InvalidUpload(format!("invalid multipart data: {e}"))
        })?;

        if field.name() != Some(IMAGE_FIELD) {
            while field.next().await.is_some() {}
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| WebError::InvalidUpload(format!("error reading upload: {e}")))?;
            if data.len() + bytes.len() > limit {
                return Err(too_large(limit));
            }
            data.extend_from_slice(&bytes);
        }
        upload = Some(data);
    }

    let bytes = match upload {
        Some(data) if !data.is_empty() => data,
        _ => return Err(WebError::InvalidUpload("no image provided".to_string())),
    };

    let connector = connector.into_inner();
    let description = web::block(move || -> Result<String> {
        let bitmap = encoder::decode_upload(&bytes)
            .map_err(|e| WebError::InvalidUpload(format!("could not read image: {e}")))?;
        Ok(pipeline::describe_bitmap(connector.as_ref(), &bitmap)?)
    })
    .await??;

    info!("finished serving description request");

    Ok(web::Json(DescribeResponse { description }))
}
