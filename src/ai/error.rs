// src/ai/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Text shown when the upstream answered 200 but not with a usable completion
pub const RESPONSE_SHAPE_SENTINEL: &str = "Error processing the image response.";

/// Everything that can go wrong between a bitmap and its description
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("failed to encode image: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("request to the inference endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Error: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("{}", RESPONSE_SHAPE_SENTINEL)]
    MalformedResponse { detail: String },
}

impl DescribeError {
    /// Stable machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            DescribeError::Encoding(_) => "encoding",
            DescribeError::Transport(_) => "transport",
            DescribeError::Upstream { .. } => "upstream",
            DescribeError::MalformedResponse { .. } => "malformed_response",
        }
    }

    /// HTTP status the endpoint answered with, for upstream failures
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            DescribeError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DescribeError::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_displays_raw_body() {
        let err = DescribeError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "server error".to_string(),
        };

        assert_eq!(err.to_string(), "Error: server error");
        assert_eq!(err.kind(), "upstream");
        assert_eq!(err.upstream_status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!err.is_timeout());
    }

    #[test]
    fn malformed_response_displays_sentinel_not_detail() {
        let err = DescribeError::MalformedResponse {
            detail: "missing field `choices`".to_string(),
        };

        assert_eq!(err.to_string(), "Error processing the image response.");
        assert_eq!(err.kind(), "malformed_response");
        assert_eq!(err.upstream_status(), None);
    }
}
