// src/server/protocol.rs
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// Body of every failed `/describe` call
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
    /// Status returned by the inference endpoint, when it answered with an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}
