// src/ai/connector.rs
use super::error::DescribeError;
use crate::imaging::encoder::EncodedImage;

/// Trait defining the interface for image description backends
#[cfg_attr(test, mockall::automock)]
pub trait VisionConnector: Send + Sync {
    /// Send an encoded image and return the model's description
    fn describe_image(&self, image: &EncodedImage) -> Result<String, DescribeError>;
}
