// src/ai/openai_vision.rs
use anyhow::Result;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::connector::VisionConnector;
use super::error::DescribeError;
use super::protocol::{ChatRequest, ChatResponse};
use crate::config::Config;
use crate::imaging::encoder::EncodedImage;

// Image description through an OpenAI-style chat completions endpoint.
// No retries: every failure is reported to the caller on first occurrence.
pub struct OpenAiVision {
    config: Config,
    client: Client,
}

impl OpenAiVision {
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing vision model: {} at {}", config.model, config.endpoint);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    //Build a fresh request body for one image
    pub fn build_request(&self, image: &EncodedImage) -> ChatRequest<'_> {
        ChatRequest::new(&self.config.model, &self.config.prompt, self.config.max_tokens, image)
    }
}

/// Pull `choices[0].message.content` out of a 200 response body
fn parse_completion(body: &str) -> Result<String, DescribeError> {
    let malformed = |detail: String| {
        warn!("Error in JSON structure: {}", detail);
        warn!("Full JSON response: {}", body);
        DescribeError::MalformedResponse { detail }
    };

    let response: ChatResponse = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    response
        .into_first_content()
        .ok_or_else(|| malformed("no message content in first choice".to_string()))
}

impl VisionConnector for OpenAiVision {
    fn describe_image(&self, image: &EncodedImage) -> Result<String, DescribeError> {
        info!("Processing image with model: {}", self.config.model);

        let request = self.build_request(image);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose())
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Request timed out after {:?}", self.config.timeout);
                } else {
                    warn!("Inference request failed: {}", e);
                }
                DescribeError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().map_err(DescribeError::Transport)?;

        if status != StatusCode::OK {
            warn!("Inference endpoint responded with status {}: {}", status.as_u16(), body);
            return Err(DescribeError::Upstream { status, body });
        }

        debug!("Response JSON: {}", body);
        parse_completion(&body)
    }
}
