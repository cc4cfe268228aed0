// src/ai/protocol.rs
// Wire types for the chat completions endpoint. Only the fields this tool
// sends or reads are modelled.

use serde::{Deserialize, Serialize};

use crate::imaging::encoder::EncodedImage;

/// Request body. Borrows model and prompt from the config, owns the data URI.
#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: String },
}

impl<'a> ChatRequest<'a> {
    /// Single user turn: the prompt followed by the image
    pub fn new(model: &'a str, prompt: &'a str, max_tokens: u32, image: &EncodedImage) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: image.data_uri(),
                    },
                ],
            }],
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if there is one
    pub fn into_first_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|choice| choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::encoder::encode_to_base64;
    use image::{DynamicImage, RgbImage};
    use serde_json::json;

    #[test]
    fn request_serializes_to_the_documented_shape() {
        let image = encode_to_base64(&DynamicImage::ImageRgb8(RgbImage::new(2, 2))).unwrap();

        let body = serde_json::to_value(ChatRequest::new("gpt-4-vision-preview", "What is this?", 4095, &image)).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4-vision-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "What is this?" },
                        { "type": "image_url", "image_url": image.data_uri() }
                    ]
                }],
                "max_tokens": 4095
            })
        );
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" } },
                { "index": 1, "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();

        assert_eq!(response.into_first_content().as_deref(), Some("first"));
    }

    #[test]
    fn empty_choices_or_null_content_yield_nothing() {
        let empty: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        let null: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] })).unwrap();

        assert_eq!(empty.into_first_content(), None);
        assert_eq!(null.into_first_content(), None);
    }
}
