//! Chat provider trait and message types

use base64::Engine;
use serde::Serialize;

use crate::error::LlmError;

/// Sampling temperature used for every completion
pub const TEMPERATURE: f32 = 0.7;
/// Output token ceiling used for every completion
pub const MAX_TOKENS: u32 = 2000;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Single chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

/// Message body: plain text, or a list of parts for vision requests
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Part of a multi-part message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying an inline image as a base64 data URL
    pub fn user_with_image(text: impl Into<String>, image: &[u8], mime_type: &str) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        Self {
            role: ChatRole::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:{};base64,{}", mime_type, encoded),
                    },
                },
            ]),
        }
    }
}

/// Chat completion provider trait
#[trait_variant::make(ChatProvider: Send)]
pub trait LocalChatProvider {
    /// Run one completion and return the reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Get model name
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_shape() {
        let value = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be brief");
    }

    #[test]
    fn test_image_message_shape() {
        let msg = ChatMessage::user_with_image("look", &[0xff, 0xd8], "image/jpeg");
        let value = serde_json::to_value(msg).unwrap();

        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "look");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(value["content"][1]["image_url"]["url"], "data:image/jpeg;base64,/9g=");
    }
}
