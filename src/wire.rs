//! Wire types for the upstream chat-completion API.
//!
//! Only the request side is typed. The response is deliberately left as
//! `serde_json::Value`: providers disagree on envelope shape, and
//! normalizing that is the job of [`crate::extract`].

use serde::Serialize;

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const CHAT_COMPLETIONS: &str = "/chat/completions";
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chat_request_serializes_openai_style() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage::system("You are a novelist."),
                ChatMessage::user("Write."),
            ],
            max_tokens: 2048,
            temperature: 0.9,
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Write.");
        assert_eq!(value["stream"], false);
    }
}
