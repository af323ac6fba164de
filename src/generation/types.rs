//! Ollama chat API wire types

use serde::{Deserialize, Serialize};

/// Marker appended to the prompt when the user allows unsafe commands.
///
/// This is only a hint to the model's system prompt; nothing on our side
/// enforces it.
pub const UNSAFE_MARKER: &str = " --unsafe";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// Single-turn, non-streaming request for one command
    pub fn command(model: &str, prompt: &str, allow_unsafe: bool) -> Self {
        let content = if allow_unsafe {
            format!("{}{}", prompt, UNSAFE_MARKER)
        } else {
            prompt.to_string()
        };
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(content)],
            stream: false,
        }
    }
}

/// Response of `POST /api/chat` (only the fields we read)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: Option<ChatMessage>,
}
