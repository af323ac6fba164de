//! Command generation through a local language model

mod client;
mod types;

pub use client::{CommandGenerator, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, GenerationError, OllamaClient};
pub use types::{ChatMessage, ChatRequest, ChatResponse, UNSAFE_MARKER};
