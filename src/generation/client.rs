//! Blocking HTTP client for a local Ollama server.

use std::time::Duration;

use super::types::{ChatRequest, ChatResponse};

/// Default Ollama server URL
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model name
pub const DEFAULT_MODEL: &str = "cmdgen";

/// Errors from a generation attempt
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Failed to reach {url}: {message}")]
    Network { url: String, message: String },

    #[error("Inference server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Anything that can turn a prompt into raw model text
pub trait CommandGenerator: Send + Sync {
    /// Raw model output for `prompt`, empty when the model produced nothing
    fn generate(&self, prompt: &str, allow_unsafe: bool) -> Result<String, GenerationError>;
}

/// Client for `POST /api/chat` and `GET /api/tags`
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    agent: ureq::Agent,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build();

        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat request and return the assistant's raw content.
    ///
    /// Whitespace-only content is returned as an empty string. No retries.
    pub fn generate_raw(&self, prompt: &str, allow_unsafe: bool) -> Result<String, GenerationError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest::command(&self.model, prompt, allow_unsafe);

        tracing::debug!("POST {} (model {})", url, self.model);

        let response = self
            .agent
            .post(&url)
            .send_json(&request)
            .map_err(|e| map_ureq_error(&url, e))?;

        let body: ChatResponse = response
            .into_json()
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let message = body
            .message
            .ok_or_else(|| GenerationError::Malformed("response has no message".to_string()))?;

        if message.content.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(message.content)
    }

    /// True if `GET /api/tags` answers with a 2xx status
    pub fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.agent.get(&url).call() {
            Ok(response) => (200..300).contains(&response.status()),
            Err(e) => {
                tracing::debug!("Availability probe failed: {}", e);
                false
            }
        }
    }
}

impl CommandGenerator for OllamaClient {
    fn generate(&self, prompt: &str, allow_unsafe: bool) -> Result<String, GenerationError> {
        self.generate_raw(prompt, allow_unsafe)
    }
}

fn map_ureq_error(url: &str, error: ureq::Error) -> GenerationError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            GenerationError::Status {
                status,
                body: body.chars().take(200).collect(),
            }
        }
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                GenerationError::Timeout {
                    url: url.to_string(),
                }
            } else {
                GenerationError::Network {
                    url: url.to_string(),
                    message: transport.to_string(),
                }
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        source = err.source();
    }
    transport.to_string().contains("timed out")
}
