//! Completion backends.
//!
//! One backend is built from config at process start; the chat pipeline only
//! sees the `CompletionBackend` trait object, so local vs hosted is never a
//! per-call branch. Backend failures are converted into a `Degraded`
//! completion carrying a fixed human-readable text — a chat request must
//! never turn into an HTTP error just because the model was unreachable.

pub mod ollama;
pub mod openai;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AiMode, Config};

/// Shown when the backend cannot be reached or answers with garbage.
pub const UNAVAILABLE_TEXT: &str =
    "Sorry, I couldn't reach the language model right now. Please try again in a moment.";

/// Shown when the local model exceeds its request timeout.
pub const TIMEOUT_TEXT: &str =
    "The model is taking too long to respond. Please try again in a moment.";

/// Outcome of a completion call. `Degraded` keeps the conversation going
/// with fallback text while still exposing why the real reply is missing.
#[derive(Debug, Clone)]
pub enum Completion {
    Generated(String),
    Degraded {
        text: &'static str,
        cause: DegradedCause,
    },
}

impl Completion {
    pub fn text(&self) -> &str {
        match self {
            Completion::Generated(text) => text,
            Completion::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Completion::Degraded { .. })
    }
}

#[derive(Debug, Clone, Error)]
pub enum DegradedCause {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate text for `prompt`. Infallible by design: errors degrade into
    /// fallback text instead of propagating.
    async fn complete(&self, prompt: &str) -> Completion;
}

/// Build the configured backend. Called once from `main`.
pub fn from_config(config: &Config) -> Result<Arc<dyn CompletionBackend>> {
    let backend: Arc<dyn CompletionBackend> = match config.ai_mode {
        AiMode::Local => Arc::new(ollama::OllamaBackend::new(
            &config.ollama_url,
            &config.ollama_model,
        )?),
        AiMode::Hosted => Arc::new(openai::OpenAiBackend::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
        )?),
    };
    Ok(backend)
}
