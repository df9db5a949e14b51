//! Local completion backend speaking the Ollama generate API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Completion, CompletionBackend, DegradedCause, TIMEOUT_TEXT, UNAVAILABLE_TEXT};

/// Hard ceiling on a single generate call. A cold model can take a while to
/// load; past this we give up and answer with `TIMEOUT_TEXT`.
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 5;

const TEMPERATURE: f64 = 0.7;
const NUM_PREDICT: u32 = 500;

pub struct OllamaBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build Ollama HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, DegradedCause> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: NUM_PREDICT,
            },
        };
        debug!(model = %self.model, url = %url, "Calling Ollama");

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                DegradedCause::Timeout
            } else {
                DegradedCause::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DegradedCause::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| DegradedCause::Malformed(e.to_string()))?;
        Ok(parsed.response.trim().to_owned())
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Completion {
        match self.generate(prompt).await {
            Ok(text) => Completion::Generated(text),
            Err(cause) => {
                warn!(error = %cause, "Ollama call degraded to fallback text");
                let text = match cause {
                    DegradedCause::Timeout => TIMEOUT_TEXT,
                    _ => UNAVAILABLE_TEXT,
                };
                Completion::Degraded { text, cause }
            }
        }
    }
}
