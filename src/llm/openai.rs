//! Hosted completion backend speaking the OpenAI chat-completions API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Completion, CompletionBackend, DegradedCause, UNAVAILABLE_TEXT};

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 800;

const SYSTEM_PROMPT: &str = "You are FloatChat, an expert oceanographic assistant. You interpret ARGO \
float measurements (temperature, salinity, pressure, position) and answer \
conversationally but with scientific accuracy, always using appropriate units.";

pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl OpenAiBackend {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build OpenAI HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    async fn chat(&self, prompt: &str) -> Result<String, DegradedCause> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        debug!(model = %self.model, "Calling chat-completions API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DegradedCause::Timeout
                } else {
                    DegradedCause::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DegradedCause::Transport(e.to_string()))?;
        if status != 200 {
            return Err(DegradedCause::Api { status, body: text });
        }
        parse_chat_response(&text)
    }
}

/// Extract the first choice's message content.
fn parse_chat_response(raw: &str) -> Result<String, DegradedCause> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DegradedCause::Malformed(e.to_string()))?;
    value["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_owned())
        .ok_or_else(|| DegradedCause::Malformed("no choices[0].message.content".to_owned()))
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Completion {
        match self.chat(prompt).await {
            Ok(text) => Completion::Generated(text),
            Err(cause) => {
                warn!(error = %cause, "Chat-completions call degraded to fallback text");
                Completion::Degraded {
                    text: UNAVAILABLE_TEXT,
                    cause,
                }
            }
        }
    }
}
