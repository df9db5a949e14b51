use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::data::DataService;
use crate::llm::{Completion, CompletionBackend};
use crate::prompt;

/// Rows of context embedded in every prompt.
pub const RECENT_MEASUREMENT_LIMIT: i64 = 5;

/// The request-augmentation pipeline: aggregate → render → complete.
#[derive(Clone)]
pub struct ChatService {
    data: DataService,
    backend: Arc<dyn CompletionBackend>,
}

impl ChatService {
    pub fn new(data: DataService, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { data, backend }
    }

    /// Answer one chat message. Database failures propagate; completion
    /// failures come back as a degraded `Completion` so the caller can still
    /// return a reply.
    pub async fn respond(&self, message: &str) -> Result<Completion> {
        let stats = self.data.dataset_stats().await?;
        let recent = self
            .data
            .recent_measurements(RECENT_MEASUREMENT_LIMIT)
            .await?;

        let rendered = prompt::render(message, &stats, &recent);
        let completion = self.backend.complete(&rendered).await;

        info!(
            prompt_chars = rendered.len(),
            degraded = completion.is_degraded(),
            "Chat exchange completed"
        );
        Ok(completion)
    }
}
