use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::warn;

use super::persist::ConversationFile;
use super::store::{ConversationStore, Role};
use crate::api::dto::ChatReply;

/// Placeholder bubble shown while a reply is in flight.
pub const PENDING_TEXT: &str = "Thinking...";

/// Substituted for the placeholder when the request is rejected.
pub const SEND_FAILED_TEXT: &str = "Failed to get a response. Please try again.";

/// Seam between the chat surface and the server, so the send flow is
/// testable without a network.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// Real transport: `POST /api/chat` against a running FloatChat server.
pub struct HttpChatTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let reply = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .context("chat request failed")?
            .error_for_status()
            .context("chat endpoint returned error status")?
            .json::<ChatReply>()
            .await
            .context("failed to deserialize chat reply")?;
        Ok(reply.reply)
    }
}

/// Drives the optimistic send flow over the store: append the user message
/// and a pending placeholder, persist, call the server, replace the
/// placeholder in place, persist again.
pub struct ChatSession<T: ChatTransport> {
    store: ConversationStore,
    file: ConversationFile,
    transport: T,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Restore (or freshly create) the conversation collection from disk.
    pub async fn open(file: ConversationFile, transport: T) -> Self {
        let store = file.load().await;
        Self {
            store,
            file,
            transport,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub async fn new_conversation(&mut self) -> String {
        let id = self.store.create_conversation();
        self.file.save(&self.store).await;
        id
    }

    pub async fn delete_conversation(&mut self, id: &str) {
        self.store.delete_conversation(id);
        self.file.save(&self.store).await;
    }

    /// Send `text` in the active conversation and return the final reply
    /// text (the model's answer, or `SEND_FAILED_TEXT` when the request was
    /// rejected — the conversation continues either way).
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let conversation_id = self.store.active_id().to_owned();
        if self
            .store
            .append_message(&conversation_id, Role::User, text)
            .is_none()
        {
            bail!("active conversation vanished mid-send");
        }
        let Some(pending_id) = self
            .store
            .append_message(&conversation_id, Role::Bot, PENDING_TEXT)
        else {
            bail!("active conversation vanished mid-send");
        };
        self.file.save(&self.store).await;

        let reply = match self.transport.send(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "send failed; replacing placeholder with error text");
                SEND_FAILED_TEXT.to_owned()
            }
        };

        self.store
            .replace_message(&conversation_id, &pending_id, reply.clone());
        self.file.save(&self.store).await;
        Ok(reply)
    }
}
