//! Persistence adapter for the conversation store.
//!
//! One JSON document holding the serialized array of conversations, written
//! after every transition. Writes are best-effort: a failed save is logged
//! and swallowed, it must never interrupt the chat flow. Loads tolerate an
//! absent or corrupt file by falling back to a single fresh conversation.

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, warn};

use super::store::{Conversation, ConversationStore};

#[derive(Debug, Clone)]
pub struct ConversationFile {
    path: PathBuf,
}

impl ConversationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the current conversation collection to disk.
    pub async fn save(&self, store: &ConversationStore) {
        let json = match serde_json::to_vec_pretty(store.conversations()) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "conversations: failed to serialize, skipping save");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    warn!(path = %self.path.display(), error = %e, "conversations: failed to create directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(&self.path, &json).await {
            warn!(path = %self.path.display(), error = %e, "conversations: failed to write history");
        } else {
            debug!(path = %self.path.display(), bytes = json.len(), "conversations: saved");
        }
    }

    /// Restore the store, or start fresh when nothing valid is on disk.
    pub async fn load(&self) -> ConversationStore {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "conversations: no history file, starting fresh");
                return ConversationStore::new();
            }
        };

        match serde_json::from_slice::<Vec<Conversation>>(&bytes) {
            Ok(conversations) => ConversationStore::from_conversations(conversations),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "conversations: corrupt history, starting fresh");
                ConversationStore::new()
            }
        }
    }
}
