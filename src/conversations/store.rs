use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "New chat";

/// Characters of the first user message promoted into the title.
pub const TITLE_PREFIX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    fn fresh() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_owned(),
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Ordered collection of conversations plus the active selection.
///
/// Every method is a synchronous in-memory transition; persistence is a
/// separate adapter so this state machine is testable without I/O.
/// Invariant: at least one conversation always exists and `active_id`
/// always names one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: String,
}

impl ConversationStore {
    /// A store holding a single fresh conversation — the first-load state,
    /// also used as the fallback when persisted state is absent or corrupt.
    pub fn new() -> Self {
        let conversation = Conversation::fresh();
        let active_id = conversation.id.clone();
        Self {
            conversations: vec![conversation],
            active_id,
        }
    }

    /// Restore from a previously persisted collection. An empty collection
    /// falls back to a single fresh conversation; the first conversation
    /// becomes active.
    pub fn from_conversations(conversations: Vec<Conversation>) -> Self {
        match conversations.first() {
            Some(first) => {
                let active_id = first.id.clone();
                Self {
                    conversations,
                    active_id,
                }
            }
            None => Self::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Conversation {
        self.conversations
            .iter()
            .find(|c| c.id == self.active_id)
            .unwrap_or(&self.conversations[0])
    }

    /// Select `id` if it exists; returns whether the selection changed.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.conversations.iter().any(|c| c.id == id) {
            self.active_id = id.to_owned();
            true
        } else {
            false
        }
    }

    /// Start a new conversation at the top of the list and select it.
    pub fn create_conversation(&mut self) -> String {
        let conversation = Conversation::fresh();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_id = id.clone();
        id
    }

    /// Remove a conversation. Deleting the last one immediately replaces it
    /// with a fresh conversation, so the store never goes empty.
    pub fn delete_conversation(&mut self, id: &str) {
        self.conversations.retain(|c| c.id != id);
        if self.conversations.is_empty() {
            let conversation = Conversation::fresh();
            self.active_id = conversation.id.clone();
            self.conversations.push(conversation);
        } else if self.active_id == id {
            self.active_id = self.conversations[0].id.clone();
        }
    }

    /// Append a message; returns its id, or `None` for an unknown
    /// conversation. The first user message renames a still-untitled
    /// conversation to its 40-character prefix.
    pub fn append_message(
        &mut self,
        conversation_id: &str,
        role: Role,
        text: impl Into<String>,
    ) -> Option<String> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)?;

        let text = text.into();
        if role == Role::User && conversation.title == DEFAULT_TITLE {
            conversation.title = title_prefix(&text);
        }

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            text,
            timestamp: Utc::now(),
        };
        let id = message.id.clone();
        conversation.messages.push(message);
        conversation.updated_at = Utc::now();
        Some(id)
    }

    /// Replace a message's text in place (the pending-placeholder swap).
    /// Returns whether a message was updated.
    pub fn replace_message(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        text: impl Into<String>,
    ) -> bool {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            return false;
        };
        let Some(message) = conversation
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
        else {
            return false;
        };
        message.text = text.into();
        conversation.updated_at = Utc::now();
        true
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn title_prefix(text: &str) -> String {
    // Char-based, not byte-based: a multibyte message must not split.
    text.chars().take(TITLE_PREFIX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_exactly_one_fresh_conversation() {
        let store = ConversationStore::new();
        assert_eq!(store.conversations().len(), 1);
        assert_eq!(store.active().title, DEFAULT_TITLE);
        assert!(store.active().messages.is_empty());
    }

    #[test]
    fn create_selects_the_new_conversation() {
        let mut store = ConversationStore::new();
        let id = store.create_conversation();
        assert_eq!(store.conversations().len(), 2);
        assert_eq!(store.active_id(), id);
        assert_eq!(store.conversations()[0].id, id);
    }

    #[test]
    fn deleting_the_last_conversation_leaves_exactly_one_fresh_one() {
        let mut store = ConversationStore::new();
        let old_id = store.active_id().to_owned();
        store.delete_conversation(&old_id);

        assert_eq!(store.conversations().len(), 1);
        assert_ne!(store.active_id(), old_id);
        assert_eq!(store.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn deleting_the_active_conversation_falls_back_to_the_first() {
        let mut store = ConversationStore::new();
        let first = store.active_id().to_owned();
        let second = store.create_conversation();
        store.delete_conversation(&second);
        assert_eq!(store.active_id(), first);
    }

    #[test]
    fn first_user_message_sets_the_title_prefix() {
        let mut store = ConversationStore::new();
        let id = store.active_id().to_owned();
        let long = "What is the average temperature of the Indian Ocean right now?";
        store.append_message(&id, Role::User, long);

        let title = &store.active().title;
        assert_eq!(title.chars().count(), TITLE_PREFIX_CHARS);
        assert!(long.starts_with(title.as_str()));
    }

    #[test]
    fn later_user_messages_do_not_retitle() {
        let mut store = ConversationStore::new();
        let id = store.active_id().to_owned();
        store.append_message(&id, Role::User, "first question");
        store.append_message(&id, Role::User, "second question");
        assert_eq!(store.active().title, "first question");
    }

    #[test]
    fn bot_messages_never_set_the_title() {
        let mut store = ConversationStore::new();
        let id = store.active_id().to_owned();
        store.append_message(&id, Role::Bot, "greetings");
        assert_eq!(store.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn title_prefix_respects_char_boundaries() {
        let mut store = ConversationStore::new();
        let id = store.active_id().to_owned();
        let emoji_heavy = "🌊".repeat(50);
        store.append_message(&id, Role::User, emoji_heavy);
        assert_eq!(store.active().title.chars().count(), TITLE_PREFIX_CHARS);
    }

    #[test]
    fn replace_message_swaps_text_in_place() {
        let mut store = ConversationStore::new();
        let conv_id = store.active_id().to_owned();
        store.append_message(&conv_id, Role::User, "hi");
        let pending = store
            .append_message(&conv_id, Role::Bot, "Thinking...")
            .unwrap();

        assert!(store.replace_message(&conv_id, &pending, "Hello!"));
        let messages = &store.active().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "Hello!");
        assert_eq!(messages[1].id, pending);
    }

    #[test]
    fn replace_on_unknown_ids_is_a_no_op() {
        let mut store = ConversationStore::new();
        let conv_id = store.active_id().to_owned();
        assert!(!store.replace_message(&conv_id, "nope", "text"));
        assert!(!store.replace_message("nope", "nope", "text"));
    }

    #[test]
    fn append_to_unknown_conversation_returns_none() {
        let mut store = ConversationStore::new();
        assert!(store.append_message("nope", Role::User, "hi").is_none());
    }

    #[test]
    fn restoring_an_empty_collection_yields_a_fresh_store() {
        let store = ConversationStore::from_conversations(Vec::new());
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn set_active_rejects_unknown_ids() {
        let mut store = ConversationStore::new();
        let current = store.active_id().to_owned();
        assert!(!store.set_active("nope"));
        assert_eq!(store.active_id(), current);
    }
}
