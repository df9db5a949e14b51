//! Client-side chat surface: an explicit conversation state machine with
//! pure transitions, a best-effort persistence adapter invoked after each
//! transition, and a send-flow driver over a transport seam. None of this
//! touches the measurement store; conversations live entirely on the client.

pub mod persist;
pub mod session;
pub mod store;

pub use persist::ConversationFile;
pub use session::{ChatSession, ChatTransport, HttpChatTransport, SEND_FAILED_TEXT};
pub use store::{ChatMessage, Conversation, ConversationStore, Role};
