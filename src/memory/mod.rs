// Conversation memory
// In-process, per-session message log and emotion timeline

mod store;

pub use store::{ConversationMemory, Message, Role, SessionInfo, DEFAULT_SESSION_ID};
