//! Conversation state and its process-wide store.

pub mod state;
pub mod store;

pub use state::{ConversationState, Metadata};
pub use store::{ConversationHandle, ConversationSlot, ConversationStore, InMemoryConversationStore};
