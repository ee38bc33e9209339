//! Per-conversation state record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied auxiliary data attached to a conversation.
pub type Metadata = Map<String, Value>;

/// State tracked for one conversation.
///
/// `name` is present exactly when `has_name` is true. The fields are private
/// so the only way to set a name is [`ConversationState::accept_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    id: String,
    has_name: bool,
    name: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

impl ConversationState {
    /// Create a fresh record with no name.
    pub fn new(id: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            has_name: false,
            name: None,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_name(&self) -> bool {
        self.has_name
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Store `name` (trimmed) and mark the conversation as named.
    ///
    /// Re-submission replaces the previous name; no history is kept.
    /// Returns the stored name.
    pub fn accept_name(&mut self, name: &str) -> &str {
        self.has_name = true;
        self.name.insert(name.trim().to_string())
    }
}
