//! Conversation state store.
//!
//! Every conversation gets its own slot holding the state behind an async
//! mutex. Handlers lock the slot for a whole routing cycle, which serialises
//! requests for the same conversation while leaving other conversations free.
//!
//! By default nothing is ever evicted. Setting an idle TTL prunes slots that
//! have not been touched within that window whenever a new conversation is
//! created. A slot whose lock is held is never pruned.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::state::{ConversationState, Metadata};
use crate::error::GreetingError;

/// Shared slot for one conversation.
#[derive(Debug)]
pub struct ConversationSlot {
    id: String,
    state: Mutex<ConversationState>,
    last_seen: parking_lot::Mutex<DateTime<Utc>>,
}

impl ConversationSlot {
    fn new(state: ConversationState) -> Self {
        Self {
            id: state.id().to_string(),
            state: Mutex::new(state),
            last_seen: parking_lot::Mutex::new(Utc::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lock the state for a read-modify-write cycle.
    pub async fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.touch();
        self.state.lock().await
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ConversationState {
        self.state.lock().await.clone()
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.lock()
    }

    /// Mark the conversation as active now.
    pub fn touch(&self) {
        *self.last_seen.lock() = Utc::now();
    }
}

/// Handle returned by store lookups; clones share the same record.
pub type ConversationHandle = Arc<ConversationSlot>;

/// Backing for conversation state.
///
/// Handlers receive the store through [`crate::server::AppState`], so a
/// persistent implementation can replace [`InMemoryConversationStore`].
pub trait ConversationStore: Send + Sync {
    /// Return the conversation for `id`, creating a fresh one under a newly
    /// generated id when `id` is absent or unknown.
    ///
    /// `metadata` is only used when a record is created.
    fn get_or_create(&self, id: Option<&str>, metadata: Metadata) -> ConversationHandle;

    /// Look up an existing conversation.
    fn get(&self, id: &str) -> Result<ConversationHandle, GreetingError>;

    /// Whether `id` names a live conversation.
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    /// Number of conversations currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store keyed by conversation id.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: DashMap<String, ConversationHandle>,
    idle_ttl: Option<Duration>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that drops conversations idle for longer than `ttl`.
    pub fn with_idle_ttl(ttl: Duration) -> Self {
        Self {
            conversations: DashMap::new(),
            idle_ttl: Some(ttl),
        }
    }

    /// Remove every conversation last touched before `cutoff`, skipping any
    /// whose state is locked by a request in flight.
    ///
    /// Returns how many were removed.
    pub fn prune_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.conversations.len();
        self.conversations
            .retain(|_, slot| slot.state.try_lock().is_err() || slot.last_seen() >= cutoff);
        let removed = before.saturating_sub(self.conversations.len());
        if removed > 0 {
            tracing::debug!(removed, "Pruned idle conversations");
        }
        removed
    }

    fn prune_expired(&self) {
        let Some(ttl) = self.idle_ttl else {
            return;
        };
        if let Ok(ttl) = chrono::Duration::from_std(ttl) {
            self.prune_idle(Utc::now() - ttl);
        }
    }

    fn create(&self, metadata: Metadata) -> ConversationHandle {
        self.prune_expired();
        let id = Uuid::new_v4().to_string();
        let slot = Arc::new(ConversationSlot::new(ConversationState::new(
            id.clone(),
            metadata,
        )));
        self.conversations.insert(id.clone(), Arc::clone(&slot));
        tracing::debug!(conversation_id = %id, "Created conversation");
        slot
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn get_or_create(&self, id: Option<&str>, metadata: Metadata) -> ConversationHandle {
        if let Some(id) = id {
            if let Some(slot) = self.conversations.get(id) {
                slot.touch();
                return Arc::clone(slot.value());
            }
            tracing::debug!(conversation_id = %id, "Unknown conversation id, starting a new one");
        }
        self.create(metadata)
    }

    fn get(&self, id: &str) -> Result<ConversationHandle, GreetingError> {
        let slot = self
            .conversations
            .get(id)
            .map(|slot| Arc::clone(slot.value()))
            .ok_or_else(|| GreetingError::invalid_reference(id))?;
        slot.touch();
        Ok(slot)
    }

    fn contains(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    fn len(&self) -> usize {
        self.conversations.len()
    }
}
