//! Process-wide registry of the last UI component triggered under each key.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use super::component::{RegisteredComponent, UiComponent};

/// Registry keyed by [`UiComponent::registry_key`].
///
/// The most recently recorded component wins under a given key.
#[derive(Debug, Default)]
pub struct UiComponentRegistry {
    entries: RwLock<HashMap<String, RegisteredComponent>>,
}

impl UiComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `component` for `conversation_id` and return its key.
    pub fn record(&self, conversation_id: &str, component: UiComponent) -> String {
        let key = component.registry_key();
        let entry = RegisteredComponent {
            component,
            conversation_id: conversation_id.to_string(),
            timestamp: Utc::now(),
        };
        if self.entries.write().insert(key.clone(), entry).is_some() {
            tracing::debug!(%key, "Replaced registered UI component");
        }
        key
    }

    pub fn get(&self, key: &str) -> Option<RegisteredComponent> {
        self.entries.read().get(key).cloned()
    }

    /// Every entry owned by `conversation_id`, oldest first.
    pub fn for_conversation(&self, conversation_id: &str) -> Vec<RegisteredComponent> {
        let mut found: Vec<_> = self
            .entries
            .read()
            .values()
            .filter(|entry| entry.conversation_id == conversation_id)
            .cloned()
            .collect();
        found.sort_by_key(|entry| entry.timestamp);
        found
    }

    /// Drop entries whose owning conversation fails `is_live`.
    ///
    /// Returns how many were removed.
    pub fn retain_conversations(&self, is_live: impl Fn(&str) -> bool) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| is_live(&entry.conversation_id));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned UI components of evicted conversations");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
