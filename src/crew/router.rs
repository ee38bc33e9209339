//! Decides which response a conversation needs next.
//!
//! Per conversation this is a one-shot machine: `NoName` moves to `HasName`
//! when a name is submitted and never moves back.

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationState;

/// What the user sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Chat(String),
    Name(String),
}

/// Which generation request to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    /// First contact: greet and ask for a name.
    Greet,
    /// A name was just accepted (holds the trimmed name).
    AcknowledgeName(String),
    /// Ordinary message from a named user.
    GeneralChat(String),
}

/// Pick the intent for `inbound`, updating `state` for name submissions.
pub fn route(state: &mut ConversationState, inbound: Inbound) -> Intent {
    let intent = match inbound {
        Inbound::Name(name) => Intent::AcknowledgeName(state.accept_name(&name).to_string()),
        Inbound::Chat(_) if !state.has_name() => Intent::Greet,
        Inbound::Chat(message) => Intent::GeneralChat(message),
    };
    tracing::debug!(conversation_id = %state.id(), ?intent, "Routed inbound message");
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Metadata;

    fn fresh() -> ConversationState {
        ConversationState::new("c1", Metadata::new())
    }

    fn assert_name_invariant(state: &ConversationState) {
        assert_eq!(state.has_name(), state.name().is_some());
    }

    #[test]
    fn test_fresh_chat_greets() {
        let mut state = fresh();
        for message in ["hi", "", "my name is Ada"] {
            assert_eq!(route(&mut state, Inbound::Chat(message.into())), Intent::Greet);
            assert_name_invariant(&state);
        }
        assert!(!state.has_name());
    }

    #[test]
    fn test_name_submission_acknowledges_trimmed() {
        let mut state = fresh();
        let intent = route(&mut state, Inbound::Name("  Ada  ".into()));
        assert_eq!(intent, Intent::AcknowledgeName("Ada".into()));
        assert_eq!(state.name(), Some("Ada"));
        assert_name_invariant(&state);
    }

    #[test]
    fn test_after_name_chat_is_general() {
        let mut state = fresh();
        route(&mut state, Inbound::Chat("hello".into()));
        route(&mut state, Inbound::Name("Ada".into()));

        for message in ["how are you?", "tell me a joke"] {
            let intent = route(&mut state, Inbound::Chat(message.into()));
            assert_eq!(intent, Intent::GeneralChat(message.into()));
            assert_name_invariant(&state);
        }
    }

    #[test]
    fn test_second_name_overwrites() {
        let mut state = fresh();
        route(&mut state, Inbound::Name("Ada".into()));
        assert!(state.has_name());
        let intent = route(&mut state, Inbound::Name("Grace".into()));

        assert_eq!(intent, Intent::AcknowledgeName("Grace".into()));
        assert!(state.has_name());
        assert_eq!(state.name(), Some("Grace"));
    }

    #[test]
    fn test_intent_serialization() {
        let json = serde_json::to_value(Intent::AcknowledgeName("Ada".into())).unwrap();
        assert_eq!(json["intent"], "acknowledge_name");
        assert_eq!(json["value"], "Ada");
        let json = serde_json::to_value(Intent::Greet).unwrap();
        assert_eq!(json["intent"], "greet");
    }
}
