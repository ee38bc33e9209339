//! One routing cycle: route, generate, extract.

use std::sync::Arc;

use serde::Serialize;

use super::extract::extract;
use super::generator::TextGenerator;
use super::router::{route, Inbound, Intent};
use crate::conversation::ConversationState;
use crate::ui::UiComponent;

/// Reply text used when generation fails for a chat message.
pub const CHAT_FALLBACK: &str = "I encountered an error processing your message.";

/// Reply text used when generation fails for a name submission.
pub const NAME_FALLBACK: &str = "I encountered an error processing your name.";

/// Output of one routing cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_components: Option<Vec<UiComponent>>,
    pub state: ConversationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Drives the greeting flow for a conversation.
#[derive(Clone)]
pub struct GreetingCrew {
    generator: Arc<dyn TextGenerator>,
}

impl GreetingCrew {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Handle a chat message.
    pub async fn process_chat(&self, message: &str, state: &mut ConversationState) -> RoutedResponse {
        let intent = route(state, Inbound::Chat(message.to_string()));
        self.respond(intent, state, CHAT_FALLBACK).await
    }

    /// Handle a name submission. The name is stored even if generation fails.
    pub async fn process_name(&self, name: &str, state: &mut ConversationState) -> RoutedResponse {
        let intent = route(state, Inbound::Name(name.to_string()));
        self.respond(intent, state, NAME_FALLBACK).await
    }

    async fn respond(
        &self,
        intent: Intent,
        state: &ConversationState,
        fallback: &str,
    ) -> RoutedResponse {
        match self.generator.generate(&intent).await {
            Ok(raw) => {
                let extracted = extract(&raw);
                RoutedResponse {
                    text: extracted.text,
                    ui_components: extracted.component.map(|c| vec![c]),
                    state: state.clone(),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(
                    conversation_id = %state.id(),
                    ?intent,
                    error = %e,
                    "Text generation failed"
                );
                RoutedResponse {
                    text: fallback.to_string(),
                    ui_components: None,
                    state: state.clone(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl std::fmt::Debug for GreetingCrew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GreetingCrew").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Metadata;
    use crate::crew::generator::OfflineGenerator;
    use crate::error::GenerationError;
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _intent: &Intent) -> Result<String, GenerationError> {
            Err(GenerationError::Other("upstream unavailable".into()))
        }
    }

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _intent: &Intent) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    fn fresh() -> ConversationState {
        ConversationState::new("c1", Metadata::new())
    }

    #[tokio::test]
    async fn test_first_chat_greets_with_input_component() {
        let crew = GreetingCrew::new(Arc::new(OfflineGenerator::new()));
        let mut state = fresh();

        let response = crew.process_chat("hello", &mut state).await;
        assert!(response.error.is_none());
        let components = response.ui_components.unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].component_type, "CONTEXTUAL_INPUT");
        assert!(!response.state.has_name());
    }

    #[tokio::test]
    async fn test_name_then_chat_is_general() {
        let crew = GreetingCrew::new(Arc::new(OfflineGenerator::new()));
        let mut state = fresh();

        let response = crew.process_name(" Ada ", &mut state).await;
        assert_eq!(response.text, "Nice to meet you, Ada!");
        assert_eq!(response.state.name(), Some("Ada"));

        let response = crew.process_chat("how are you?", &mut state).await;
        assert_eq!(response.text, "You said: how are you?");
        assert!(response.ui_components.is_none());
    }

    #[tokio::test]
    async fn test_generation_failure_uses_fallback() {
        let crew = GreetingCrew::new(Arc::new(FailingGenerator));
        let mut state = fresh();

        let response = crew.process_chat("hello", &mut state).await;
        assert_eq!(response.text, CHAT_FALLBACK);
        assert_eq!(response.error.as_deref(), Some("upstream unavailable"));
        assert!(response.ui_components.is_none());

        let response = crew.process_name("Ada", &mut state).await;
        assert_eq!(response.text, NAME_FALLBACK);
        assert!(response.error.is_some());
        assert_eq!(state.name(), Some("Ada"));
        assert!(response.state.has_name());
    }

    #[tokio::test]
    async fn test_plain_reply_passes_through() {
        let crew = GreetingCrew::new(Arc::new(FixedGenerator("Use {braces} freely")));
        let mut state = fresh();
        let response = crew.process_chat("hi", &mut state).await;
        assert_eq!(response.text, "Use {braces} freely");
        assert!(response.ui_components.is_none());
    }

    #[test]
    fn test_routed_response_omits_empty_fields() {
        let response = RoutedResponse {
            text: "hi".into(),
            ui_components: None,
            state: fresh(),
            error: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("ui_components").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["state"]["id"], "c1");
    }
}
