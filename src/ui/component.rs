//! UI component payloads surfaced alongside chat text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Component type tag for a contextual form input.
pub const CONTEXTUAL_INPUT: &str = "CONTEXTUAL_INPUT";

/// Component type tag for a sideboard content update.
pub const SIDEBOARD_UPDATE: &str = "SIDEBOARD_UPDATE";

/// A display instruction for the presentation layer.
///
/// `type` and `id` are normally strings, but payloads extracted from generated
/// text are kept exactly as the model wrote them. Such payloads may carry no
/// `id` (the sideboard tool never assigns one) and may carry extra keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiComponent {
    #[serde(rename = "type")]
    pub component_type: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UiComponent {
    pub fn new(component_type: impl Into<String>, data: Value) -> Self {
        Self {
            component_type: Value::String(component_type.into()),
            id: None,
            data,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Value::String(id.into()));
        self
    }

    /// The type tag when it is a string.
    pub fn type_name(&self) -> Option<&str> {
        self.component_type.as_str()
    }

    /// The id when it is a string.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// Registry key: component type and id joined by `_`.
    pub fn registry_key(&self) -> String {
        format!(
            "{}_{}",
            key_part(&self.component_type),
            self.id.as_ref().map(key_part).unwrap_or_default()
        )
    }
}

fn key_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A component stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredComponent {
    #[serde(flatten)]
    pub component: UiComponent,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_preserves_extra_keys() {
        let component: UiComponent = serde_json::from_value(json!({
            "type": "SIDEBOARD_UPDATE",
            "data": {"title": "Hi"},
            "priority": 2,
        }))
        .unwrap();

        assert_eq!(component.component_type, SIDEBOARD_UPDATE);
        assert!(component.id.is_none());
        assert_eq!(component.extra["priority"], 2);

        let back = serde_json::to_value(&component).unwrap();
        assert_eq!(back["priority"], 2);
        assert!(back.get("id").is_none());
    }

    #[test]
    fn test_registry_key_joins_type_and_id() {
        let component = UiComponent::new(CONTEXTUAL_INPUT, json!({})).with_id("input_text_name");
        assert_eq!(component.registry_key(), "CONTEXTUAL_INPUT_input_text_name");
        assert_eq!(component.type_name(), Some(CONTEXTUAL_INPUT));
        assert_eq!(component.id_str(), Some("input_text_name"));
    }

    #[test]
    fn test_non_string_type_and_id_kept() {
        let component: UiComponent =
            serde_json::from_value(json!({"type": 3, "id": 7, "data": {}})).unwrap();
        assert_eq!(component.component_type, json!(3));
        assert_eq!(component.id, Some(json!(7)));
        assert!(component.type_name().is_none());
        assert_eq!(component.registry_key(), "3_7");

        let back = serde_json::to_value(&component).unwrap();
        assert_eq!(back, json!({"type": 3, "id": 7, "data": {}}));
    }
}
