//! Separates an embedded UI payload from generated prose.
//!
//! The scan is positional: the span from the first `{` to the last `}` is
//! parsed as one JSON object. Unrelated braces in the prose make the span
//! unparsable, in which case the text is returned untouched. At most one
//! payload is ever extracted.

use serde_json::Value;

use crate::ui::UiComponent;

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub text: String,
    pub component: Option<UiComponent>,
}

impl Extracted {
    fn verbatim(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            component: None,
        }
    }
}

/// Split `raw` into display text and an optional UI component.
///
/// A payload is recognised when the span parses to an object with both
/// `type` and `data` keys; the object is kept as written. The span and the
/// one character following it are removed, whitespace where the two remaining
/// parts meet is dropped, and the result is trimmed. Anything else returns
/// `raw` unchanged.
pub fn extract(raw: &str) -> Extracted {
    let (Some(start), Some(close)) = (raw.find('{'), raw.rfind('}')) else {
        return Extracted::verbatim(raw);
    };
    if start > close {
        return Extracted::verbatim(raw);
    }

    let end = close + 1;
    let span = &raw[start..end];
    let value = match serde_json::from_str::<Value>(span) {
        Ok(value @ Value::Object(_))
            if value.get("type").is_some() && value.get("data").is_some() =>
        {
            value
        }
        Ok(_) => return Extracted::verbatim(raw),
        Err(e) => {
            tracing::trace!(error = %e, "No parsable payload in generated text");
            return Extracted::verbatim(raw);
        }
    };
    let component = match serde_json::from_value::<UiComponent>(value) {
        Ok(component) => component,
        Err(e) => {
            tracing::debug!(error = %e, "Embedded payload could not be read as a component");
            return Extracted::verbatim(raw);
        }
    };

    let mut rest = raw[end..].chars();
    rest.next();
    let text = format!("{}{}", &raw[..start], rest.as_str().trim_start())
        .trim()
        .to_string();

    Extracted {
        text,
        component: Some(component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_payload_between_prose() {
        let raw = r#"Hello! {"type":"X","data":{"a":1}} Bye"#;
        let out = extract(raw);

        let component = out.component.unwrap();
        assert_eq!(component.component_type, "X");
        assert_eq!(component.data["a"], 1);
        assert_eq!(out.text, "Hello! Bye");
    }

    #[test]
    fn test_payload_at_end_is_trimmed() {
        let out = extract(r#"Nice to meet you! {"type":"SIDEBOARD_UPDATE","data":{}}"#);
        assert_eq!(out.text, "Nice to meet you!");
        assert!(out.component.is_some());
    }

    #[test]
    fn test_drops_one_following_character_only() {
        let out = extract(r#"A {"type":"X","data":1}!! B"#);
        assert_eq!(out.text, "A ! B");
    }

    #[test]
    fn test_multibyte_following_character() {
        let out = extract(r#"Hi {"type":"X","data":{}}é  done"#);
        assert_eq!(out.text, "Hi done");
    }

    #[test]
    fn test_no_braces_is_verbatim() {
        let out = extract("no braces here");
        assert_eq!(out.text, "no braces here");
        assert!(out.component.is_none());
    }

    #[test]
    fn test_unbalanced_braces_are_verbatim() {
        for raw in ["odd { text", "odd } text", "} reversed {"] {
            let out = extract(raw);
            assert_eq!(out.text, raw);
            assert!(out.component.is_none());
        }
    }

    #[test]
    fn test_json_without_type_and_data_is_verbatim() {
        let raw = r#"Here you go: {"foo": 1}"#;
        let out = extract(raw);
        assert_eq!(out.text, raw);
        assert!(out.component.is_none());

        let raw = r#"{"type": "X"}"#;
        assert!(extract(raw).component.is_none());
    }

    #[test]
    fn test_malformed_json_is_verbatim() {
        let raw = r#"Broken {"type": "X", "data": } end"#;
        let out = extract(raw);
        assert_eq!(out.text, raw);
        assert!(out.component.is_none());
    }

    #[test]
    fn test_unrelated_braces_defeat_extraction() {
        let raw = r#"Use {curly} braces. {"type":"X","data":{}}"#;
        let out = extract(raw);
        assert_eq!(out.text, raw);
        assert!(out.component.is_none());
    }

    #[test]
    fn test_two_payloads_extract_nothing() {
        let raw = r#"{"type":"A","data":{}} and {"type":"B","data":{}}"#;
        assert!(extract(raw).component.is_none());
    }

    #[test]
    fn test_non_string_type_and_id_are_extracted() {
        let out = extract(r#"Hi {"type":"X","id":7,"data":{}}"#);
        assert_eq!(out.text, "Hi");
        let component = out.component.unwrap();
        assert_eq!(component.id, Some(serde_json::json!(7)));

        let out = extract(r#"x {"type": 3, "data": {}}"#);
        assert_eq!(out.text, "x");
        assert_eq!(out.component.unwrap().component_type, serde_json::json!(3));
    }

    #[test]
    fn test_payload_on_its_own_line() {
        let raw = "Here you go:\n\n{\"type\":\"X\",\"data\":{}}\n\nLet me know";
        let out = extract(raw);
        assert!(out.component.is_some());
        assert_eq!(out.text, "Here you go:\n\nLet me know");
    }
}
