//! Sideboard tool: pushes titled content into the side panel.

use serde_json::{json, Value};

use super::{required_str, ToolArgs, UiTool};
use crate::error::ToolError;
use crate::ui::{UiComponent, SIDEBOARD_UPDATE};

/// Triggers a `SIDEBOARD_UPDATE` component. Never assigns an id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideboardDisplayTool;

impl SideboardDisplayTool {
    pub const NAME: &'static str = "update_sideboard";

    pub fn build(title: &str, content: &str, content_type: &str, actions: Vec<Value>) -> UiComponent {
        UiComponent::new(
            SIDEBOARD_UPDATE,
            json!({
                "title": title,
                "content": content,
                "content_type": content_type,
                "actions": actions,
            }),
        )
    }
}

impl UiTool for SideboardDisplayTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Use this tool to update the sideboard with relevant information or actions."
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Title of the sideboard content"},
                "content": {"type": "string", "description": "Main content to display"},
                "content_type": {
                    "type": "string",
                    "description": "Type of content (text, markdown, html, etc.)",
                    "default": "text",
                },
                "actions": {
                    "type": "array",
                    "items": {"type": "object"},
                    "description": "List of action buttons/links to display",
                },
            },
            "required": ["title", "content"],
        })
    }

    fn run(&self, args: &ToolArgs) -> Result<UiComponent, ToolError> {
        let title = required_str(Self::NAME, args, "title")?;
        let content = required_str(Self::NAME, args, "content")?;
        // The model sometimes mirrors the schema field name `type`.
        let content_type = args
            .get("content_type")
            .or_else(|| args.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("text");
        let actions = args
            .get("actions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Self::build(title, content, content_type, actions))
    }
}
