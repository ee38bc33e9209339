//! Contextual input tool: asks the presentation layer to show a form input.

use serde_json::{json, Value};

use super::{required_str, ToolArgs, UiTool};
use crate::error::ToolError;
use crate::ui::{UiComponent, CONTEXTUAL_INPUT};

/// Triggers a `CONTEXTUAL_INPUT` component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextualInputTool;

impl ContextualInputTool {
    pub const NAME: &'static str = "contextual_input_tool";

    /// Build the component without going through JSON arguments.
    pub fn build(
        input_type: &str,
        label: &str,
        required: bool,
        placeholder: Option<&str>,
    ) -> UiComponent {
        let label_lower = label.to_lowercase();
        let placeholder = placeholder
            .map(str::to_string)
            .unwrap_or_else(|| format!("Please enter {}", label_lower));
        UiComponent::new(
            CONTEXTUAL_INPUT,
            json!({
                "input_type": input_type,
                "label": label,
                "required": required,
                "placeholder": placeholder,
            }),
        )
        .with_id(format!("input_{}_{}", input_type, label_lower.replace(' ', "_")))
    }
}

impl UiTool for ContextualInputTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Use this tool when you need to collect specific information from the user via a form input."
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input_type": {
                    "type": "string",
                    "description": "Type of input (e.g., 'text', 'email', 'number')",
                },
                "label": {
                    "type": "string",
                    "description": "Label to display for the input",
                },
                "required": {
                    "type": "boolean",
                    "description": "Whether the input is required",
                    "default": true,
                },
                "placeholder": {
                    "type": "string",
                    "description": "Placeholder text for the input",
                },
            },
            "required": ["input_type", "label"],
        })
    }

    fn run(&self, args: &ToolArgs) -> Result<UiComponent, ToolError> {
        let input_type = required_str(Self::NAME, args, "input_type")?;
        let label = required_str(Self::NAME, args, "label")?;
        let required = args.get("required").and_then(Value::as_bool).unwrap_or(true);
        let placeholder = args.get("placeholder").and_then(Value::as_str);
        Ok(Self::build(input_type, label, required, placeholder))
    }
}
