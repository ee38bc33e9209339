//! Tools the greeting agent can use to surface UI components.
//!
//! Each tool turns a set of JSON arguments into a [`UiComponent`]. The LLM
//! backend sends the tools' names, descriptions and argument schemas as
//! `tools` function definitions on the completion request; the offline
//! backend calls them directly.

pub mod contextual_input;
pub mod sideboard_display;

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::ui::UiComponent;

pub use contextual_input::ContextualInputTool;
pub use sideboard_display::SideboardDisplayTool;

/// Arguments passed to a tool.
pub type ToolArgs = Map<String, Value>;

/// A tool that produces one UI component per invocation.
pub trait UiTool: Send + Sync + fmt::Debug {
    /// The unique name of the tool.
    fn name(&self) -> &str;

    /// Description used to tell the model when to use the tool.
    fn description(&self) -> &str;

    /// JSON schema for the arguments that the tool accepts.
    fn args_schema(&self) -> Value;

    /// Build the component described by `args`.
    fn run(&self, args: &ToolArgs) -> Result<UiComponent, ToolError>;
}

/// The tools available to the greeting agent.
pub fn default_tools() -> Vec<Box<dyn UiTool>> {
    vec![
        Box::new(ContextualInputTool),
        Box::new(SideboardDisplayTool),
    ]
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(
    tool: &str,
    args: &'a ToolArgs,
    argument: &str,
) -> Result<&'a str, ToolError> {
    args.get(argument)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
        })
}
