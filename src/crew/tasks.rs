//! Task prompts and the agent persona the greeting crew runs with.

use super::router::Intent;
use crate::tools::{ContextualInputTool, SideboardDisplayTool};

/// Who the agent is. Rendered into the system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            role: "Greeting Assistant".to_string(),
            goal: "Welcome users warmly, learn their name and help with their questions".to_string(),
            backstory: "You are the friendly front desk of this application. You keep replies \
                        short and surface UI components when they help the user."
                .to_string(),
        }
    }
}

/// One unit of work handed to the text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompt {
    pub description: String,
    pub expected_output: String,
    /// Extra context lines appended to the prompt.
    pub context: Vec<String>,
    /// Tools the agent is nudged towards.
    pub tools: Vec<&'static str>,
}

impl TaskPrompt {
    /// Render the user-facing prompt sent to the model.
    pub fn render(&self) -> String {
        let mut prompt = self.description.clone();
        if !self.context.is_empty() {
            prompt.push_str("\n\nContext:\n");
            prompt.push_str(&self.context.join("\n"));
        }
        prompt.push_str("\n\nExpected output: ");
        prompt.push_str(&self.expected_output);
        prompt
    }
}

/// Build the task for `intent`.
pub fn task_for(intent: &Intent) -> TaskPrompt {
    match intent {
        Intent::Greet => TaskPrompt {
            description: format!(
                "Greet the user and ask for their name. Use the {} to request their name if not provided.",
                ContextualInputTool::NAME
            ),
            expected_output: "A warm greeting and a request for the user's name".to_string(),
            context: Vec::new(),
            tools: vec![ContextualInputTool::NAME],
        },
        Intent::AcknowledgeName(name) => TaskPrompt {
            description: format!(
                "Acknowledge the user's name ({}) and provide a welcome message. Use the {} tool to show a welcome message.",
                name,
                SideboardDisplayTool::NAME
            ),
            expected_output: "A personalized welcome message and sideboard update".to_string(),
            context: vec![format!("User's name is: {}", name)],
            tools: vec![SideboardDisplayTool::NAME],
        },
        Intent::GeneralChat(message) => TaskPrompt {
            description: format!("Respond to the user's message: {}", message),
            expected_output: "A helpful and relevant response to the user's message".to_string(),
            context: Vec::new(),
            tools: Vec::new(),
        },
    }
}
