//! Text-generation backends.
//!
//! The crew treats generation as an opaque call: an [`Intent`] goes in, a raw
//! string (possibly carrying one embedded UI payload) comes out, or an error.
//!
//! - [`LlmGenerator`] talks to an OpenAI-compatible chat completions endpoint
//!   and executes at most one UI tool call locally, appending the resulting
//!   component to the reply as JSON.
//! - [`OfflineGenerator`] answers deterministically without network access.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::router::Intent;
use super::tasks::{task_for, AgentProfile, TaskPrompt};
use crate::config::LlmConfig;
use crate::error::GenerationError;
use crate::tools::{default_tools, ContextualInputTool, SideboardDisplayTool, ToolArgs, UiTool};
use crate::ui::UiComponent;

/// The opaque text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, intent: &Intent) -> Result<String, GenerationError>;
}

// ---------------------------------------------------------------------------
// LLM backend
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Generator backed by an OpenAI-compatible chat completions API.
#[derive(Debug)]
pub struct LlmGenerator {
    client: reqwest::Client,
    config: LlmConfig,
    profile: AgentProfile,
    tools: Vec<Box<dyn UiTool>>,
}

impl LlmGenerator {
    pub fn new(config: LlmConfig, profile: AgentProfile) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            profile,
            tools: default_tools(),
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\n\nYour personal goal is: {}\n\n\
             When a tool fits the task, call it instead of describing the UI in prose.",
            self.profile.role, self.profile.backstory, self.profile.goal
        )
    }

    fn tool_definitions(&self, task: &TaskPrompt) -> Vec<Value> {
        self.tools
            .iter()
            .filter(|tool| task.tools.iter().any(|name| *name == tool.name()))
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.args_schema(),
                    },
                })
            })
            .collect()
    }

    fn request_body(&self, task: &TaskPrompt) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": self.system_prompt()},
                {"role": "user", "content": task.render()},
            ],
        });
        let tools = self.tool_definitions(task);
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools);
        }
        body
    }

    /// Run the first recognised tool call and return its component.
    fn run_tool_call(&self, calls: &[ToolCall]) -> Result<Option<UiComponent>, GenerationError> {
        for call in calls {
            let Some(tool) = self.tools.iter().find(|t| t.name() == call.function.name) else {
                tracing::warn!(tool = %call.function.name, "Model called an unknown tool");
                continue;
            };
            let args: ToolArgs = if call.function.arguments.trim().is_empty() {
                ToolArgs::new()
            } else {
                serde_json::from_str(&call.function.arguments).map_err(|e| {
                    GenerationError::Other(format!(
                        "Invalid arguments for tool '{}': {}",
                        call.function.name, e
                    ))
                })?
            };
            return Ok(Some(tool.run(&args)?));
        }
        Ok(None)
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(&self, intent: &Intent) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let task = task_for(intent);
        let endpoint = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(model = %self.config.model, %endpoint, "Requesting completion");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(&task))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(GenerationError::EmptyResponse)?;

        let text = message.content.unwrap_or_default();
        let component = self.run_tool_call(&message.tool_calls)?;
        compose_reply(&text, component)
    }
}

/// Reply shown when a tool call arrives without any prose.
pub const TOOL_ONLY_TEXT: &str = "Here you go.";

/// Join the model's prose with the component its tool call produced.
///
/// Tool calls often come with `content: null`; the component's placeholder or
/// title then stands in for the prose so the user never sees an empty reply.
fn compose_reply(text: &str, component: Option<UiComponent>) -> Result<String, GenerationError> {
    let Some(component) = component else {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        return Ok(text.to_string());
    };

    let payload =
        serde_json::to_string(&component).map_err(|e| GenerationError::Other(e.to_string()))?;
    let prose = match text.trim() {
        "" => ["placeholder", "title"]
            .iter()
            .find_map(|key| component.data.get(*key).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(TOOL_ONLY_TEXT),
        _ => text.trim_end(),
    };
    Ok(format!("{} {}", prose, payload).trim_start().to_string())
}

// ---------------------------------------------------------------------------
// Offline backend
// ---------------------------------------------------------------------------

/// Deterministic generator used for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct OfflineGenerator {
    /// Artificial latency before answering.
    pub delay: Option<Duration>,
}

impl OfflineGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_payload(text: String, component: &UiComponent) -> Result<String, GenerationError> {
        let payload =
            serde_json::to_string(component).map_err(|e| GenerationError::Other(e.to_string()))?;
        Ok(format!("{} {}", text, payload))
    }
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, intent: &Intent) -> Result<String, GenerationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match intent {
            Intent::Greet => Self::with_payload(
                "Hello and welcome! I'd love to get to know you. What's your name?".to_string(),
                &ContextualInputTool::build("text", "Name", true, Some("Your name")),
            ),
            Intent::AcknowledgeName(name) => Self::with_payload(
                format!("Nice to meet you, {}!", name),
                &SideboardDisplayTool::build(
                    &format!("Welcome, {}!", name),
                    "Glad you're here. Ask me anything to get started.",
                    "text",
                    Vec::new(),
                ),
            ),
            Intent::GeneralChat(message) => Ok(format!("You said: {}", message)),
        }
    }
}
