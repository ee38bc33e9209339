//! Error types for the greeting crew.
//!
//! Failures are split by the boundary that handles them: an unknown
//! conversation reference is a client error, while generation failures are
//! folded into normal chat responses by [`crate::crew::GreetingCrew`].

use thiserror::Error;

/// Errors raised by the text-generation collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured for the LLM backend.
    #[error("LLM API key not set. Set OPENAI_API_KEY or switch GREETING_BACKEND to offline.")]
    MissingApiKey,

    /// Transport-level failure talking to the LLM endpoint.
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The LLM endpoint answered with a non-success status.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The completion carried no text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The model called a tool with unusable arguments.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Any other collaborator failure.
    #[error("{0}")]
    Other(String),
}

/// Errors raised when building a UI component from tool arguments.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was missing or had the wrong JSON type.
    #[error("Tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },
}

/// Errors surfaced by core operations to the HTTP boundary.
#[derive(Debug, Error)]
pub enum GreetingError {
    /// The request referenced a conversation id the store does not know.
    #[error("Conversation not found: {conversation_id}")]
    InvalidReference { conversation_id: String },

    /// The text-generation collaborator failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl GreetingError {
    /// Build an [`GreetingError::InvalidReference`] for `conversation_id`.
    pub fn invalid_reference(conversation_id: impl Into<String>) -> Self {
        Self::InvalidReference {
            conversation_id: conversation_id.into(),
        }
    }
}
