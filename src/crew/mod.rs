//! The greeting crew: routing, task prompts, generation and payload extraction.

pub mod extract;
pub mod generator;
pub mod greeting_crew;
pub mod router;
pub mod tasks;

pub use extract::{extract, Extracted};
pub use generator::{LlmGenerator, OfflineGenerator, TextGenerator};
pub use greeting_crew::{GreetingCrew, RoutedResponse, CHAT_FALLBACK, NAME_FALLBACK};
pub use router::{route, Inbound, Intent};
pub use tasks::{task_for, AgentProfile, TaskPrompt};
