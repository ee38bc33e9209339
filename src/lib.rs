//! # Greeting Crew
//!
//! A small chat backend that greets users, learns their name and then chats
//! with them. Each message is routed on the conversation's state to one of
//! three intents, handed to a text generator, and the reply is split into
//! display text and an optional embedded UI component for the frontend.

pub mod config;
pub mod conversation;
pub mod crew;
pub mod error;
pub mod server;
pub mod tools;
pub mod ui;

pub use config::ServerConfig;
pub use conversation::{ConversationState, ConversationStore, InMemoryConversationStore};
pub use crew::{GreetingCrew, Intent, RoutedResponse, TextGenerator};
pub use error::{GenerationError, GreetingError, ToolError};
pub use ui::{UiComponent, UiComponentRegistry};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
