//! UI components and the registry they are recorded in.

pub mod component;
pub mod registry;

pub use component::{RegisteredComponent, UiComponent, CONTEXTUAL_INPUT, SIDEBOARD_UPDATE};
pub use registry::UiComponentRegistry;
