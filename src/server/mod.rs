//! HTTP server for the greeting flow.
//!
//! # Endpoints
//!
//! - `GET  /health`           — Liveness check
//! - `POST /api/chat`         — Chat message
//! - `POST /api/name`         — Name submission
//! - `POST /api/ui-component` — Direct UI component registration
//! - `GET  /api/ui-component/:key` — Last component registered under a key
//! - `GET  /api/conversations/:id` — Current conversation state

pub mod routes;

pub use routes::{app_router, AppState, ChatRequest, ChatResponse, NameRequest, UiComponentRequest, UiComponentResponse};
