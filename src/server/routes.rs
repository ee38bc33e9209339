//! Axum route handlers for the greeting server.
//!
//! # Routes
//!
//! - `GET  /health`                  — Returns `{"status": "healthy", ...}`
//! - `POST /api/chat`                — Chat message, creates the conversation on first contact
//! - `POST /api/name`                — Name submission for an existing conversation
//! - `POST /api/ui-component`        — Register a UI component directly
//! - `GET  /api/conversations/:id`   — Current conversation state
//! - `GET  /api/ui-component/:key`   — Last component registered under a key

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{GeneratorBackend, ServerConfig};
use crate::conversation::{ConversationState, ConversationStore, InMemoryConversationStore, Metadata};
use crate::crew::{AgentProfile, GreetingCrew, LlmGenerator, OfflineGenerator, RoutedResponse, TextGenerator};
use crate::error::GreetingError;
use crate::ui::{RegisteredComponent, UiComponent, UiComponentRegistry};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Conversation records keyed by id.
    pub store: Arc<dyn ConversationStore>,
    /// Directly registered UI components.
    pub registry: Arc<UiComponentRegistry>,
    pub crew: GreetingCrew,
}

impl AppState {
    /// In-memory state around `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            store: Arc::new(InMemoryConversationStore::new()),
            registry: Arc::new(UiComponentRegistry::new()),
            crew: GreetingCrew::new(generator),
        }
    }

    /// Build state as described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, GreetingError> {
        let generator: Arc<dyn TextGenerator> = match config.backend {
            GeneratorBackend::Llm => Arc::new(LlmGenerator::new(
                config.llm.clone(),
                AgentProfile::default(),
            )?),
            GeneratorBackend::Offline => Arc::new(OfflineGenerator::new()),
        };
        let store = match config.conversation_ttl {
            Some(ttl) => InMemoryConversationStore::with_idle_ttl(ttl),
            None => InMemoryConversationStore::new(),
        };
        Ok(Self {
            store: Arc::new(store),
            registry: Arc::new(UiComponentRegistry::new()),
            crew: GreetingCrew::new(generator),
        })
    }
}

// ---------------------------------------------------------------------------
// Request / response schemas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, alias = "conversationId")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRequest {
    pub name: String,
    #[serde(alias = "conversationId")]
    pub conversation_id: String,
    /// Accepted for symmetry with chat; metadata is fixed when the
    /// conversation is created.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiComponentRequest {
    #[serde(alias = "componentType")]
    pub component_type: String,
    #[serde(alias = "componentId")]
    pub component_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(alias = "conversationId")]
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_components: Option<Vec<UiComponent>>,
    pub conversation_state: ConversationState,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RoutedResponse> for ChatResponse {
    fn from(routed: RoutedResponse) -> Self {
        Self {
            conversation_id: routed.state.id().to_string(),
            text: routed.text,
            ui_components: routed.ui_components,
            conversation_state: routed.state,
            error: routed.error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UiComponentResponse {
    #[serde(rename = "type")]
    pub component_type: String,
    pub id: String,
    pub data: Map<String, Value>,
}

type ApiError = (StatusCode, Json<Value>);

fn reject(err: GreetingError) -> ApiError {
    let status = match &err {
        GreetingError::InvalidReference { .. } => StatusCode::NOT_FOUND,
        GreetingError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(error = %err, status = status.as_u16(), "Request rejected");
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// Give body parsing failures the same `{error}` shape as other failures.
fn reject_body(rejection: JsonRejection) -> ApiError {
    let status = rejection.status();
    let message = rejection.body_text();
    tracing::warn!(error = %message, status = status.as_u16(), "Request body rejected");
    (status, Json(serde_json::json!({ "error": message })))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/name", post(name_handler))
        .route("/api/ui-component", post(register_component_handler))
        .route("/api/ui-component/:key", get(get_component_handler))
        .route("/api/conversations/:id", get(get_conversation_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health — liveness check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "service": "greeting-crew",
    }))
}

/// POST /api/chat — route a chat message.
///
/// The conversation's lock is held for the whole cycle, so concurrent
/// requests for one conversation run one after another.
async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let slot = state.store.get_or_create(
        request.conversation_id.as_deref(),
        request.metadata.unwrap_or_default(),
    );
    if request.conversation_id.as_deref() != Some(slot.id()) {
        // Creation may have pruned idle conversations.
        state.registry.retain_conversations(|id| state.store.contains(id));
    }

    let mut conversation = slot.lock().await;
    let routed = state.crew.process_chat(&request.message, &mut conversation).await;
    slot.touch();
    Ok(Json(routed.into()))
}

/// POST /api/name — accept the user's name.
async fn name_handler(
    State(state): State<AppState>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let slot = state.store.get(&request.conversation_id).map_err(reject)?;
    let mut conversation = slot.lock().await;
    let routed = state.crew.process_name(&request.name, &mut conversation).await;
    slot.touch();
    Ok(Json(routed.into()))
}

/// POST /api/ui-component — register a component without routing.
///
/// The stored record keeps the type as sent; the response upper-cases it.
async fn register_component_handler(
    State(state): State<AppState>,
    payload: Result<Json<UiComponentRequest>, JsonRejection>,
) -> Result<Json<UiComponentResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    state.store.get(&request.conversation_id).map_err(reject)?;

    let component = UiComponent::new(
        request.component_type.clone(),
        Value::Object(request.data.clone()),
    )
    .with_id(request.component_id.clone());
    let key = state.registry.record(&request.conversation_id, component);
    tracing::info!(%key, conversation_id = %request.conversation_id, "Registered UI component");

    Ok(Json(UiComponentResponse {
        component_type: request.component_type.to_uppercase(),
        id: request.component_id,
        data: request.data,
    }))
}

/// GET /api/ui-component/:key — look up a registered component.
async fn get_component_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RegisteredComponent>, ApiError> {
    state.registry.get(&key).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("UI component '{}' not found", key) })),
        )
    })
}

/// GET /api/conversations/:id — current conversation state.
async fn get_conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationState>, ApiError> {
    let slot = state.store.get(&id).map_err(reject)?;
    Ok(Json(slot.snapshot().await))
}
