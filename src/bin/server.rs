//! greeting-crew HTTP server binary.
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT` — Bind address (default: 0.0.0.0:8000)
//! - `GREETING_BACKEND` — "llm" or "offline" (default: llm if `OPENAI_API_KEY` is set)
//! - `GREETING_MODEL`, `OPENAI_API_KEY`, `OPENAI_BASE_URL` — LLM settings
//! - `GREETING_CONVERSATION_TTL_SECS` — Drop idle conversations (default: never)
//! - `RUST_LOG` — Tracing filter (default: "info,greeting_crew=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use greeting_crew::server::{app_router, AppState};
use greeting_crew::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,greeting_crew=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    let bind_addr = config.bind_addr();

    let state = AppState::from_config(&config).context("Failed to build text generator")?;
    tracing::info!(backend = ?config.backend, model = %config.llm.model, "Text generator ready");
    if config.conversation_ttl.is_none() {
        tracing::warn!("GREETING_CONVERSATION_TTL_SECS not set; conversations are never evicted");
    }

    let app = app_router(state);

    tracing::info!("greeting-crew server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health           — liveness check");
    tracing::info!("  POST /api/chat         — chat message");
    tracing::info!("  POST /api/name         — name submission");
    tracing::info!("  POST /api/ui-component — UI component registration");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
