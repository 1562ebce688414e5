//! HTTP server wiring: shared state, routes and the serve loop.

use crate::auth::AuthProvider;
use crate::i18n::LocaleResolver;
use crate::pages;
use crate::usage::{self, UsageStore};
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Collaborators shared by every request. Cloned per request; all fields
/// are immutable behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LocaleResolver>,
    pub auth: Arc<dyn AuthProvider>,
    pub usage_store: Arc<dyn UsageStore>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::root))
        .route("/health", get(health))
        .route("/:locale/blog", get(pages::blog))
        .route("/api/usage", post(usage::handle_update_usage))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("✓ Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
