use crate::config::ServerConfig;
use crate::registry::SessionRegistry;
use crate::signaling::{SignalingRouter, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub router: SignalingRouter,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        Self {
            router: SignalingRouter::new(registry, config.ice_servers.clone()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(state)
}

/// Serves on an already bound listener until the process is stopped.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!("Signaling server listening on http://{}", addr);

    axum::serve(listener, build_app(state))
        .await
        .context("signaling server stopped")
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    serve_on(listener, AppState::new(&config)).await
}
