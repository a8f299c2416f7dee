//! HTTP front-end: an upload page plus one handler per user action.

pub mod error;
pub mod handlers;
pub mod page;

use crate::analysis::Analyzer;
use crate::config::StudioConfig;
use crate::error::Result;
use crate::llm::broker::LlmBroker;
use crate::llm::gateway::LlmGateway;
use crate::llm::gateways::{GeminiConfig, GeminiGateway};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<StudioConfig>,
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(config: Arc<StudioConfig>, gateway: Arc<dyn LlmGateway>) -> Self {
        let analyzer = Analyzer::new(LlmBroker::new(config.model.clone(), gateway));
        Self { config, analyzer }
    }

    /// Wire the state to the hosted Gemini API.
    pub fn with_gemini(config: Arc<StudioConfig>) -> Result<Self> {
        let gateway = GeminiGateway::with_config(GeminiConfig::from(config.as_ref()))?;
        Ok(Self::new(config, Arc::new(gateway)))
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/status", get(handlers::status))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analyze/report", post(handlers::analyze_report))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Insight Studio listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
