mod page;
mod routes;

use std::sync::Arc;
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use crate::annotation::Annotator;
use crate::data::ServerConfig;
use crate::detection_runners::InferenceProcess;

pub use page::{escape_html, render_form, render_result};
pub use routes::DetectResponse;

/// Loaded once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn InferenceProcess>,
    pub annotator: Arc<Annotator>,
}

impl AppState {
    pub fn new(model: Arc<dyn InferenceProcess>, annotator: Arc<Annotator>) -> Self {
        Self { model, annotator }
    }
}

/// Create HTTP router with the form, the JSON API and the health check
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::index_handler))
        .route("/detect", post(routes::detect_form_handler))
        .route("/api/detect", post(routes::detect_api_handler))
        .route("/health", get(routes::health_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state, config.max_upload_bytes);
    let addr = config.address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    log::info!("🌐 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
    }
}
