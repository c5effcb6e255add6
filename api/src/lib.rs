use std::{env, error::Error, sync::Arc};

pub mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    routes::{ask::ask_route::preguntar, health_route::health, index_route::index},
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";
/// Upper bound on a `/preguntar` request body.
pub const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

/// Builds the HTTP router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/preguntar", post(preguntar))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into());

    let state = Arc::new(AppState::from_env().map_err(AppError::from)?);
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "tutor API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
