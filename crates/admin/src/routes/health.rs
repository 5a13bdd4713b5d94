//! Health check handlers.

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

/// Liveness: the process is up.
async fn health() -> &'static str {
    "ok"
}

/// Readiness: the database answers.
async fn ready(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    state.datastore().ping().await.map_err(|e| {
        tracing::error!(error = %e, "Readiness check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}
