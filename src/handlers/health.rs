//! Liveness probe

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use crate::server::AppState;

/// Body of `GET /healthz`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Reports `200` while the store answers, `503` otherwise
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: crate::VERSION,
            }),
        ),
        Err(err) => {
            warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version: crate::VERSION,
                }),
            )
        }
    }
}
