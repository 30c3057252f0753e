//! Liveness check, mounted at the root rather than under `/api/v1`.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// The database check is bounded by the pool acquire timeout; a slow or
/// unreachable database reports `degraded` with 503.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let check_timeout = Duration::from_secs(state.config.db_acquire_timeout_secs);
    let db_healthy = matches!(
        tokio::time::timeout(check_timeout, g1000_db::health_check(&state.pool)).await,
        Ok(Ok(()))
    );
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
