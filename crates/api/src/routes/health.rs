//! Liveness probe, mounted at the root rather than under `/api/v1`.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the catalog store did not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub db_latency_ms: u128,
}

/// GET /health
///
/// Answers 503 while the catalog store is unreachable so load balancers can
/// take the instance out of rotation.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let ping = state.catalog.entities.ping().await;
    let db_latency_ms = started.elapsed().as_millis();

    if let Err(err) = &ping {
        tracing::warn!(error = %err, "Catalog store ping failed");
    }

    let db_healthy = ping.is_ok();
    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            db_latency_ms,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
