//! Readiness endpoint backed by the MongoDB liveness probe

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use docstore::mongodb::ping;
use serde_json::Value;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Ping MongoDB; 503 when it does not answer or is not configured
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "MongoDB answered the ping"),
        (status = 503, description = "MongoDB unreachable or not configured")
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let timeout = state.probe_timeout();

    let mongodb: HealthCheckFuture = match state.db.as_ref() {
        Some(db) => Box::pin(async move { ping(db, timeout).await.map_err(|e| e.to_string()) }),
        None => Box::pin(async { Err("MongoDB is not configured".to_string()) }),
    };

    run_health_checks(vec![("mongodb", mongodb)]).await
}
