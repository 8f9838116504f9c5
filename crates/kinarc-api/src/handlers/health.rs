//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
pub struct HealthChecks {
    pub database: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}

/// Liveness endpoint. A failing database probe flips the flag but never
/// fails the endpoint itself.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let started = Instant::now();

    let database = matches!(
        tokio::time::timeout(DB_CHECK_TIMEOUT, sqlx::query("SELECT 1").execute(&state.pool)).await,
        Ok(Ok(_))
    );

    if !database {
        tracing::warn!("Health check: database probe failed");
    }

    Json(HealthResponse {
        status: "ok",
        checks: HealthChecks { database },
        response_time_ms: started.elapsed().as_millis() as u64,
    })
}
