use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use cotizaciones_core::HealthReport;

use crate::main_lib::AppState;

/// Probes every source without persisting anything.
///
/// Answers 200 either way; the body's `status` tells whether all sources
/// returned a usable value.
async fn get_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.orchestrator.check_sources().await;
    if !report.is_healthy() {
        tracing::warn!("Health check found failing sources: {:?}", report.errors);
    }
    (StatusCode::OK, Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}
