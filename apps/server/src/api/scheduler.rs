use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use cotizaciones_core::UpdateReport;

use crate::{main_lib::AppState, scheduler::SchedulerStatus};

/// Runs the daily update immediately and waits for it to finish.
async fn run_now(State(state): State<Arc<AppState>>) -> Json<UpdateReport> {
    tracing::info!("Manual update requested");
    let report = state.orchestrator.run().await;
    tracing::info!(
        "Manual update for {} finished: {}/{} series updated",
        report.date,
        report.succeeded(),
        report.per_type.len()
    );
    Json(report)
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scheduler/run-now", post(run_now))
        .route("/scheduler/status", get(get_status))
}
