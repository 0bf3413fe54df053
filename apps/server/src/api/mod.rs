//! HTTP routes.
//!
//! ```text
//! /                          service description
//! /api/{uva,dolar-mayorista,dolar-mep}         projected series
//! /api/{uva,dolar-mayorista,dolar-mep}/latest  last stored value
//! /api/health                live probe of every source
//! /api/scheduler/run-now     synchronous update
//! /api/scheduler/status      daily trigger state
//! /api/import/{quote_type}   CSV upload
//! ```

mod health;
mod import;
mod scheduler;
mod series;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use cotizaciones_core::QuoteType;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

async fn root() -> Json<Value> {
    let series: Vec<String> = QuoteType::ALL
        .iter()
        .map(|qt| format!("/api/{}", qt.slug()))
        .collect();
    Json(json!({
        "service": "cotizaciones",
        "description": "Daily Argentine quotes (UVA, dólar mayorista, dólar MEP) with projected future dates",
        "endpoints": {
            "series": series,
            "latest": "/api/{series}/latest",
            "health": "/api/health",
            "scheduler_status": "/api/scheduler/status",
            "run_now": "/api/scheduler/run-now",
            "import": "/api/import/{quote_type}",
        }
    }))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    // Health, updates and imports wait on the sources, which carry their own
    // client timeouts. Only store reads are bounded here.
    let reads = Router::new().merge(series::router()).layer(
        TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, config.request_timeout),
    );

    let api = Router::new()
        .merge(reads)
        .merge(health::router())
        .merge(scheduler::router())
        .merge(import::router());

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}
