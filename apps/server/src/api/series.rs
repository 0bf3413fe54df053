use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use cotizaciones_core::{QuoteType, SeriesEntry, SeriesPoint};

use crate::{error::ApiResult, main_lib::AppState};

/// Stored series followed by the projected placeholder days.
///
/// A date the projector cannot read degrades the response to the stored
/// values alone instead of failing the request.
async fn get_series(state: Arc<AppState>, quote_type: QuoteType) -> ApiResult<Json<Vec<SeriesPoint>>> {
    let real = state.store.read(quote_type).await?;

    match state.projector.project(real.clone()) {
        Ok(points) => Ok(Json(points)),
        Err(e) => {
            tracing::warn!(
                quote_type = %quote_type,
                rows = real.len(),
                "Serving {} without projection: {}",
                quote_type,
                e
            );
            Ok(Json(real.into_iter().map(SeriesPoint::from).collect()))
        }
    }
}

async fn get_latest(state: Arc<AppState>, quote_type: QuoteType) -> ApiResult<Json<Option<SeriesEntry>>> {
    Ok(Json(state.store.latest(quote_type).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    QuoteType::ALL.into_iter().fold(Router::new(), |router, quote_type| {
        router
            .route(
                &format!("/{}", quote_type.slug()),
                get(move |State(state): State<Arc<AppState>>| get_series(state, quote_type)),
            )
            .route(
                &format!("/{}/latest", quote_type.slug()),
                get(move |State(state): State<Arc<AppState>>| get_latest(state, quote_type)),
            )
    })
}
