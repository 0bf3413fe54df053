use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    routing::post,
    Json, Router,
};
use cotizaciones_core::quotes::import::{import_csv, ImportSummary};
use cotizaciones_core::QuoteType;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const FILE_FIELD: &str = "file";

/// Upserts the rows of an uploaded `fecha,valor` CSV into one series.
async fn import_series(
    State(state): State<Arc<AppState>>,
    Path(quote_type): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportSummary>> {
    let quote_type: QuoteType = quote_type.parse().map_err(|_| ApiError::NotFound)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if let Some(name) = field.file_name() {
            if !name.to_ascii_lowercase().ends_with(".csv") {
                return Err(ApiError::BadRequest("File must be a CSV".to_string()));
            }
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        data = Some(bytes);
        break;
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;
    tracing::info!("Importing {} bytes into {}", data.len(), quote_type);
    let summary = import_csv(state.store.as_ref(), quote_type, &data).await?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/import/{quote_type}", post(import_series))
}
