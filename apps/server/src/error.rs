use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cotizaciones_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) | CoreError::DateFormat(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                CoreError::MarketData(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
                CoreError::Storage(_) | CoreError::Unexpected(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cotizaciones_core::errors::{DateFormatError, StorageError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(CoreError::Validation(ValidationError::InvalidDates {
                    rows: vec![2],
                })),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(CoreError::DateFormat(DateFormatError::new("2024/01/01"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(CoreError::Storage(StorageError::Corrupt("bad row".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::BadRequest("missing file".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
