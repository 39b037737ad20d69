use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bagtrack_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    ServiceUnavailable(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::StorageUnavailable(err) => {
                HttpError::ServiceUnavailable(format!("storage unavailable: {}", err))
            }
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(value: QueryRejection) -> Self {
        HttpError::BadRequest(value.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("bad request: {}", msg)),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
