use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::warn;

use bagtrack_application::commands::scan_commands;
use bagtrack_application::AppState;
use bagtrack_domain::ScanReceipt;

use crate::error::HttpError;
use crate::middleware::{parse_scan, ScanBodyError};

pub async fn log_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<ScanReceipt>, HttpError> {
    let input = parse_scan(&headers, &body, state.config.max_body_bytes).map_err(|err| {
        warn!("failed to parse scan body: {}", err);
        state.metrics.record_rejected_scan();
        match err {
            ScanBodyError::TooLarge(_) => HttpError::PayloadTooLarge(err.to_string()),
            ScanBodyError::Invalid(_) => HttpError::BadRequest(err.to_string()),
        }
    })?;
    let receipt = scan_commands::log_scan(&state, input).await?;
    Ok(Json(receipt))
}
