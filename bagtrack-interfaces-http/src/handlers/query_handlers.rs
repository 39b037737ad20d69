use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use bagtrack_application::queries::{bag_queries, gate_queries};
use bagtrack_application::AppState;
use bagtrack_domain::{BagScanQuery, BagScanView};

use crate::error::HttpError;

pub async fn list_bag_scans(
    State(state): State<AppState>,
    Path(bag_tag_id): Path<String>,
    query: Result<Query<BagScanQuery>, QueryRejection>,
) -> Result<Json<Vec<BagScanView>>, HttpError> {
    let Query(query) = query?;
    let latest = query.latest.unwrap_or(false);
    let rows = bag_queries::list_bag_scans(&state, &bag_tag_id, latest).await?;
    Ok(Json(rows))
}

pub async fn list_gate_scans(
    State(state): State<AppState>,
    Path(destination_gate): Path<String>,
) -> Result<Json<Vec<BagScanView>>, HttpError> {
    let rows = gate_queries::list_gate_scans(&state, &destination_gate).await?;
    Ok(Json(rows))
}
