use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use bagtrack_application::queries::gate_queries;
use bagtrack_application::AppState;
use bagtrack_domain::{ActiveBag, GateCount, WindowQuery};

use crate::error::HttpError;

pub async fn active_bags(
    State(state): State<AppState>,
    Path(destination_gate): Path<String>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<ActiveBag>>, HttpError> {
    let Query(query) = query?;
    let bags = gate_queries::active_bags(&state, &destination_gate, query.since_minutes).await?;
    Ok(Json(bags))
}

pub async fn gate_counts(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<GateCount>>, HttpError> {
    let Query(query) = query?;
    let counts = gate_queries::gate_counts(&state, query.since_minutes).await?;
    Ok(Json(counts))
}
