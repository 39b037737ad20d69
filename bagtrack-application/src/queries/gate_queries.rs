use bagtrack_domain::{
    active_bags as fold_active_bags, gate_counts as fold_gate_counts, sort_recent_first,
    ActiveBag, BagScanView, GateCount, TimeWindow,
};

use super::required_param;
use crate::{AppError, AppState};

pub async fn list_gate_scans(
    state: &AppState,
    destination_gate: &str,
) -> Result<Vec<BagScanView>, AppError> {
    let gate = required_param(destination_gate, "destination_gate")?;
    state.metrics.record_read();
    let mut events = state
        .scan_repo
        .query_by_gate(&gate)
        .await
        .map_err(|err| state.storage_failure("query scans by gate", err))?;
    sort_recent_first(&mut events);
    Ok(events.into_iter().map(BagScanView::from).collect())
}

pub async fn active_bags(
    state: &AppState,
    destination_gate: &str,
    since_minutes: Option<i64>,
) -> Result<Vec<ActiveBag>, AppError> {
    let gate = required_param(destination_gate, "destination_gate")?;
    let window = resolve_window(state, since_minutes)?;
    state.metrics.record_read();
    let events = state
        .scan_repo
        .query_by_gate_since(&gate, window.since)
        .await
        .map_err(|err| state.storage_failure("query gate window", err))?;
    Ok(fold_active_bags(&events, &window))
}

pub async fn gate_counts(
    state: &AppState,
    since_minutes: Option<i64>,
) -> Result<Vec<GateCount>, AppError> {
    let window = resolve_window(state, since_minutes)?;
    state.metrics.record_read();
    let events = state
        .scan_repo
        .query_all_since(window.since)
        .await
        .map_err(|err| state.storage_failure("query all gates window", err))?;
    Ok(fold_gate_counts(&events, &window))
}

fn resolve_window(state: &AppState, since_minutes: Option<i64>) -> Result<TimeWindow, AppError> {
    let minutes = since_minutes.unwrap_or(state.config.default_since_minutes);
    if minutes < 0 {
        return Err(AppError::BadRequest(format!(
            "since_minutes must not be negative (got {})",
            minutes
        )));
    }
    let minutes = u32::try_from(minutes)
        .map_err(|_| AppError::BadRequest(format!("since_minutes too large (got {})", minutes)))?;
    Ok(TimeWindow::trailing(state.clock.now(), minutes))
}
