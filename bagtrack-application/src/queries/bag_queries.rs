use bagtrack_domain::{sort_recent_first, BagScanView, ScanEvent};

use super::required_param;
use crate::{AppError, AppState};

/// Full history for a bag, most recent first, or only its latest scan.
pub async fn list_bag_scans(
    state: &AppState,
    bag_tag_id: &str,
    latest: bool,
) -> Result<Vec<BagScanView>, AppError> {
    if latest {
        let scan = latest_scan(state, bag_tag_id).await?;
        return Ok(vec![BagScanView::from(scan)]);
    }

    let bag_tag_id = required_param(bag_tag_id, "bag_tag_id")?;
    state.metrics.record_read();
    let mut events = state
        .scan_repo
        .query_by_bag(&bag_tag_id)
        .await
        .map_err(|err| state.storage_failure("query scans by bag", err))?;
    sort_recent_first(&mut events);
    Ok(events.into_iter().map(BagScanView::from).collect())
}

pub async fn latest_scan(state: &AppState, bag_tag_id: &str) -> Result<ScanEvent, AppError> {
    let bag_tag_id = required_param(bag_tag_id, "bag_tag_id")?;
    state.metrics.record_read();
    let events = state
        .scan_repo
        .query_by_bag(&bag_tag_id)
        .await
        .map_err(|err| state.storage_failure("query scans by bag", err))?;
    bagtrack_domain::latest_scan(&events)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no scans found for bag '{}'", bag_tag_id)))
}
