use tracing::{debug, warn};

use crate::{AppError, AppState};
use bagtrack_domain::{ScanInput, ScanReceipt};

pub async fn log_scan(state: &AppState, input: ScanInput) -> Result<ScanReceipt, AppError> {
    let event = input.into_new_event(state.clock.now()).map_err(|err| {
        warn!("rejected scan: {}", err);
        state.metrics.record_rejected_scan();
        AppError::BadRequest(err.to_string())
    })?;

    let stored = state
        .scan_repo
        .append(event)
        .await
        .map_err(|err| state.storage_failure("append scan", err))?;

    debug!(
        "logged scan id={} bag={} gate={} location={}",
        stored.id, stored.bag_tag_id, stored.destination_gate, stored.location_scanned
    );
    state.metrics.record_scan();
    Ok(ScanReceipt::logged(stored.id))
}
