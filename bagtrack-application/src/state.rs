use std::sync::Arc;

use bagtrack_domain::ports::{Clock, ScanEventRepository};
use bagtrack_domain::RuntimeConfig;
use tracing::error;

use crate::{AppError, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub scan_repo: Arc<dyn ScanEventRepository>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Logs and counts a failed store call, then hands back the error the
    /// caller should propagate.
    pub fn storage_failure(&self, operation: &str, err: anyhow::Error) -> AppError {
        error!("{} failed: {:#}", operation, err);
        self.metrics.record_storage_error();
        AppError::StorageUnavailable(err)
    }
}
