use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    scans_logged: AtomicU64,
    scans_rejected: AtomicU64,
    reads: AtomicU64,
    storage_errors: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self) {
        self.scans_logged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_scan(&self) {
        self.scans_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_storage_error(&self) {
        self.storage_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scans_logged(&self) -> u64 {
        self.scans_logged.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let logged = self.scans_logged.load(Ordering::Relaxed);
        let rejected = self.scans_rejected.load(Ordering::Relaxed);
        let reads = self.reads.load(Ordering::Relaxed);
        let storage_errors = self.storage_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE bagtrack_scans_logged_total counter\n\
bagtrack_scans_logged_total {}\n\
# TYPE bagtrack_scans_rejected_total counter\n\
bagtrack_scans_rejected_total {}\n\
# TYPE bagtrack_reads_total counter\n\
bagtrack_reads_total {}\n\
# TYPE bagtrack_storage_errors_total counter\n\
bagtrack_storage_errors_total {}\n",
            logged, rejected, reads, storage_errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_reflects_counters() {
        let metrics = Metrics::default();
        metrics.record_scan();
        metrics.record_scan();
        metrics.record_storage_error();
        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("bagtrack_scans_logged_total 2\n"));
        assert!(rendered.contains("bagtrack_storage_errors_total 1\n"));
        assert!(rendered.contains("bagtrack_reads_total 0\n"));
    }
}
