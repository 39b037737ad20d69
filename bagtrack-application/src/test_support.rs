use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bagtrack_domain::{Clock, NewScanEvent, RuntimeConfig, ScanEvent, ScanEventRepository};
use chrono::{DateTime, TimeZone, Utc};

use crate::{AppState, Metrics};

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Answers every read with the same canned events, or fails every call.
#[derive(Default)]
pub struct StubRepo {
    pub events: Vec<ScanEvent>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubRepo {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_events(events: Vec<ScanEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> anyhow::Result<Vec<ScanEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.events.clone())
    }
}

#[async_trait]
impl ScanEventRepository for StubRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.touch().map(|_| ())
    }

    async fn append(&self, event: NewScanEvent) -> anyhow::Result<ScanEvent> {
        self.touch()?;
        Ok(event.into_stored(42))
    }

    async fn query_by_bag(&self, _bag_tag_id: &str) -> anyhow::Result<Vec<ScanEvent>> {
        self.touch()
    }

    async fn query_by_gate(&self, _destination_gate: &str) -> anyhow::Result<Vec<ScanEvent>> {
        self.touch()
    }

    async fn query_by_gate_since(
        &self,
        _destination_gate: &str,
        _since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScanEvent>> {
        self.touch()
    }

    async fn query_all_since(&self, _since: DateTime<Utc>) -> anyhow::Result<Vec<ScanEvent>> {
        self.touch()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.touch().map(|_| ())
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn state_with(repo: Arc<StubRepo>) -> AppState {
    AppState {
        config: RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            default_since_minutes: 60,
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
        },
        scan_repo: repo,
        clock: Arc::new(FixedClock(now())),
        metrics: Arc::new(Metrics::default()),
    }
}

pub fn scan(id: i64, bag: &str, gate: &str, location: &str, minutes_ago: i64) -> ScanEvent {
    ScanEvent {
        id,
        bag_tag_id: bag.to_string(),
        destination_gate: gate.to_string(),
        location_scanned: location.to_string(),
        timestamp: now() - chrono::Duration::minutes(minutes_ago),
    }
}
