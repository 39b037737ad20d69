#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use bagtrack_application::AppState;
use bagtrack_bootstrap::AppContext;
use bagtrack_domain::{Clock, RuntimeConfig, ScanEventRepository, ScanInput};
use bagtrack_infrastructure::InMemoryScanRepository;

/// Clock the tests move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        default_since_minutes: 60,
        max_body_bytes: 64 * 1024,
        request_timeout_seconds: 5,
    }
}

pub fn state_with(repo: Arc<dyn ScanEventRepository>, clock: Arc<ManualClock>) -> AppState {
    AppContext::from_parts(runtime_config(), repo, clock).state
}

pub fn memory_state(clock: Arc<ManualClock>) -> AppState {
    state_with(Arc::new(InMemoryScanRepository::new()), clock)
}

pub fn scan_at(bag: &str, gate: &str, location: &str, at: DateTime<Utc>) -> ScanInput {
    ScanInput {
        bag_tag_id: bag.to_string(),
        destination_gate: gate.to_string(),
        location_scanned: location.to_string(),
        timestamp: Some(at),
    }
}
