// Read-side view rows returned to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ScanEvent;

/// History row for bag and gate lookups. The store id stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagScanView {
    pub bag_tag_id: String,
    pub destination_gate: String,
    pub location_scanned: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ScanEvent> for BagScanView {
    fn from(event: &ScanEvent) -> Self {
        Self {
            bag_tag_id: event.bag_tag_id.clone(),
            destination_gate: event.destination_gate.clone(),
            location_scanned: event.location_scanned.clone(),
            timestamp: event.timestamp,
        }
    }
}

impl From<ScanEvent> for BagScanView {
    fn from(event: ScanEvent) -> Self {
        Self {
            bag_tag_id: event.bag_tag_id,
            destination_gate: event.destination_gate,
            location_scanned: event.location_scanned,
            timestamp: event.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBag {
    pub bag_tag_id: String,
    pub last_scan_at: DateTime<Utc>,
    pub last_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCount {
    pub destination_gate: String,
    pub unique_bag_count: u64,
}
