use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{NewScanEvent, ScanEvent};

/// Append-only scan log. Implementations never update or delete stored
/// events; every read is a snapshot reflecting all appends that returned
/// before it began.
#[async_trait]
pub trait ScanEventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Stores the event and returns it with its assigned id. Ids strictly
    /// increase in append order.
    async fn append(&self, event: NewScanEvent) -> anyhow::Result<ScanEvent>;

    /// All events for the bag, most recent first (ties: larger id first).
    async fn query_by_bag(&self, bag_tag_id: &str) -> anyhow::Result<Vec<ScanEvent>>;

    /// All events routed to the gate, most recent first (ties: larger id first).
    async fn query_by_gate(&self, destination_gate: &str) -> anyhow::Result<Vec<ScanEvent>>;

    /// Events routed to the gate with `timestamp >= since`, in no particular order.
    async fn query_by_gate_since(
        &self,
        destination_gate: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScanEvent>>;

    /// Events for every gate with `timestamp >= since`, in no particular order.
    async fn query_all_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<ScanEvent>>;

    async fn ping(&self) -> anyhow::Result<()>;
}
