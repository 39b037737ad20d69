use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use bagtrack_domain::{sort_recent_first, NewScanEvent, ScanEvent, ScanEventRepository};

/// Process-local scan log. Appends serialize on the write lock, which is
/// also where ids are handed out.
#[derive(Debug, Default)]
pub struct InMemoryScanRepository {
    log: RwLock<ScanLog>,
}

#[derive(Debug, Default)]
struct ScanLog {
    events: Vec<ScanEvent>,
    last_id: i64,
}

impl InMemoryScanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<ScanEvent>
    where
        F: Fn(&ScanEvent) -> bool,
    {
        let log = self.log.read().await;
        log.events
            .iter()
            .filter(|event| predicate(event))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ScanEventRepository for InMemoryScanRepository {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn append(&self, event: NewScanEvent) -> anyhow::Result<ScanEvent> {
        let mut log = self.log.write().await;
        log.last_id += 1;
        let stored = event.into_stored(log.last_id);
        log.events.push(stored.clone());
        Ok(stored)
    }

    async fn query_by_bag(&self, bag_tag_id: &str) -> anyhow::Result<Vec<ScanEvent>> {
        let mut events = self.select(|event| event.bag_tag_id == bag_tag_id).await;
        sort_recent_first(&mut events);
        Ok(events)
    }

    async fn query_by_gate(&self, destination_gate: &str) -> anyhow::Result<Vec<ScanEvent>> {
        let mut events = self
            .select(|event| event.destination_gate == destination_gate)
            .await;
        sort_recent_first(&mut events);
        Ok(events)
    }

    async fn query_by_gate_since(
        &self,
        destination_gate: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScanEvent>> {
        Ok(self
            .select(|event| event.destination_gate == destination_gate && event.timestamp >= since)
            .await)
    }

    async fn query_all_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<ScanEvent>> {
        Ok(self.select(|event| event.timestamp >= since).await)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
