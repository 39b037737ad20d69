use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::info;

use bagtrack_domain::{NewScanEvent, ScanEvent, ScanEventRepository};

use crate::utils::{offset_to_utc, utc_to_offset};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct ScanEventRow {
    id: i64,
    bag_tag_id: String,
    destination_gate: String,
    location_scanned: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    timestamp: OffsetDateTime,
}

impl ScanEventRow {
    fn into_event(self) -> Result<ScanEvent> {
        Ok(ScanEvent {
            id: self.id,
            bag_tag_id: self.bag_tag_id,
            destination_gate: self.destination_gate,
            location_scanned: self.location_scanned,
            timestamp: offset_to_utc(self.timestamp)?,
        })
    }
}

/// ClickHouse-backed scan log. ClickHouse has no autoincrement, so ids are
/// handed out here, seeded from `max(id)` by `ensure_schema`. Only one
/// writer process may point at a table.
pub struct ClickhouseScanRepository {
    client: Client,
    database: String,
    last_id: Mutex<i64>,
}

impl ClickhouseScanRepository {
    pub fn new(client: Client, database: String) -> Self {
        Self {
            client,
            database,
            last_id: Mutex::new(0),
        }
    }

    async fn fetch_rows(&self, query: clickhouse::query::Query) -> Result<Vec<ScanEvent>> {
        let rows = query.fetch_all::<ScanEventRow>().await?;
        rows.into_iter().map(ScanEventRow::into_event).collect()
    }
}

#[async_trait]
impl ScanEventRepository for ClickhouseScanRepository {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_scans = r#"
CREATE TABLE IF NOT EXISTS bag_scans (
    id Int64,
    bag_tag_id String,
    destination_gate String,
    location_scanned String,
    timestamp DateTime64(3)
) ENGINE = MergeTree
ORDER BY (destination_gate, bag_tag_id, timestamp, id)
"#;
        self.client.query(create_scans).execute().await?;

        let max_id: i64 = self
            .client
            .query("SELECT max(id) FROM bag_scans")
            .fetch_one()
            .await?;
        *self.last_id.lock().await = max_id;
        info!("clickhouse scan log ready in {} (last id {})", self.database, max_id);
        Ok(())
    }

    async fn append(&self, event: NewScanEvent) -> Result<ScanEvent> {
        // Held across the insert so ids land in append order.
        let mut last_id = self.last_id.lock().await;
        let id = *last_id + 1;

        let mut insert = self.client.insert("bag_scans")?;
        insert
            .write(&ScanEventRow {
                id,
                bag_tag_id: event.bag_tag_id.clone(),
                destination_gate: event.destination_gate.clone(),
                location_scanned: event.location_scanned.clone(),
                timestamp: utc_to_offset(event.timestamp),
            })
            .await?;
        insert.end().await?;

        *last_id = id;
        Ok(event.into_stored(id))
    }

    async fn query_by_bag(&self, bag_tag_id: &str) -> Result<Vec<ScanEvent>> {
        let query = self
            .client
            .query(
                "SELECT ?fields FROM bag_scans WHERE bag_tag_id = ? \
                 ORDER BY timestamp DESC, id DESC",
            )
            .bind(bag_tag_id);
        self.fetch_rows(query).await
    }

    async fn query_by_gate(&self, destination_gate: &str) -> Result<Vec<ScanEvent>> {
        let query = self
            .client
            .query(
                "SELECT ?fields FROM bag_scans WHERE destination_gate = ? \
                 ORDER BY timestamp DESC, id DESC",
            )
            .bind(destination_gate);
        self.fetch_rows(query).await
    }

    async fn query_by_gate_since(
        &self,
        destination_gate: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScanEvent>> {
        let query = self
            .client
            .query(
                "SELECT ?fields FROM bag_scans WHERE destination_gate = ? \
                 AND timestamp >= fromUnixTimestamp64Milli(toInt64(?))",
            )
            .bind(destination_gate)
            .bind(since.timestamp_millis());
        self.fetch_rows(query).await
    }

    async fn query_all_since(&self, since: DateTime<Utc>) -> Result<Vec<ScanEvent>> {
        let query = self
            .client
            .query("SELECT ?fields FROM bag_scans WHERE timestamp >= fromUnixTimestamp64Milli(toInt64(?))")
            .bind(since.timestamp_millis());
        self.fetch_rows(query).await
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
