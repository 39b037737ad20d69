use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use tracing::info;

use bagtrack_domain::{NewScanEvent, ScanEvent, ScanEventRepository};

use crate::utils::millis_to_utc;

const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bag_scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bag_tag_id TEXT NOT NULL,
    destination_gate TEXT NOT NULL,
    location_scanned TEXT NOT NULL,
    timestamp INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bag_scans_bag ON bag_scans(bag_tag_id, timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_bag_scans_gate ON bag_scans(destination_gate, timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_bag_scans_timestamp ON bag_scans(timestamp);
"#;

const SELECT_BY_BAG: &str = "SELECT id, bag_tag_id, destination_gate, location_scanned, timestamp \
     FROM bag_scans WHERE bag_tag_id = ?1 ORDER BY timestamp DESC, id DESC";
const SELECT_BY_GATE: &str = "SELECT id, bag_tag_id, destination_gate, location_scanned, timestamp \
     FROM bag_scans WHERE destination_gate = ?1 ORDER BY timestamp DESC, id DESC";
const SELECT_BY_GATE_SINCE: &str = "SELECT id, bag_tag_id, destination_gate, location_scanned, timestamp \
     FROM bag_scans WHERE destination_gate = ?1 AND timestamp >= ?2";
const SELECT_ALL_SINCE: &str = "SELECT id, bag_tag_id, destination_gate, location_scanned, timestamp \
     FROM bag_scans WHERE timestamp >= ?1";

/// SQLite-backed scan log. The connection lives behind a mutex and every
/// call runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteScanRepository {
    conn: Arc<Mutex<Connection>>,
}

struct ScanRow {
    id: i64,
    bag_tag_id: String,
    destination_gate: String,
    location_scanned: String,
    timestamp_ms: i64,
}

impl ScanRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            bag_tag_id: row.get(1)?,
            destination_gate: row.get(2)?,
            location_scanned: row.get(3)?,
            timestamp_ms: row.get(4)?,
        })
    }

    fn into_event(self) -> Result<ScanEvent> {
        Ok(ScanEvent {
            id: self.id,
            bag_tag_id: self.bag_tag_id,
            destination_gate: self.destination_gate,
            location_scanned: self.location_scanned,
            timestamp: millis_to_utc(self.timestamp_ms)?,
        })
    }
}

impl SqliteScanRepository {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                anyhow!(
                    "failed to create database directory {}: {}",
                    parent.display(),
                    err
                )
            })?;
        }
        let conn = Connection::open(db_path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        info!("sqlite scan log opened at {} (journal_mode={})", db_path.display(), mode);
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| anyhow!("sqlite connection mutex poisoned"))?;
            f(&mut *guard).map_err(anyhow::Error::from)
        })
        .await
        .map_err(|err| anyhow!("sqlite task failed: {}", err))?
    }

    async fn fetch(&self, sql: &'static str, args: Vec<Value>) -> Result<Vec<ScanEvent>> {
        let rows = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare_cached(sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args.iter()), ScanRow::read)?
                    .collect::<rusqlite::Result<Vec<_>>>();
                rows
            })
            .await?;
        rows.into_iter().map(ScanRow::into_event).collect()
    }
}

#[async_trait]
impl ScanEventRepository for SqliteScanRepository {
    async fn ensure_schema(&self) -> Result<()> {
        self.with_conn(|conn| conn.execute_batch(CREATE_SCHEMA)).await
    }

    async fn append(&self, event: NewScanEvent) -> Result<ScanEvent> {
        let timestamp_ms = event.timestamp.timestamp_millis();
        let row = event.clone();
        let id = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO bag_scans (bag_tag_id, destination_gate, location_scanned, timestamp) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        row.bag_tag_id,
                        row.destination_gate,
                        row.location_scanned,
                        timestamp_ms
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(event.into_stored(id))
    }

    async fn query_by_bag(&self, bag_tag_id: &str) -> Result<Vec<ScanEvent>> {
        self.fetch(SELECT_BY_BAG, vec![Value::Text(bag_tag_id.to_string())])
            .await
    }

    async fn query_by_gate(&self, destination_gate: &str) -> Result<Vec<ScanEvent>> {
        self.fetch(SELECT_BY_GATE, vec![Value::Text(destination_gate.to_string())])
            .await
    }

    async fn query_by_gate_since(
        &self,
        destination_gate: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScanEvent>> {
        self.fetch(
            SELECT_BY_GATE_SINCE,
            vec![
                Value::Text(destination_gate.to_string()),
                Value::Integer(since.timestamp_millis()),
            ],
        )
        .await
    }

    async fn query_all_since(&self, since: DateTime<Utc>) -> Result<Vec<ScanEvent>> {
        self.fetch(SELECT_ALL_SINCE, vec![Value::Integer(since.timestamp_millis())])
            .await
    }

    async fn ping(&self) -> Result<()> {
        let _: i64 = self
            .with_conn(|conn| conn.query_row("SELECT 1", [], |row| row.get(0)))
            .await?;
        Ok(())
    }
}
