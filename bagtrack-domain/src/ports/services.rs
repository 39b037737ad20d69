use chrono::{DateTime, Utc};

/// Source of "now" for ingestion timestamps and trailing windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
