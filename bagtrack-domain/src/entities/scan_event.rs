// Scan event entity
// One immutable record per tag sighting; the log is append-only

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scan event as stored. `id` is assigned by the store on append and only
/// ever used to break timestamp ties and to acknowledge ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub id: i64,
    pub bag_tag_id: String,
    pub destination_gate: String,
    pub location_scanned: String,
    pub timestamp: DateTime<Utc>,
}

/// Candidate event handed to the store. The timestamp is resolved before
/// append, so stores never consult a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScanEvent {
    pub bag_tag_id: String,
    pub destination_gate: String,
    pub location_scanned: String,
    pub timestamp: DateTime<Utc>,
}

impl NewScanEvent {
    pub fn into_stored(self, id: i64) -> ScanEvent {
        ScanEvent {
            id,
            bag_tag_id: self.bag_tag_id,
            destination_gate: self.destination_gate,
            location_scanned: self.location_scanned,
            timestamp: self.timestamp,
        }
    }
}

/// Ingestion payload as received from a scanner.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanInput {
    pub bag_tag_id: String,
    pub destination_gate: String,
    pub location_scanned: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
}

impl ScanInput {
    /// Trims the identifiers and rejects blanks. `now` stands in for a
    /// missing timestamp. Timestamps are kept at millisecond precision, the
    /// resolution every store persists.
    pub fn into_new_event(self, now: DateTime<Utc>) -> Result<NewScanEvent, ScanValidationError> {
        let bag_tag_id = required_text(self.bag_tag_id, "bag_tag_id")?;
        let destination_gate = required_text(self.destination_gate, "destination_gate")?;
        let location_scanned = required_text(self.location_scanned, "location_scanned")?;
        Ok(NewScanEvent {
            bag_tag_id,
            destination_gate,
            location_scanned,
            timestamp: self.timestamp.unwrap_or(now).trunc_subsecs(3),
        })
    }
}

fn required_text(value: String, field: &'static str) -> Result<String, ScanValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScanValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReceipt {
    pub scan_internal_id: i64,
    pub status: String,
}

impl ScanReceipt {
    pub fn logged(id: i64) -> Self {
        Self {
            scan_internal_id: id,
            status: "logged".to_string(),
        }
    }
}
