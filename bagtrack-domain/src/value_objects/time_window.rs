// Trailing time window value object

use chrono::{DateTime, Duration, Utc};

/// Closed interval `[since, until]`. Windowed views only consider events
/// whose timestamp falls inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the last `minutes` minutes up to and including `now`.
    pub fn trailing(now: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            since: now - Duration::minutes(i64::from(minutes)),
            until: now,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.since <= timestamp && timestamp <= self.until
    }
}
