use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use time::OffsetDateTime;

pub fn millis_to_utc(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| anyhow!("timestamp out of range: {}ms", ms))
}

pub fn utc_to_offset(timestamp: DateTime<Utc>) -> OffsetDateTime {
    let nanos = i128::from(timestamp.timestamp_millis()).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn offset_to_utc(timestamp: OffsetDateTime) -> Result<DateTime<Utc>> {
    let millis = timestamp.unix_timestamp_nanos() / 1_000_000;
    let millis = i64::try_from(millis).map_err(|_| anyhow!("timestamp out of range: {}", timestamp))?;
    millis_to_utc(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_conversion_keeps_millisecond_precision() {
        let original = millis_to_utc(1_714_564_800_123).expect("valid millis");
        let offset = utc_to_offset(original);
        assert_eq!(offset.unix_timestamp(), 1_714_564_800);
        assert_eq!(offset_to_utc(offset).expect("back"), original);
    }
}
