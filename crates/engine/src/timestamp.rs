//! Timestamp normalization.
//!
//! Ledger documents carry their point in time in several shapes: ISO-8601
//! text, integer epoch milliseconds or the store's native timestamp object
//! (`{ "seconds": .., "nanoseconds": .. }`). They all resolve to a single
//! `DateTime<Utc>` without losing precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::{EngineError, ResultEngine};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Any timestamp representation accepted at the ledger boundary.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
    EpochMillis(i64),
    Text(String),
    Native(NativeTimestamp),
}

/// Document-store timestamp object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct NativeTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl TimestampInput {
    /// Resolve to a UTC instant.
    pub fn to_utc(&self) -> ResultEngine<DateTime<Utc>> {
        match self {
            Self::EpochMillis(ms) => from_epoch_millis(*ms),
            Self::Text(text) => parse_timestamp(text),
            Self::Native(NativeTimestamp {
                seconds,
                nanoseconds,
            }) => DateTime::<Utc>::from_timestamp(*seconds, *nanoseconds).ok_or_else(|| {
                EngineError::InvalidTimestamp(format!("out of range: {seconds}s {nanoseconds}ns"))
            }),
        }
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Native(NativeTimestamp {
            seconds: value.timestamp(),
            nanoseconds: value.timestamp_subsec_nanos(),
        })
    }
}

/// Parse a textual timestamp.
///
/// Accepts RFC 3339 (any offset), naive date-times (read as UTC), bare
/// `YYYY-MM-DD` dates (midnight UTC) and all-digit epoch milliseconds.
pub fn parse_timestamp(text: &str) -> ResultEngine<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidTimestamp("empty timestamp".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    if trimmed.chars().all(|c| c.is_ascii_digit())
        && let Ok(ms) = trimmed.parse::<i64>()
    {
        return from_epoch_millis(ms);
    }

    Err(EngineError::InvalidTimestamp(format!(
        "unrecognized timestamp: {trimmed:?}"
    )))
}

fn from_epoch_millis(ms: i64) -> ResultEngine<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| EngineError::InvalidTimestamp(format!("out of range: {ms}ms")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn every_representation_resolves_to_the_same_instant() {
        let expected = instant();
        let inputs = [
            TimestampInput::Text("2024-03-01T12:30:00Z".to_string()),
            TimestampInput::Text("2024-03-01T13:30:00+01:00".to_string()),
            TimestampInput::Text("2024-03-01 12:30:00".to_string()),
            TimestampInput::EpochMillis(expected.timestamp_millis()),
            TimestampInput::Text(expected.timestamp_millis().to_string()),
            TimestampInput::Native(NativeTimestamp {
                seconds: expected.timestamp(),
                nanoseconds: 0,
            }),
        ];
        for input in inputs {
            assert_eq!(input.to_utc().unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn native_keeps_sub_second_precision() {
        let native = TimestampInput::Native(NativeTimestamp {
            seconds: 1_700_000_000,
            nanoseconds: 123_456_789,
        });
        let utc = native.to_utc().unwrap();
        assert_eq!(utc.timestamp_subsec_nanos(), 123_456_789);
        assert_eq!(TimestampInput::from(utc).to_utc().unwrap(), utc);
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let utc = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn deserializes_from_json_shapes() {
        let from_number: TimestampInput = serde_json::from_str("1709296200000").unwrap();
        let from_text: TimestampInput = serde_json::from_str("\"2024-03-01T12:30:00Z\"").unwrap();
        let from_object: TimestampInput =
            serde_json::from_str(r#"{"_seconds": 1709296200, "_nanoseconds": 0}"#).unwrap();
        assert_eq!(from_number.to_utc().unwrap(), instant());
        assert_eq!(from_text.to_utc().unwrap(), instant());
        assert_eq!(from_object.to_utc().unwrap(), instant());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(TimestampInput::EpochMillis(i64::MAX).to_utc().is_err());
    }
}
