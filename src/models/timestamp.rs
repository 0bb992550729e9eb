//! Decoding for the timestamps the chat server emits.
//!
//! The server writes naive UTC datetimes (`2024-01-05T12:00:00.123456`).
//! RFC 3339 values with an explicit offset are accepted as well.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_naive_server_timestamp_is_utc() {
        let dt = parse("2024-01-05T12:30:00.123456").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 5, 12, 30, 0).unwrap() + chrono::Duration::microseconds(123456));
    }

    #[test]
    fn test_naive_without_fraction() {
        let dt = parse("2024-01-05T08:00:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse("2024-01-05T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse("yesterday").is_none());
    }
}
