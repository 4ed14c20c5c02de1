use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Clinic-local wall-clock time. The backend stores `LocalDateTime` values
/// without an offset, so every comparison in this crate happens on naive
/// timestamps.
pub type Timestamp = NaiveDateTime;

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp as the backend or a user may write it.
///
/// Accepts ISO local date-times (with or without seconds), a bare
/// `YYYY-MM-DD` (midnight), and RFC 3339 values with an offset, which are
/// converted to their UTC wall time.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    for format in ACCEPTED_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Parse a calendar date typed into a date field (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Serde adapter for the backend's timestamp fields.
pub mod wire {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(WIRE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_backend_local_date_time() {
        assert_eq!(
            parse_timestamp("2025-01-10T14:30:00"),
            Some(ymd_hms(2025, 1, 10, 14, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2025-01-10T14:30"),
            Some(ymd_hms(2025, 1, 10, 14, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2025-01-10T14:30:00.123"),
            Some(
                NaiveDate::from_ymd_opt(2025, 1, 10)
                    .unwrap()
                    .and_hms_milli_opt(14, 30, 0, 123)
                    .unwrap()
            )
        );
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(
            parse_timestamp("2025-01-10"),
            Some(ymd_hms(2025, 1, 10, 0, 0, 0))
        );
    }

    #[test]
    fn parses_rfc3339_as_utc_wall_time() {
        assert_eq!(
            parse_timestamp("2025-01-10T09:00:00-05:00"),
            Some(ymd_hms(2025, 1, 10, 14, 0, 0))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_date("10/01/2025"), None);
        assert_eq!(parse_date(""), None);
    }
}
