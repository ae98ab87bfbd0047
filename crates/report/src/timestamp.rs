//! Timestamp normalisation.
//!
//! `powercfg` writes ISO-8601 in the XML report, but older builds and
//! hand-exported files carry locale formatted strings. Everything is reduced
//! to a naive local wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse a scan timestamp. Offsets are dropped, keeping the wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parse a history date. Any time-of-day component is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_timestamp(raw).map(|dt| dt.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_iso_timestamps() {
        let expected = ymd_hms(2024, 1, 15, 10, 0, 0);
        assert_eq!(parse_timestamp("2024-01-15T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("  2024-01-15T10:00:00  "), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-15T10:00:00.1234567").map(|t| t.date()),
            Some(expected.date())
        );
    }

    #[test]
    fn test_offset_is_dropped() {
        assert_eq!(
            parse_timestamp("2024-01-15T10:00:00+02:00"),
            Some(ymd_hms(2024, 1, 15, 10, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15T08:00:00Z"),
            Some(ymd_hms(2024, 1, 15, 8, 0, 0))
        );
    }

    #[test]
    fn test_locale_timestamps() {
        assert_eq!(
            parse_timestamp("01/15/2024 10:00:00 PM"),
            Some(ymd_hms(2024, 1, 15, 22, 0, 0))
        );
        assert_eq!(
            parse_timestamp("15.01.2024 10:00:00"),
            Some(ymd_hms(2024, 1, 15, 10, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15"),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_invalid_timestamps() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45T10:00:00"), None);
    }

    #[test]
    fn test_parse_date_drops_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(parse_date("2024-02-01"), expected);
        assert_eq!(parse_date("2024-02-01T00:00:00"), expected);
        assert_eq!(parse_date("2024-02-01T23:59:59"), expected);
        assert_eq!(parse_date("02/01/2024"), expected);
        assert_eq!(parse_date("not a date"), None);
    }
}
