//! Date and duration parsing for user-supplied values.
//!
//! All timestamps are UTC. Inputs that cannot be parsed yield `None` and the
//! caller decides the fallback (current time on append, no filter on query).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Calendar dates, including the display form so rendered dates can be
/// fed back as query bounds
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%a %b %d %Y", "%b %d %Y"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a user-supplied date
///
/// Accepts `YYYY-MM-DD` and display dates such as `Thu Jan 05 2023`
/// (midnight UTC), RFC 3339, and naive date-times which
/// are taken as UTC. Empty or unrecognised input returns `None`.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Render a timestamp as a calendar date, e.g. `Thu Jan 05 2023`
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Parse a duration in whole minutes
///
/// Reads an optional sign and the leading digits, ignoring anything after
/// them, so `"30min"` is 30. Returns `None` when there are no digits.
pub fn parse_duration(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (negative, rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_plain_date_is_utc_midnight() {
        let parsed = parse_date("2023-01-05").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_display_dates() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_date("Thu Jan 05 2023"), Some(expected));
        assert_eq!(parse_date("Jan 05 2023"), Some(expected));
        assert_eq!(parse_date(&display_date(expected)), Some(expected));
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let parsed = parse_date("2023-01-05T10:30:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let parsed = parse_date("2023-03-10T07:15").unwrap();
        assert_eq!(parsed.day(), 10);
        assert_eq!(parsed.hour(), 7);

        let parsed = parse_date("2023-03-10 07:15:42").unwrap();
        assert_eq!(parsed.second(), 42);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2023-13-40").is_none());
    }

    #[test]
    fn test_display_date() {
        let date = Utc.with_ymd_and_hms(2023, 1, 5, 18, 0, 0).unwrap();
        assert_eq!(display_date(date), "Thu Jan 05 2023");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30"), Some(30));
        assert_eq!(parse_duration("  45"), Some(45));
        assert_eq!(parse_duration("30min"), Some(30));
        assert_eq!(parse_duration("12.9"), Some(12));
        assert_eq!(parse_duration("-5"), Some(-5));
        assert_eq!(parse_duration("+7"), Some(7));
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-"), None);
    }
}
