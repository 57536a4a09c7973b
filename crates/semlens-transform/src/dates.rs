//! Lenient date parsing for the timeline view.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use semlens_model::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a cell into a UTC timestamp.
///
/// Strings are tried as RFC 3339, then naive date-times, then plain dates,
/// then a bare four-digit year. Numbers are epoch milliseconds, except
/// integral values in `1000..=9999`, which read as a year.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null | Value::Bool(_) => None,
        Value::Number(n) => parse_number(*n),
        Value::String(text) => parse_text(text.trim()),
    }
}

fn parse_number(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && (1000.0..=9999.0).contains(&n) {
        return year_start(n as i32);
    }
    Utc.timestamp_millis_opt(n as i64).single()
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().and_then(year_start);
    }
    None
}

fn year_start(year: i32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_common_string_forms() {
        for text in [
            "2024-03-05",
            "2024/03/05",
            "03/05/2024",
            "2024-03-05T08:30:00",
            "2024-03-05 08:30",
            "2024-03-05T08:30:00+00:00",
        ] {
            let parsed = parse_date(&Value::from(text)).expect(text);
            assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 5));
        }
    }

    #[test]
    fn numbers_are_years_or_epoch_millis() {
        assert_eq!(parse_date(&Value::Number(1999.0)).unwrap().year(), 1999);
        let epoch = parse_date(&Value::Number(86_400_000.0)).unwrap();
        assert_eq!((epoch.year(), epoch.day()), (1970, 2));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date(&Value::from("soon")).is_none());
        assert!(parse_date(&Value::from("")).is_none());
        assert!(parse_date(&Value::Null).is_none());
        assert!(parse_date(&Value::Bool(true)).is_none());
    }
}
