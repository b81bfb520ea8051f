use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`), a naive date-time
/// (`2024-01-15T10:30:00`, fractional seconds allowed) and a bare date
/// (`2024-01-15`). Naive values are taken as UTC; bare dates are midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `M/D/YYYY`, or `Invalid Date` when the value does not parse.
/// Missing values render as an empty string.
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%-m/%-d/%Y").to_string(),
            None => "Invalid Date".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_bare_date_as_utc_midnight() {
        let dt = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_and_offset_datetimes() {
        let naive = parse_timestamp("2024-01-15T10:30:00.123").unwrap();
        assert_eq!(naive.format("%H:%M").to_string(), "10:30");

        let offset = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[test]
    fn formats_like_a_us_locale_date() {
        assert_eq!(format_date(Some("2024-03-05")), "3/5/2024");
        assert_eq!(format_date(Some("2024-12-25T23:59:00")), "12/25/2024");
        assert_eq!(format_date(Some("soon")), "Invalid Date");
        assert_eq!(format_date(None), "");
    }
}
