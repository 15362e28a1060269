// StashScope - core/datefmt.rs
//
// Display formatting for the Date column: `MM/DD/YY h:mm AM|PM`.
// Values that cannot be read as a date are shown unchanged.

use crate::core::parser::strip_outer_quotes;
use crate::util::error::DateError;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Date-time layouts without an offset, tried in order. Interpreted as
/// local time.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// ISO date-only layout. Read as UTC midnight, then shown in local time.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Other date-only layouts, taken as local midnight.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y"];

/// Format a date value for display, or return it unchanged when it cannot
/// be parsed.
pub fn format_date(raw: &str) -> String {
    match try_format_date(raw) {
        Ok(s) => s,
        Err(e) => {
            tracing::trace!(error = %e, "Date shown unformatted");
            raw.to_string()
        }
    }
}

/// Format a date value, reporting `DateError::Unparseable` on failure.
pub fn try_format_date(raw: &str) -> Result<String, DateError> {
    parse_local(raw).map(render)
}

/// Parse a date value (outer quotes stripped) to a local wall-clock time.
pub fn parse_local(raw: &str) -> Result<NaiveDateTime, DateError> {
    let s = strip_outer_quotes(raw).trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt);
        }
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, ISO_DATE_FORMAT) {
        if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
            return Ok(utc_to_local(ndt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(nd) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
                return Ok(ndt);
            }
        }
    }

    Err(DateError::Unparseable {
        raw: raw.to_string(),
    })
}

fn utc_to_local(ndt: NaiveDateTime) -> NaiveDateTime {
    DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc)
        .with_timezone(&Local)
        .naive_local()
}

fn render(ndt: NaiveDateTime) -> String {
    let (is_pm, hour12) = ndt.hour12();
    format!(
        "{:02}/{:02}/{:02} {}:{:02} {}",
        ndt.month(),
        ndt.day(),
        ndt.year().rem_euclid(100),
        hour12,
        ndt.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_t_separator() {
        assert_eq!(format_date("2024-01-05T03:15:00"), "01/05/24 3:15 AM");
    }

    #[test]
    fn test_unparseable_returned_unchanged() {
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(format_date("\"not-a-date\""), "\"not-a-date\"");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_unparseable_is_idempotent() {
        let once = format_date("garbage 12");
        assert_eq!(format_date(&once), once);
    }

    #[test]
    fn test_try_format_reports_error() {
        let err = try_format_date("nope").unwrap_err();
        assert_eq!(err, DateError::Unparseable { raw: "nope".to_string() });
    }

    #[test]
    fn test_quotes_stripped_before_parse() {
        assert_eq!(format_date("\"2024-01-05 14:30\""), "01/05/24 2:30 PM");
    }

    #[test]
    fn test_midnight_and_noon_render_as_twelve() {
        assert_eq!(format_date("2024-03-09 00:05:00"), "03/09/24 12:05 AM");
        assert_eq!(format_date("2024-03-09 12:00:00"), "03/09/24 12:00 PM");
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(format_date("2024-12-31T23:59:59.123"), "12/31/24 11:59 PM");
    }

    #[test]
    fn test_iso_date_only_is_utc_midnight() {
        let expected = DateTime::parse_from_rfc3339("2024-01-05T00:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(format_date("2024-01-05"), render(expected));
    }

    #[test]
    fn test_slash_date_only_is_local_midnight() {
        assert_eq!(format_date("2025/07/04"), "07/04/25 12:00 AM");
        assert_eq!(format_date("07/04/2025"), "07/04/25 12:00 AM");
    }

    #[test]
    fn test_slash_layouts() {
        assert_eq!(format_date("2024/02/29 09:07"), "02/29/24 9:07 AM");
        assert_eq!(format_date("11/30/2023 18:45:10"), "11/30/23 6:45 PM");
    }

    #[test]
    fn test_offset_converted_to_local() {
        let expected = DateTime::parse_from_rfc3339("2024-01-05T03:15:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(format_date("2024-01-05T03:15:00Z"), render(expected));
    }

    #[test]
    fn test_invalid_calendar_date_unparseable() {
        assert_eq!(format_date("2023-02-30 10:00"), "2023-02-30 10:00");
    }
}
