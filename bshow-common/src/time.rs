//! Timestamp utilities and spreadsheet serial dates

use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::Write;

/// Serial day number of 1970-01-01 in the 1899-12-30 spreadsheet epoch
pub const SERIAL_UNIX_EPOCH_OFFSET: f64 = 25569.0;

/// Seconds per serial day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch, used to prefix uploaded file names
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a spreadsheet serial day count into a UTC instant
///
/// Fractional serials carry the time of day. Returns `None` for non-finite
/// input or instants chrono cannot represent.
pub fn serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial - SERIAL_UNIX_EPOCH_OFFSET) * SECONDS_PER_DAY * 1000.0;
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Calendar date (UTC) of a spreadsheet serial day count
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    serial_to_datetime(serial).map(|dt| dt.date_naive())
}

/// Render a serial day count as a short date using a chrono format string
///
/// Returns `None` when the serial is out of range or the format cannot be
/// rendered from a bare date (unknown specifiers, time-of-day or zone fields).
pub fn render_serial_date(serial: f64, format: &str) -> Option<String> {
    let date = serial_to_date(serial)?;
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format)).ok()?;
    Some(rendered)
}

/// Check that `format` renders a calendar date and nothing finer
pub fn check_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!(
            "Date format {:?} has an unknown specifier",
            format
        )));
    }
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
        .ok_or_else(|| Error::Config("Sample date out of range".to_string()))?;
    let mut rendered = String::new();
    write!(rendered, "{}", sample.format(format)).map_err(|_| {
        Error::Config(format!(
            "Date format {:?} needs more than a calendar date",
            format
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMAT;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_now_millis_tracks_now() {
        let before = now().timestamp_millis();
        let millis = now_millis();
        assert!(millis >= before);
    }

    #[test]
    fn test_serial_epoch_is_unix_epoch() {
        assert_eq!(
            serial_to_date(25569.0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
    }

    #[test]
    fn test_serial_45000() {
        // 45000 days after 1899-12-30
        assert_eq!(
            serial_to_date(45000.0),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(
            render_serial_date(45000.0, DEFAULT_DATE_FORMAT).as_deref(),
            Some("3/15/2023")
        );
    }

    #[test]
    fn test_serial_start_of_2023() {
        assert_eq!(
            serial_to_date(44927.0),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
    }

    #[test]
    fn test_fractional_serial_keeps_calendar_day() {
        // 18:00 on 2024-02-13
        let dt = serial_to_datetime(45335.75).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        assert_eq!(dt.format("%H:%M").to_string(), "18:00");
    }

    #[test]
    fn test_custom_format() {
        assert_eq!(
            render_serial_date(45335.0, "%Y-%m-%d").as_deref(),
            Some("2024-02-13")
        );
    }

    #[test]
    fn test_time_of_day_format_renders_nothing() {
        assert_eq!(render_serial_date(45000.0, "%H:%M"), None);
        assert_eq!(render_serial_date(45000.0, "%Y %Z"), None);
    }

    #[test]
    fn test_unknown_specifier_renders_nothing() {
        assert_eq!(render_serial_date(45000.0, "%Q"), None);
        assert_eq!(render_serial_date(45000.0, "%"), None);
    }

    #[test]
    fn test_check_date_format() {
        assert!(check_date_format(DEFAULT_DATE_FORMAT).is_ok());
        assert!(check_date_format("%d.%m.%Y").is_ok());
        assert!(check_date_format("literal").is_ok());
        assert!(matches!(check_date_format("%H:%M"), Err(Error::Config(_))));
        assert!(matches!(check_date_format("%Q"), Err(Error::Config(_))));
        assert!(matches!(check_date_format("%Y-%m-%d %z"), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_finite_serial_rejected() {
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
        assert_eq!(serial_to_datetime(1e300), None);
    }
}
