//! Validation utilities for prediction requests
//!
//! Coordinates are checked against the WGS84 ranges and request dates are
//! parsed from the ISO 8601 variants the mobile and web clients send.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use validator::{validate_range, ValidationError};

/// Date-time layouts accepted without a UTC offset, tried in order
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-time layouts carrying a UTC offset (`+09:00` or `+0900`), tried
/// after RFC 3339 so that seconds may be omitted
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

/// Request date could not be interpreted as ISO 8601
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid ISO 8601 date '{input}'")]
pub struct DateParseError {
    pub input: String,
}

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), ValidationError> {
    check_range(latitude, -90.0, 90.0, "latitude must be between -90 and 90")
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), ValidationError> {
    check_range(
        longitude,
        -180.0,
        180.0,
        "longitude must be between -180 and 180",
    )
}

fn check_range(
    value: f64,
    min: f64,
    max: f64,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.is_finite() && validate_range(value, Some(min), Some(max)) {
        return Ok(());
    }
    let mut error = ValidationError::new("range");
    error.message = Some(Cow::Borrowed(message));
    error.add_param(Cow::Borrowed("value"), &value);
    Err(error)
}

// ============================================================================
// Date Parsing
// ============================================================================

/// Parse a request date in ISO 8601 form.
///
/// Offsets are dropped after conversion: `2016-01-05T15:20:00+09:00` yields
/// the wall-clock time 15:20 because the upstream APIs take local KST times.
/// A bare date is interpreted as midnight.
pub fn parse_observation_date(input: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(with_offset) = DateTime::parse_from_str(trimmed, format) {
            return Ok(with_offset.naive_local());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    parse_hour_only(trimmed)
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError {
            input: input.to_string(),
        })
}

/// `YYYY-MM-DDTHH` or `YYYY-MM-DD HH`, on the hour
fn parse_hour_only(input: &str) -> Option<NaiveDateTime> {
    let (date, hour) = input.split_once(|c: char| c == 'T' || c == ' ')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour, 0, 0)
}

/// Validate a `YYYY-MM` month key as used by the visitor statistics table
pub fn validate_year_month(value: &str) -> Result<(), &'static str> {
    if value.len() != 7 || value.as_bytes()[4] != b'-' {
        return Err("Year-month must use the YYYY-MM format");
    }
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "Year-month is not a valid calendar month")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(33.4507).is_ok());
        assert!(validate_latitude(90.0001).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.5).is_err());
    }

    #[test]
    fn test_range_error_carries_message() {
        let error = validate_latitude(120.0).unwrap_err();
        assert_eq!(error.code, "range");
        assert_eq!(
            error.message.as_deref(),
            Some("latitude must be between -90 and 90")
        );
    }

    #[test]
    fn test_parse_naive_datetime() {
        let parsed = parse_observation_date("2016-01-05T15:20:00").unwrap();
        assert_eq!(parsed.year(), 2016);
        assert_eq!(parsed.ordinal(), 5);
        assert_eq!(parsed.hour(), 15);
        assert_eq!(parsed.minute(), 20);
    }

    #[test]
    fn test_parse_without_seconds_and_space_separator() {
        let a = parse_observation_date("2024-07-01T09:05").unwrap();
        let b = parse_observation_date("2024-07-01 09:05").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.minute(), 5);
    }

    #[test]
    fn test_parse_with_offset_keeps_wall_clock() {
        let parsed = parse_observation_date("2016-01-05T15:20:00+09:00").unwrap();
        assert_eq!(parsed.hour(), 15);
        let parsed = parse_observation_date("2016-01-05T06:20:00Z").unwrap();
        assert_eq!(parsed.hour(), 6);
    }

    #[test]
    fn test_parse_offset_without_seconds() {
        let parsed = parse_observation_date("2016-01-05T15:20+09:00").unwrap();
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (15, 20, 0));
        let spaced = parse_observation_date("2016-01-05 15:20+09:00").unwrap();
        assert_eq!(parsed, spaced);
    }

    #[test]
    fn test_parse_offset_without_colon() {
        let parsed = parse_observation_date("2016-01-05T15:20:00+0900").unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (15, 20));
        let short = parse_observation_date("2016-01-05T15:20+0900").unwrap();
        assert_eq!(parsed, short);
        let spaced = parse_observation_date("2016-01-05 15:20:00.5+0900").unwrap();
        assert_eq!(spaced.hour(), 15);
    }

    #[test]
    fn test_parse_hour_only() {
        let parsed = parse_observation_date("2016-01-05T15").unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (15, 0));
        assert_eq!(parse_observation_date("2016-01-05 15").unwrap(), parsed);
        assert!(parse_observation_date("2016-01-05T25").is_err());
        assert!(parse_observation_date("2016-01-05T1").is_err());
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let parsed = parse_observation_date("2024-12-31").unwrap();
        assert_eq!(parsed.ordinal(), 366);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_observation_date("05/01/2016").is_err());
        assert!(parse_observation_date("2016-13-01").is_err());
        let error = parse_observation_date("tomorrow").unwrap_err();
        assert_eq!(error.input, "tomorrow");
    }

    #[test]
    fn test_validate_year_month() {
        assert!(validate_year_month("2024-07").is_ok());
        assert!(validate_year_month("2024-13").is_err());
        assert!(validate_year_month("202407").is_err());
        assert!(validate_year_month("2024/07").is_err());
    }
}
