//! Date and time parsing for travel requests.
//!
//! Requests carry the travel date as "YYYY-MM-DD" and the time of day as
//! "HH:MM". Both are parsed strictly so that a malformed value is reported
//! to the caller instead of being silently coerced.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when parsing an invalid date or time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct TimeError {
    field: &'static str,
    reason: &'static str,
}

impl TimeError {
    fn time(reason: &'static str) -> Self {
        Self {
            field: "time",
            reason,
        }
    }

    fn date(reason: &'static str) -> Self {
        Self {
            field: "date",
            reason,
        }
    }
}

/// Parse a time of day in "HH:MM" format.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let bytes = s.trim().as_bytes();
    if bytes.len() != 5 {
        return Err(TimeError::time("expected HH:MM format"));
    }
    if bytes[2] != b':' {
        return Err(TimeError::time("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::time("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::time("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::time("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::time("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::time("invalid time"))
}

/// Parse a calendar date in "YYYY-MM-DD" format.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    let s = s.trim();
    if s.len() != 10 {
        return Err(TimeError::date("expected YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TimeError::date("not a calendar date"))
}

/// Parse a date and a time of day into a single timestamp.
pub fn parse_date_time(date: &str, time: &str) -> Result<NaiveDateTime, TimeError> {
    Ok(parse_date(date)?.and_time(parse_hhmm(time)?))
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every valid clock time parses back to itself
        #[test]
        fn valid_times_roundtrip(h in 0u32..24, m in 0u32..60) {
            let s = format!("{:02}:{:02}", h, m);
            let t = parse_hhmm(&s).unwrap();
            prop_assert_eq!(t.format("%H:%M").to_string(), s);
        }

        /// Hours past 23 are rejected
        #[test]
        fn out_of_range_hours_rejected(h in 24u32..100, m in 0u32..60) {
            let s = format!("{:02}:{:02}", h, m);
            prop_assert!(parse_hhmm(&s).is_err());
        }
    }
}
