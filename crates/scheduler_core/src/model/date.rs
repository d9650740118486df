//! Calendar date model and its external `YYYYMMDD` form.
//!
//! # Responsibility
//! - Name the calendar-date type shared by recurrence and lifecycle code.
//! - Parse and format the 8-digit wire/storage representation.
//!
//! # Invariants
//! - A `CalendarDate` carries no time-of-day and no timezone.
//! - Only exactly 8 ASCII digits naming a real date are accepted.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pure calendar day, compared and advanced at day/year granularity.
pub type CalendarDate = NaiveDate;

/// `chrono` format string for the external date representation.
pub const DATE_FORMAT: &str = "%Y%m%d";

const DATE_TEXT_LEN: usize = 8;

/// Error for text that is not a valid `YYYYMMDD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub input: String,
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date `{}`; expected YYYYMMDD", self.input)
    }
}

impl Error for DateParseError {}

/// Parses an 8-digit `YYYYMMDD` string into a calendar date.
///
/// # Errors
/// - Returns `DateParseError` for wrong length, non-digit characters, or
///   impossible dates such as `20230229`.
pub fn parse_calendar_date(value: &str) -> Result<CalendarDate, DateParseError> {
    let invalid = || DateParseError {
        input: value.to_string(),
    };

    // chrono accepts short numeric fields, so width is checked up front.
    if value.len() != DATE_TEXT_LEN || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Formats a calendar date as `YYYYMMDD`.
pub fn format_calendar_date(date: CalendarDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
