//! Recurrence rule parsing and single-step advancement.
//!
//! # Responsibility
//! - Turn rule text (`""`, `"y"`, `"d N"`) into a typed `RecurrenceRule`.
//! - Classify every rejected form with a stable error kind.
//!
//! # Invariants
//! - `EveryNDays(n)` always satisfies `1 <= n <= MAX_INTERVAL_DAYS`.
//! - Invalid text never produces a rule value.

use crate::model::date::CalendarDate;
use chrono::{Days, Months};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest accepted day interval for `d N` rules.
pub const MAX_INTERVAL_DAYS: u32 = 400;

const YEARLY_TAG: &str = "y";
const DAILY_TAG: &str = "d";
const MONTHS_PER_YEAR: u32 = 12;

/// Error for rule parsing and projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// Known tag with a missing, extra, or non-positive-integer argument.
    RuleMalformed(String),
    /// `d N` with `N` above `MAX_INTERVAL_DAYS`.
    RuleTooLarge(String),
    /// Unknown tag or empty rule where a rule is required.
    RuleUnsupported(String),
    /// Projection stepped outside the representable calendar range.
    DateOutOfRange(CalendarDate),
}

impl Display for RecurrenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuleMalformed(rule) => write!(f, "malformed repeat rule `{rule}`"),
            Self::RuleTooLarge(rule) => write!(
                f,
                "repeat interval in `{rule}` exceeds {MAX_INTERVAL_DAYS} days"
            ),
            Self::RuleUnsupported(rule) if rule.trim().is_empty() => {
                write!(f, "empty repeat rule")
            }
            Self::RuleUnsupported(rule) => write!(f, "unsupported repeat rule `{rule}`"),
            Self::DateOutOfRange(date) => {
                write!(f, "next occurrence after {date} is out of range")
            }
        }
    }
}

impl Error for RecurrenceError {}

/// Typed recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurrenceRule {
    /// Task does not recur.
    #[default]
    None,
    /// One calendar year per step.
    Yearly,
    /// `n` calendar days per step.
    EveryNDays(u32),
}

impl RecurrenceRule {
    /// Parses a rule that must recur.
    ///
    /// # Errors
    /// - `RuleUnsupported` for empty text or an unknown tag.
    /// - `RuleMalformed` for wrong token count or a non-positive-integer day count.
    /// - `RuleTooLarge` for day counts above `MAX_INTERVAL_DAYS`.
    pub fn parse(text: &str) -> Result<Self, RecurrenceError> {
        let mut tokens = text.split_whitespace();
        let tag = tokens.next();
        let argument = tokens.next();
        let has_extra = tokens.next().is_some();

        match (tag, argument) {
            (Some(YEARLY_TAG), None) => Ok(Self::Yearly),
            (Some(YEARLY_TAG), Some(_)) => Err(RecurrenceError::RuleMalformed(text.to_string())),
            (Some(DAILY_TAG), Some(days)) if !has_extra => parse_interval(text, days),
            (Some(DAILY_TAG), _) => Err(RecurrenceError::RuleMalformed(text.to_string())),
            _ => Err(RecurrenceError::RuleUnsupported(text.to_string())),
        }
    }

    /// Parses a rule where recurrence is optional; blank text means `None`.
    pub fn parse_optional(text: &str) -> Result<Self, RecurrenceError> {
        if text.trim().is_empty() {
            return Ok(Self::None);
        }
        Self::parse(text)
    }

    /// Applies exactly one step of this rule.
    ///
    /// Year steps clamp to the last valid day of the target month, so
    /// Feb 29 advances to Feb 28 in non-leap years.
    pub fn step(self, date: CalendarDate) -> Result<CalendarDate, RecurrenceError> {
        let next = match self {
            Self::Yearly => date.checked_add_months(Months::new(MONTHS_PER_YEAR)),
            Self::EveryNDays(days) => date.checked_add_days(Days::new(u64::from(days))),
            Self::None => return Err(RecurrenceError::RuleUnsupported(String::new())),
        };
        next.ok_or(RecurrenceError::DateOutOfRange(date))
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Yearly => write!(f, "{YEARLY_TAG}"),
            Self::EveryNDays(days) => write!(f, "{DAILY_TAG} {days}"),
        }
    }
}

fn parse_interval(text: &str, token: &str) -> Result<RecurrenceRule, RecurrenceError> {
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RecurrenceError::RuleMalformed(text.to_string()));
    }

    // All-digit tokens that overflow `u32` are still integers, just too large.
    let days = token
        .parse::<u32>()
        .map_err(|_| RecurrenceError::RuleTooLarge(text.to_string()))?;

    match days {
        0 => Err(RecurrenceError::RuleMalformed(text.to_string())),
        days if days > MAX_INTERVAL_DAYS => Err(RecurrenceError::RuleTooLarge(text.to_string())),
        days => Ok(RecurrenceRule::EveryNDays(days)),
    }
}
