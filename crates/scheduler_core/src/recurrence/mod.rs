//! Recurrence engine.
//!
//! # Responsibility
//! - Project a base date forward to the first occurrence strictly after a
//!   reference date.
//!
//! # Invariants
//! - Pure: no I/O, no logging, no shared state.
//! - At least one step is always applied, even when `base > reference`.
//! - The returned date is strictly after `reference`.

pub mod rule;

use crate::model::date::CalendarDate;
use chrono::Days;

pub use rule::{RecurrenceError, RecurrenceRule, MAX_INTERVAL_DAYS};

/// Parses `rule` and returns the first occurrence after `reference`.
///
/// # Errors
/// - Any `RecurrenceError` from `RecurrenceRule::parse`; an empty rule is
///   `RuleUnsupported`.
/// - `DateOutOfRange` when stepping leaves the supported calendar range.
pub fn next_occurrence(
    base: CalendarDate,
    reference: CalendarDate,
    rule: &str,
) -> Result<CalendarDate, RecurrenceError> {
    let parsed = RecurrenceRule::parse(rule)?;
    project(parsed, base, reference)
}

/// Projects `base` with an already parsed rule.
pub fn project(
    rule: RecurrenceRule,
    base: CalendarDate,
    reference: CalendarDate,
) -> Result<CalendarDate, RecurrenceError> {
    match rule {
        RecurrenceRule::EveryNDays(days) => project_days(base, reference, days),
        RecurrenceRule::Yearly => {
            let mut next = rule.step(base)?;
            while next <= reference {
                next = rule.step(next)?;
            }
            Ok(next)
        }
        RecurrenceRule::None => Err(RecurrenceError::RuleUnsupported(String::new())),
    }
}

fn project_days(
    base: CalendarDate,
    reference: CalendarDate,
    days: u32,
) -> Result<CalendarDate, RecurrenceError> {
    let interval = u64::from(days);
    let steps = if base > reference {
        1
    } else {
        // `base <= reference`, so the day gap is non-negative.
        let gap = (reference - base).num_days().unsigned_abs();
        gap / interval + 1
    };

    steps
        .checked_mul(interval)
        .and_then(|offset| base.checked_add_days(Days::new(offset)))
        .ok_or(RecurrenceError::DateOutOfRange(base))
}
