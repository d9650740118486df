//! Task lifecycle policy.
//!
//! # Responsibility
//! - Normalize a task date on create/edit so stored dates are never stale.
//! - Decide whether completing a task deletes it or reschedules it.
//!
//! # Invariants
//! - Pure: callers own persistence and error surfacing.
//! - Past dates become either `today` (no rule) or the next occurrence.
//! - Future dates pass through unchanged.
//! - A completion error never implies a deletion.

use crate::model::date::{parse_calendar_date, CalendarDate, DateParseError};
use crate::model::task::{Task, TaskDraft, TaskRecord};
use crate::recurrence::{next_occurrence, RecurrenceError, RecurrenceRule};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for lifecycle decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Candidate date from input is not `YYYYMMDD`.
    InvalidDate(DateParseError),
    /// Date already in storage does not parse.
    CorruptState(String),
    /// Title is empty after trimming.
    EmptyTitle,
    /// Rule parse or projection failure.
    Recurrence(RecurrenceError),
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::CorruptState(details) => write!(f, "corrupt stored task: {details}"),
            Self::EmptyTitle => write!(f, "empty title"),
            Self::Recurrence(err) => write!(f, "can't get next date: {err}"),
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::Recurrence(err) => Some(err),
            Self::CorruptState(_) | Self::EmptyTitle => None,
        }
    }
}

impl From<RecurrenceError> for LifecycleError {
    fn from(value: RecurrenceError) -> Self {
        Self::Recurrence(value)
    }
}

impl From<DateParseError> for LifecycleError {
    fn from(value: DateParseError) -> Self {
        Self::InvalidDate(value)
    }
}

/// Result of completing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Non-recurring task; remove it from the store.
    Deleted,
    /// Recurring task; persist it with this date.
    Rescheduled(CalendarDate),
}

/// Computes the effective date for a newly created or edited task.
///
/// # Errors
/// - `InvalidDate` when `candidate` is present but not `YYYYMMDD`.
/// - `Recurrence` when a past date must be projected with an invalid rule.
pub fn normalize_on_create(
    candidate: Option<&str>,
    today: CalendarDate,
    rule: &str,
) -> Result<CalendarDate, LifecycleError> {
    let date = match candidate.filter(|value| !value.is_empty()) {
        Some(value) => parse_calendar_date(value)?,
        None => today,
    };

    if date >= today {
        return Ok(date);
    }

    if rule.trim().is_empty() {
        return Ok(today);
    }

    Ok(next_occurrence(date, today, rule)?)
}

/// Decides what completing `record` means at `now`.
///
/// # Errors
/// - `CorruptState` when the stored date does not parse.
/// - `Recurrence` when the stored rule no longer projects.
pub fn advance_on_completion(
    record: &TaskRecord,
    now: CalendarDate,
) -> Result<CompletionOutcome, LifecycleError> {
    if record.repeat.trim().is_empty() {
        return Ok(CompletionOutcome::Deleted);
    }

    let stored = parse_calendar_date(&record.date).map_err(|err| {
        LifecycleError::CorruptState(format!("task {}: {err}", describe_id(record)))
    })?;
    let next = next_occurrence(stored, now, &record.repeat)?;
    Ok(CompletionOutcome::Rescheduled(next))
}

/// Builds a validated task from request fields.
///
/// The repeat text is validated even when the date needs no projection, so
/// an unusable rule is never stored.
///
/// # Errors
/// - `EmptyTitle`, `InvalidDate`, or `Recurrence`.
pub fn build_task(draft: &TaskDraft, today: CalendarDate) -> Result<Task, LifecycleError> {
    if draft.title.trim().is_empty() {
        return Err(LifecycleError::EmptyTitle);
    }

    let repeat = RecurrenceRule::parse_optional(&draft.repeat)?;
    let date = normalize_on_create(draft.date.as_deref(), today, &draft.repeat)?;

    Ok(Task {
        id: draft.id,
        date,
        title: draft.title.clone(),
        comment: draft.comment.clone(),
        repeat,
    })
}

fn describe_id(record: &TaskRecord) -> String {
    record
        .id
        .map_or_else(|| "<unsaved>".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::{build_task, normalize_on_create, LifecycleError};
    use crate::model::task::TaskDraft;
    use crate::recurrence::{RecurrenceError, RecurrenceRule};
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn empty_candidate_means_today() {
        let today = ymd(2024, 6, 1);
        assert_eq!(normalize_on_create(Some(""), today, "d 3"), Ok(today));
    }

    #[test]
    fn build_task_rejects_blank_title() {
        let draft = TaskDraft {
            title: "   ".to_string(),
            ..TaskDraft::default()
        };
        assert_eq!(
            build_task(&draft, ymd(2024, 6, 1)),
            Err(LifecycleError::EmptyTitle)
        );
    }

    #[test]
    fn build_task_validates_rule_for_future_dates() {
        let draft = TaskDraft {
            date: Some("20300101".to_string()),
            title: "renew passport".to_string(),
            repeat: "m 1".to_string(),
            ..TaskDraft::default()
        };
        assert!(matches!(
            build_task(&draft, ymd(2024, 6, 1)),
            Err(LifecycleError::Recurrence(RecurrenceError::RuleUnsupported(_)))
        ));
    }

    #[test]
    fn build_task_keeps_fields_and_parses_rule() {
        let draft = TaskDraft {
            id: Some(9),
            date: Some("20240520".to_string()),
            title: "water plants".to_string(),
            comment: "balcony".to_string(),
            repeat: "d 7".to_string(),
        };
        let task = build_task(&draft, ymd(2024, 6, 1)).unwrap();
        assert_eq!(task.id, Some(9));
        assert_eq!(task.date, ymd(2024, 6, 3));
        assert_eq!(task.comment, "balcony");
        assert_eq!(task.repeat, RecurrenceRule::EveryNDays(7));
    }
}
