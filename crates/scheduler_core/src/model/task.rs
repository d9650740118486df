//! Task domain model, stored row shape, and wire shapes.
//!
//! # Responsibility
//! - Define the typed `Task` produced by the lifecycle policy.
//! - Define `TaskRecord`, the text-column row kept by the store.
//! - Define request input (`TaskDraft`) and JSON wire shapes (`TaskDto`).
//!
//! # Invariants
//! - A `Task` always has a non-empty title and a parsed rule.
//! - `TaskRecord` keeps what the store was given; it is re-validated on use.
//! - Wire ids are decimal strings (`"7"`), matching the external API.

use crate::model::date::{format_calendar_date, CalendarDate};
use crate::recurrence::RecurrenceRule;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type TaskId = i64;

/// Validated task ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// `None` until the store assigns one.
    pub id: Option<TaskId>,
    pub date: CalendarDate,
    pub title: String,
    pub comment: String,
    pub repeat: RecurrenceRule,
}

impl Task {
    /// Converts to the store row shape.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            date: format_calendar_date(self.date),
            title: self.title.clone(),
            comment: self.comment.clone(),
            repeat: self.repeat.to_string(),
        }
    }
}

/// Store row with text columns (`date`, `repeat`) kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: Option<TaskId>,
    /// `YYYYMMDD` text.
    pub date: String,
    pub title: String,
    pub comment: String,
    /// Rule text; empty for non-recurring tasks.
    pub repeat: String,
}

/// User-supplied task fields before lifecycle normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Required for edits; ignored on create.
    pub id: Option<TaskId>,
    /// Candidate `YYYYMMDD` date; `None` or empty means "today".
    pub date: Option<String>,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// JSON shape of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDto {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// JSON envelope for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListDto {
    pub tasks: Vec<TaskDto>,
}

impl From<&TaskRecord> for TaskDto {
    fn from(record: &TaskRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_string()).unwrap_or_default(),
            date: record.date.clone(),
            title: record.title.clone(),
            comment: record.comment.clone(),
            repeat: record.repeat.clone(),
        }
    }
}

impl From<&[TaskRecord]> for TaskListDto {
    fn from(records: &[TaskRecord]) -> Self {
        Self {
            tasks: records.iter().map(TaskDto::from).collect(),
        }
    }
}

impl From<TaskDto> for TaskDraft {
    /// Unparseable ids become `None`; edits then fail with a missing id.
    fn from(dto: TaskDto) -> Self {
        Self {
            id: dto.id.trim().parse().ok(),
            date: Some(dto.date).filter(|date| !date.is_empty()),
            title: dto.title,
            comment: dto.comment,
            repeat: dto.repeat,
        }
    }
}
