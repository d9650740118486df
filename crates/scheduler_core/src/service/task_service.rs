//! Task use-case service.
//!
//! # Responsibility
//! - Provide add/get/edit/list/done/remove entry points for the request layer.
//! - Route every date decision through the lifecycle policy.
//!
//! # Invariants
//! - The repository is injected; the service holds no other state.
//! - Each use-case performs one read and at most one write.
//! - A failed lifecycle decision never touches the stored row.
//! - Errors are returned, never logged here.

use crate::lifecycle::{advance_on_completion, build_task, CompletionOutcome, LifecycleError};
use crate::model::date::{format_calendar_date, parse_calendar_date, CalendarDate};
use crate::model::task::{TaskDraft, TaskId, TaskRecord};
use crate::recurrence::next_occurrence;
use crate::repo::task_repo::{RepoError, TaskRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Input or stored state rejected by the lifecycle policy.
    Lifecycle(LifecycleError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Edit request without a task id.
    MissingId,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lifecycle(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::MissingId => write!(f, "wrong id"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lifecycle(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) | Self::MissingId => None,
        }
    }
}

impl From<LifecycleError> for TaskServiceError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::MissingId => Self::MissingId,
            other => Self::Repo(other),
        }
    }
}

impl TaskServiceError {
    /// Returns whether the caller supplied bad input, as opposed to a store
    /// failure or corrupt stored state.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Lifecycle(LifecycleError::CorruptState(_)) => false,
            Self::Lifecycle(_) | Self::TaskNotFound(_) | Self::MissingId => true,
            Self::Repo(_) => false,
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task after normalizing its date against `today`.
    ///
    /// # Contract
    /// - `draft.id` is ignored; the store assigns the id.
    /// - Returns the created id.
    pub fn add_task(&self, draft: &TaskDraft, today: CalendarDate) -> TaskServiceResult<TaskId> {
        let mut task = build_task(draft, today)?;
        task.id = None;
        Ok(self.repo.insert_task(&task.to_record())?)
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<TaskRecord> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Replaces all fields of an existing task.
    ///
    /// # Contract
    /// - Requires `draft.id`.
    /// - Dates are normalized with the same policy as creation.
    pub fn edit_task(&self, draft: &TaskDraft, today: CalendarDate) -> TaskServiceResult<()> {
        if draft.id.is_none() {
            return Err(TaskServiceError::MissingId);
        }

        let task = build_task(draft, today)?;
        Ok(self.repo.update_task(&task.to_record())?)
    }

    /// Lists the earliest tasks by date.
    pub fn list_upcoming(&self, limit: Option<u32>) -> TaskServiceResult<Vec<TaskRecord>> {
        Ok(self.repo.list_upcoming(limit)?)
    }

    /// Marks a task done: deletes it, or moves a recurring task forward.
    ///
    /// # Contract
    /// - Non-recurring tasks are deleted.
    /// - Recurring tasks keep id/title/comment/repeat and get the next date
    ///   strictly after `today`.
    /// - On any lifecycle error the row is left unchanged.
    pub fn complete_task(
        &self,
        id: TaskId,
        today: CalendarDate,
    ) -> TaskServiceResult<CompletionOutcome> {
        let mut record = self.get_task(id)?;
        let outcome = advance_on_completion(&record, today)?;

        match outcome {
            CompletionOutcome::Deleted => self.repo.delete_task(id)?,
            CompletionOutcome::Rescheduled(next) => {
                record.date = format_calendar_date(next);
                self.repo.update_task(&record)?;
            }
        }

        Ok(outcome)
    }

    /// Removes a task regardless of its rule.
    pub fn remove_task(&self, id: TaskId) -> TaskServiceResult<()> {
        Ok(self.repo.delete_task(id)?)
    }
}

/// Answers a stand-alone next-date query from raw request text.
///
/// # Errors
/// - `InvalidDate` when `now` or `date` is not `YYYYMMDD`.
/// - `Recurrence` for an empty or invalid `repeat`.
pub fn next_date(now: &str, date: &str, repeat: &str) -> Result<CalendarDate, LifecycleError> {
    let now = parse_calendar_date(now)?;
    let date = parse_calendar_date(date)?;
    Ok(next_occurrence(date, now, repeat)?)
}
