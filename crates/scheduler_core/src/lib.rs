//! Core domain logic for the task scheduler.
//! This crate owns the recurrence engine, the task lifecycle policy, and the
//! SQLite task store.

pub mod db;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod service;

pub use lifecycle::{
    advance_on_completion, build_task, normalize_on_create, CompletionOutcome, LifecycleError,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date::{format_calendar_date, parse_calendar_date, CalendarDate, DateParseError};
pub use model::task::{Task, TaskDraft, TaskDto, TaskId, TaskListDto, TaskRecord};
pub use recurrence::{next_occurrence, RecurrenceError, RecurrenceRule, MAX_INTERVAL_DAYS};
pub use repo::task_repo::{
    normalize_list_limit, RepoError, RepoResult, SqliteTaskRepository, TaskRepository,
};
pub use service::task_service::{next_date, TaskService, TaskServiceError, TaskServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
