//! Command-line front end for the task scheduler.
//!
//! # Responsibility
//! - Parse commands and configuration (flags with env fallbacks).
//! - Supply "today", raw dates, and rule text to the core service.
//! - Map results to JSON on stdout and errors to `{"error": ...}` on stderr.
//!
//! # Invariants
//! - Exit status is non-zero whenever an error object is printed.
//! - The database connection lives for exactly one command.

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use scheduler_core::db::open_db;
use scheduler_core::{
    core_version, default_log_level, format_calendar_date, init_logging, logging_status,
    next_date, parse_calendar_date, CalendarDate, CompletionOutcome, SqliteTaskRepository, TaskDraft,
    TaskDto, TaskId, TaskListDto, TaskService, TaskServiceError,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "scheduler", version, about = "Personal task scheduler")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "SCHEDULER_DB_PATH", default_value = "scheduler.db", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "SCHEDULER_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "SCHEDULER_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Reference date (YYYYMMDD). Defaults to the current UTC date.
    #[arg(long, env = "SCHEDULER_TODAY", global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the next occurrence without touching the store.
    NextDate {
        #[arg(long)]
        now: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        repeat: String,
    },
    #[command(flatten)]
    Task(TaskCommand),
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task.
    Add(TaskFields),
    /// Show one task.
    Get { id: TaskId },
    /// Replace every field of a task.
    Edit {
        id: TaskId,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// List the earliest tasks by date.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create a task from a JSON object (`{"date","title","comment","repeat"}`).
    AddJson { body: String },
    /// Replace a task from a JSON object; the target is its `id` field.
    EditJson { body: String },
    /// Mark a task done.
    Done { id: TaskId },
    /// Delete a task.
    Remove { id: TaskId },
}

#[derive(Debug, Args)]
struct TaskFields {
    #[arg(long)]
    title: String,
    /// Due date (YYYYMMDD). Defaults to today.
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value = "")]
    comment: String,
    /// `y`, `d N`, or empty.
    #[arg(long, default_value = "")]
    repeat: String,
}

impl TaskFields {
    fn into_draft(self, id: Option<TaskId>) -> TaskDraft {
        TaskDraft {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

enum Failure {
    Client(String),
    Internal(anyhow::Error),
}

impl From<TaskServiceError> for Failure {
    fn from(err: TaskServiceError) -> Self {
        if err.is_client_error() {
            Self::Client(err.to_string())
        } else {
            Self::Internal(err.into())
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("{}", json!({ "error": err.to_string() }));
            return ExitCode::FAILURE;
        }
        if let Some((level, dir)) = logging_status() {
            info!(
                "event=cli_start module=cli status=ok core_version={} level={} log_dir={}",
                core_version(),
                level,
                dir.display()
            );
        }
    }

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(Failure::Client(message)) => {
            warn!("event=cli_command module=cli status=rejected error={message}");
            eprintln!("{}", json!({ "error": message }));
            ExitCode::FAILURE
        }
        Err(Failure::Internal(err)) => {
            error!("event=cli_command module=cli status=error error={err:#}");
            eprintln!("{}", json!({ "error": format!("{err:#}") }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, Failure> {
    match cli.command {
        Command::NextDate { now, date, repeat } => {
            let next = next_date(&now, &date, &repeat).map_err(TaskServiceError::from)?;
            Ok(format_calendar_date(next))
        }
        Command::Task(command) => {
            let today = resolve_today(cli.today.as_deref())?;
            let conn = open_db(&cli.db)
                .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            Ok(run_task_command(&service, command, today)?.to_string())
        }
    }
}

fn run_task_command(
    service: &TaskService<SqliteTaskRepository<'_>>,
    command: TaskCommand,
    today: CalendarDate,
) -> Result<serde_json::Value, Failure> {
    let output = match command {
        TaskCommand::Add(fields) => {
            let id = service.add_task(&fields.into_draft(None), today)?;
            info!("event=task_add module=cli status=ok id={id}");
            json!({ "id": id.to_string() })
        }
        TaskCommand::Get { id } => to_json(&TaskDto::from(&service.get_task(id)?))?,
        TaskCommand::Edit { id, fields } => {
            service.edit_task(&fields.into_draft(Some(id)), today)?;
            info!("event=task_edit module=cli status=ok id={id}");
            json!({})
        }
        TaskCommand::AddJson { body } => {
            let id = service.add_task(&parse_task_body(&body)?, today)?;
            info!("event=task_add module=cli status=ok id={id} input=json");
            json!({ "id": id.to_string() })
        }
        TaskCommand::EditJson { body } => {
            let draft = parse_task_body(&body)?;
            service.edit_task(&draft, today)?;
            if let Some(id) = draft.id {
                info!("event=task_edit module=cli status=ok id={id} input=json");
            }
            json!({})
        }
        TaskCommand::List { limit } => {
            let records = service.list_upcoming(limit)?;
            to_json(&TaskListDto::from(records.as_slice()))?
        }
        TaskCommand::Done { id } => {
            match service.complete_task(id, today)? {
                CompletionOutcome::Deleted => {
                    info!("event=task_done module=cli status=ok id={id} outcome=deleted");
                }
                CompletionOutcome::Rescheduled(next) => info!(
                    "event=task_done module=cli status=ok id={id} outcome=rescheduled date={}",
                    format_calendar_date(next)
                ),
            }
            json!({})
        }
        TaskCommand::Remove { id } => {
            service.remove_task(id)?;
            info!("event=task_remove module=cli status=ok id={id}");
            json!({})
        }
    };

    Ok(output)
}

/// Decodes a JSON task object; absent fields default to empty.
fn parse_task_body(body: &str) -> Result<TaskDraft, Failure> {
    serde_json::from_str::<TaskDto>(body)
        .map(TaskDraft::from)
        .map_err(|err| Failure::Client(format!("invalid task JSON: {err}")))
}

fn resolve_today(raw: Option<&str>) -> Result<CalendarDate, Failure> {
    match raw {
        Some(value) => parse_calendar_date(value)
            .map_err(|err| Failure::Client(format!("invalid --today: {err}"))),
        None => Ok(Utc::now().date_naive()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, Failure> {
    serde_json::to_value(value)
        .context("failed to encode response")
        .map_err(Failure::from)
}
