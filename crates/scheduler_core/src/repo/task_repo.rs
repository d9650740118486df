//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/update/delete/list APIs over the `scheduler` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - The store keeps what it was given; lifecycle checks happen upstream.
//! - Update and delete report `NotFound` when no row matched.
//! - Listings are ordered by `date ASC, id ASC` and always bounded.

use crate::db::DbError;
use crate::model::task::{TaskId, TaskRecord};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    title,
    comment,
    repeat
FROM scheduler";

const LIST_DEFAULT_LIMIT: u32 = 10;
const LIST_LIMIT_MAX: u32 = 50;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TaskId),
    /// Update requested for a record that was never persisted.
    MissingId,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::MissingId => write!(f, "task has no id"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::MissingId => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Store(value))
    }
}

/// Repository interface for task rows.
pub trait TaskRepository {
    /// Inserts a row and returns the store-assigned id. `record.id` is ignored.
    fn insert_task(&self, record: &TaskRecord) -> RepoResult<TaskId>;
    /// Gets one row by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>>;
    /// Replaces every column of an existing row.
    fn update_task(&self, record: &TaskRecord) -> RepoResult<()>;
    /// Hard-deletes one row.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Lists the earliest tasks by date. Limit is normalized.
    fn list_upcoming(&self, limit: Option<u32>) -> RepoResult<Vec<TaskRecord>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, record: &TaskRecord) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO scheduler (date, title, comment, repeat)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.date.as_str(),
                record.title.as_str(),
                record.comment.as_str(),
                record.repeat.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn update_task(&self, record: &TaskRecord) -> RepoResult<()> {
        let id = record.id.ok_or(RepoError::MissingId)?;

        let changed = self.conn.execute(
            "UPDATE scheduler
             SET
                date = ?1,
                title = ?2,
                comment = ?3,
                repeat = ?4
             WHERE id = ?5;",
            params![
                record.date.as_str(),
                record.title.as_str(),
                record.comment.as_str(),
                record.repeat.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM scheduler WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_upcoming(&self, limit: Option<u32>) -> RepoResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             ORDER BY date ASC, id ASC
             LIMIT ?1;"
        ))?;

        let mut rows = stmt.query([i64::from(normalize_list_limit(limit))])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_task_row(row)?);
        }

        Ok(records)
    }
}

/// Normalizes a listing limit: `None`/`0` use the default, large values clamp.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRecord> {
    Ok(TaskRecord {
        id: Some(row.get("id")?),
        date: row.get("date")?,
        title: row.get("title")?,
        comment: row.get("comment")?,
        repeat: row.get("repeat")?,
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_list_limit;

    #[test]
    fn list_limit_defaults_and_clamps() {
        assert_eq!(normalize_list_limit(None), 10);
        assert_eq!(normalize_list_limit(Some(0)), 10);
        assert_eq!(normalize_list_limit(Some(3)), 3);
        assert_eq!(normalize_list_limit(Some(500)), 50);
    }
}
