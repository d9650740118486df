//! Task store bootstrap: connection setup and schema upgrades.
//!
//! # Responsibility
//! - Open the `scheduler` table store from a file path or in memory.
//! - Bring the schema up to date before any task row is touched.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A store written by a newer build is refused, never downgraded.
//! - A failed upgrade leaves the previous schema version in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Task store failure below the repository layer.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a connection, pragma, or statement.
    Store(rusqlite::Error),
    /// Schema upgrade step `version` failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// Store schema was written by a newer scheduler build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "task store error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "task store upgrade to schema v{version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task store schema v{found} is newer than this build supports (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(value)
    }
}
