//! Domain model for scheduled tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the calendar-date codec shared by every layer.
//!
//! # Invariants
//! - Dates cross every external boundary as `YYYYMMDD` text.
//! - Identifiers are assigned by the store, never by callers.

pub mod date;
pub mod task;
