//! Core use-case services.
//!
//! # Responsibility
//! - Combine lifecycle policy and repository calls into use-case APIs.
//! - Keep the command-line layer decoupled from storage details.

pub mod task_service;
