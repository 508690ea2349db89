//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task priority is empty after trimming.
    #[error("task priority must not be empty")]
    EmptyPriority,

    /// The deadline is neither an RFC 3339 timestamp nor a calendar date.
    #[error("invalid deadline '{0}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDeadline(String),
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
