//! Service-level errors for task lifecycle operations.

use crate::api::{ResponseStatus, status};
use crate::identity::{domain::UserId, ports::UserRepositoryError};
use crate::task::{
    domain::{ParseTaskStatusError, TaskDomainError, TaskId},
    ports::TaskRepositoryError,
};
use thiserror::Error;

/// Why a caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The role may not create tasks.
    CreateTasks,
    /// The role may not update tasks.
    UpdateTasks,
    /// An employee tried to update someone else's task.
    UpdateOthersTask,
    /// An employee tried to change an overdue task.
    TaskOverdue,
    /// An employee tried to move a done task to another status.
    TaskDone,
    /// The role may not complete tasks.
    CompleteTasks,
    /// An employee tried to complete someone else's task.
    CompleteOthersTask,
    /// The role may not delete tasks.
    DeleteTasks,
    /// The role may not mark tasks overdue.
    MarkOverdue,
    /// An employee tried to read someone else's task.
    ReadOthersTask,
}

impl Denial {
    /// Returns the message shown to the caller.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CreateTasks => "You do not have permission to create tasks.",
            Self::UpdateTasks => "You do not have permission to update tasks.",
            Self::UpdateOthersTask => "Can only update your own tasks.",
            Self::TaskOverdue => "Task is overdue and cannot be updated by employee.",
            Self::TaskDone => "Task is already done and cannot be reopened by employee.",
            Self::CompleteTasks => "Only assigned employees may complete tasks.",
            Self::CompleteOthersTask => "Not authorized for this task.",
            Self::DeleteTasks => "Only admins and managers can delete tasks.",
            Self::MarkOverdue => "You do not have permission to mark tasks overdue.",
            Self::ReadOthersTask => "Not authorized",
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The caller identity does not resolve to a user.
    #[error("caller {0} does not exist")]
    UnknownCaller(UserId),
    /// The caller's role or ownership forbids the operation.
    #[error("forbidden: {}", .0.message())]
    Forbidden(Denial),
    /// The task does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// No requested assignee resolved to an Employee-role user.
    #[error("no valid employee assignees")]
    NoValidAssignees,
    /// An employee status update carried no status.
    #[error("nothing to update")]
    NothingToUpdate,
    /// The requested status is not one of the known values.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(TaskRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Tasks(other),
        }
    }
}

/// Result type for task lifecycle operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

impl ResponseStatus for TaskServiceError {
    fn status_code(&self) -> u16 {
        match self {
            Self::UnknownCaller(_) => status::UNAUTHORIZED,
            Self::Forbidden(_) => status::FORBIDDEN,
            Self::NotFound(_) => status::NOT_FOUND,
            Self::NoValidAssignees
            | Self::NothingToUpdate
            | Self::InvalidStatus(_)
            | Self::Domain(_) => status::BAD_REQUEST,
            Self::Tasks(_) | Self::Users(_) => status::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::UnknownCaller(_) => "User not found".to_owned(),
            Self::Forbidden(denial) => denial.message().to_owned(),
            Self::NotFound(_) => "Task not found".to_owned(),
            Self::NoValidAssignees => "Assigned user(s) must be valid employees.".to_owned(),
            Self::NothingToUpdate => "Nothing to update".to_owned(),
            Self::InvalidStatus(_) => "Invalid status value".to_owned(),
            Self::Domain(err) => err.to_string(),
            Self::Tasks(_) | Self::Users(_) => "Internal server error".to_owned(),
        }
    }
}
