//! Response bodies and status mapping for the HTTP surface.
//!
//! The crate does not bind to a web framework. Handlers built on top of it
//! turn service results into an [`ApiResponse`] with the helpers here, so
//! status codes and `msg` strings stay identical across transports.

use crate::task::{
    domain::{Task, TaskId},
    services::{OverdueOutcome, UpdateOutcome},
};
use serde::{Deserialize, Serialize};

/// HTTP status codes used by the task and account endpoints.
pub mod status {
    /// 200 OK.
    pub const OK: u16 = 200;
    /// 201 Created.
    pub const CREATED: u16 = 201;
    /// 400 Bad Request.
    pub const BAD_REQUEST: u16 = 400;
    /// 401 Unauthorized.
    pub const UNAUTHORIZED: u16 = 401;
    /// 403 Forbidden.
    pub const FORBIDDEN: u16 = 403;
    /// 404 Not Found.
    pub const NOT_FOUND: u16 = 404;
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Maps a service error onto the HTTP surface.
pub trait ResponseStatus {
    /// Returns the HTTP status code for the error.
    fn status_code(&self) -> u16;

    /// Returns the message placed in the `msg` field of the response.
    fn client_message(&self) -> String;
}

/// `{ "msg": ... }` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable outcome.
    pub msg: String,
}

impl MessageBody {
    /// Creates a body with `msg`.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// `{ "msg": ..., "task_ids": [...] }` body returned after bulk creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksCreatedBody {
    /// Human-readable outcome.
    pub msg: String,
    /// Identifiers of the created tasks, one per assignee.
    pub task_ids: Vec<TaskId>,
}

/// Status code paired with a serialisable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: T,
}

/// Success message for bulk creation.
pub const TASKS_CREATED: &str = "Tasks created for assigned employees.";
/// Success message for a supervisor field update.
pub const TASK_UPDATED: &str = "Task updated";
/// Success message for an employee status update.
pub const TASK_STATUS_UPDATED: &str = "Task status updated";
/// Success message for completion.
pub const TASK_COMPLETED: &str = "Task completed notification sent!";
/// Success message for deletion.
pub const TASK_DELETED: &str = "Task deleted successfully.";
/// Mark-overdue message when the task was already done.
pub const TASK_ALREADY_COMPLETED: &str = "Task already completed";
/// Mark-overdue message after processing.
pub const OVERDUE_PROCESSED: &str = "Overdue processed";

/// Builds the error response for `err`.
#[must_use]
pub fn error_response<E: ResponseStatus + ?Sized>(err: &E) -> ApiResponse<MessageBody> {
    ApiResponse {
        status: err.status_code(),
        body: MessageBody::new(err.client_message()),
    }
}

/// Builds the `201` response for created tasks.
#[must_use]
pub fn tasks_created(tasks: &[Task]) -> ApiResponse<TasksCreatedBody> {
    ApiResponse {
        status: status::CREATED,
        body: TasksCreatedBody {
            msg: TASKS_CREATED.to_owned(),
            task_ids: tasks.iter().map(Task::id).collect(),
        },
    }
}

/// Builds a `200` response carrying `msg`.
#[must_use]
pub fn ok_message(msg: &str) -> ApiResponse<MessageBody> {
    ApiResponse {
        status: status::OK,
        body: MessageBody::new(msg),
    }
}

impl From<&UpdateOutcome> for ApiResponse<MessageBody> {
    fn from(outcome: &UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::FieldsUpdated(_) => ok_message(TASK_UPDATED),
            UpdateOutcome::StatusUpdated(_) => ok_message(TASK_STATUS_UPDATED),
        }
    }
}

impl From<&OverdueOutcome> for ApiResponse<MessageBody> {
    fn from(outcome: &OverdueOutcome) -> Self {
        match outcome {
            OverdueOutcome::AlreadyDone(_) => ok_message(TASK_ALREADY_COMPLETED),
            OverdueOutcome::Processed { .. } => ok_message(OVERDUE_PROCESSED),
        }
    }
}
