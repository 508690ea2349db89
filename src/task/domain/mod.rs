//! Domain model for the task lifecycle.
//!
//! Tasks carry a single Employee assignee and a status drawn from a closed
//! set. Which caller may do what to a task is decided by one capability
//! table, [`access_for`]; the task store applies guarded
//! partial updates described by [`TaskUpdate`].

mod access;
mod error;
mod ids;
mod patch;
mod status;
mod task;

pub use access::{Access, Caller, TaskOperation, access_for};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{Deadline, TaskId, TaskPriority, TaskTitle};
pub use patch::{PatchOutcome, StatusGuard, TaskPatch, TaskUpdate};
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task};
