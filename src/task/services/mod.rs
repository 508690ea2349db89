//! Application services for the task lifecycle.

mod error;
mod lifecycle;
mod messages;
mod requests;

pub use error::{Denial, TaskServiceError, TaskServiceResult};
pub use lifecycle::{OverdueOutcome, TaskLifecycleService, UpdateOutcome};
pub use messages::{Actor, MessageCatalog, MessageRenderError};
pub use requests::{Assignees, CreateTasksRequest, UpdateTaskRequest};
