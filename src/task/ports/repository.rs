//! Repository port for task persistence and guarded updates.

use crate::identity::domain::EmployeeId;
use crate::task::domain::{PatchOutcome, Task, TaskId, TaskUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Tasks are stored independently; no operation spans more than one task.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task in creation order.
    async fn find_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the tasks assigned to `employee_id` in creation order.
    async fn find_by_assignee(&self, employee_id: &EmployeeId) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies `update` to one task atomically.
    ///
    /// The guard is evaluated against the stored status inside the same
    /// atomic step as the write, so concurrent updates never both pass a
    /// guard that only one of them should.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_fields(
        &self,
        id: TaskId,
        update: &TaskUpdate,
    ) -> TaskRepositoryResult<PatchOutcome>;

    /// Deletes a task, returning `true` when a record was removed.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
