//! In-memory repository for the task lifecycle.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::EmployeeId;
use crate::task::{
    domain::{PatchOutcome, Task, TaskId, TaskUpdate},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// A single write lock covers each guarded update, which makes the
/// read-check-write of [`TaskRepository::update_fields`] atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl InMemoryTaskState {
    fn ordered(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered().cloned().collect())
    }

    async fn find_by_assignee(&self, employee_id: &EmployeeId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|task| task.is_assigned_to(employee_id))
            .cloned()
            .collect())
    }

    async fn update_fields(
        &self,
        id: TaskId,
        update: &TaskUpdate,
    ) -> TaskRepositoryResult<PatchOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        let current = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let outcome = update.evaluate(current);
        if let PatchOutcome::Applied { current, .. } = &outcome {
            state.tasks.insert(id, current.clone());
        }
        Ok(outcome)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state.tasks.remove(&id).is_some();
        if removed {
            state.order.retain(|existing| *existing != id);
        }
        Ok(removed)
    }
}
