//! Task aggregate root.

use super::{Deadline, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskTitle};
use crate::identity::domain::{EmployeeId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Validated input for one newly assigned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Free-text description.
    pub description: String,
    /// Employee the task is assigned to.
    pub assigned_to: EmployeeId,
    /// Priority label.
    pub priority: TaskPriority,
    /// Initial status.
    pub status: TaskStatus,
    /// Optional deadline.
    pub deadline: Option<Deadline>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    #[serde(rename = "_id")]
    id: TaskId,
    title: TaskTitle,
    description: String,
    assigned_to: EmployeeId,
    priority: TaskPriority,
    status: TaskStatus,
    deadline: Option<Deadline>,
    created_by: Username,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee.
    pub assigned_to: EmployeeId,
    /// Persisted priority label.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted deadline.
    pub deadline: Option<Deadline>,
    /// Username of the creating supervisor.
    pub created_by: Username,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task on behalf of `created_by`.
    #[must_use]
    pub fn create(new_task: NewTask, created_by: Username, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: new_task.title,
            description: new_task.description,
            assigned_to: new_task.assigned_to,
            priority: new_task.priority,
            status: new_task.status,
            deadline: new_task.deadline,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            priority: data.priority,
            status: data.status,
            deadline: data.deadline,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assigned employee.
    #[must_use]
    pub const fn assigned_to(&self) -> &EmployeeId {
        &self.assigned_to
    }

    /// Returns the priority label.
    #[must_use]
    pub const fn priority(&self) -> &TaskPriority {
        &self.priority
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Returns the username of the creating supervisor.
    #[must_use]
    pub const fn created_by(&self) -> &Username {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task is assigned to `employee_id`.
    #[must_use]
    pub fn is_assigned_to(&self, employee_id: &EmployeeId) -> bool {
        &self.assigned_to == employee_id
    }

    /// Applies the fields present in `patch` and stamps `at` as the
    /// modification time.
    pub fn apply(&mut self, patch: &TaskPatch, at: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to = assigned_to.clone();
        }
        if let Some(priority) = &patch.priority {
            self.priority = priority.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        self.updated_at = at;
    }
}
