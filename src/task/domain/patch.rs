//! Guarded partial updates applied atomically by the task store.

use super::{Deadline, Task, TaskPriority, TaskStatus, TaskTitle};
use crate::identity::domain::EmployeeId;
use chrono::{DateTime, Utc};

/// Partial field replacement for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement assignee.
    pub assigned_to: Option<EmployeeId>,
    /// Replacement priority label.
    pub priority: Option<TaskPriority>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement deadline.
    pub deadline: Option<Deadline>,
}

impl TaskPatch {
    /// Creates a patch that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assigned_to.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
    }
}

/// Precondition on the stored status checked atomically with the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusGuard {
    /// Apply regardless of the current status.
    #[default]
    Unrestricted,
    /// Reject when the current status is one of the listed values.
    Excluding(&'static [TaskStatus]),
}

impl StatusGuard {
    /// Returns `true` when an update may proceed from `current`.
    #[must_use]
    pub fn admits(self, current: TaskStatus) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Excluding(blocked) => !blocked.contains(&current),
        }
    }
}

/// A patch together with its guard and modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Fields to replace.
    pub patch: TaskPatch,
    /// Precondition on the current status.
    pub guard: StatusGuard,
    /// Modification timestamp.
    pub at: DateTime<Utc>,
}

impl TaskUpdate {
    /// Evaluates the update against `current` without touching storage.
    ///
    /// Store adapters call this while holding whatever lock or row lock
    /// makes the read-modify-write atomic.
    #[must_use]
    pub fn evaluate(&self, current: Task) -> PatchOutcome {
        if !self.guard.admits(current.status()) {
            return PatchOutcome::Rejected { current };
        }
        let mut updated = current.clone();
        updated.apply(&self.patch, self.at);
        PatchOutcome::Applied {
            previous: current,
            current: updated,
        }
    }
}

/// Result of a guarded update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The guard admitted the update.
    Applied {
        /// Task state before the update.
        previous: Task,
        /// Task state after the update.
        current: Task,
    },
    /// The guard rejected the update; storage is unchanged.
    Rejected {
        /// Unchanged stored task.
        current: Task,
    },
}
