//! Role capability table for task operations.

use super::Task;
use crate::identity::domain::{EmailAddress, EmployeeId, Role, User, UserId, Username};

/// Operations a caller may attempt on tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOperation {
    /// Create tasks for one or more employees.
    Create,
    /// Replace arbitrary task fields.
    EditFields,
    /// Change only the status of a task.
    UpdateStatus,
    /// Submit a task as done.
    Complete,
    /// Flag a task as overdue.
    MarkOverdue,
    /// Remove a task.
    Delete,
    /// List or fetch tasks.
    Read,
}

/// Scope of a capability grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The operation is not available to the role.
    Denied,
    /// The operation applies to any task.
    Any,
    /// The operation applies only to tasks assigned to the caller.
    Own,
}

impl Access {
    /// Returns `true` unless access is [`Access::Denied`].
    #[must_use]
    pub const fn is_granted(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Looks up what `role` may do for `operation`.
///
/// Every authorisation decision in the task lifecycle goes through this
/// table.
#[must_use]
pub const fn access_for(operation: TaskOperation, role: Role) -> Access {
    use Access::{Any, Denied, Own};
    match (operation, role) {
        (
            TaskOperation::Create | TaskOperation::EditFields | TaskOperation::Delete,
            Role::Admin | Role::Manager,
        )
        | (TaskOperation::Read, Role::Admin | Role::Manager)
        | (TaskOperation::MarkOverdue, _) => Any,
        (
            TaskOperation::UpdateStatus | TaskOperation::Complete | TaskOperation::Read,
            Role::Employee,
        ) => Own,
        (
            TaskOperation::Create | TaskOperation::EditFields | TaskOperation::Delete,
            Role::Employee,
        )
        | (TaskOperation::UpdateStatus | TaskOperation::Complete, Role::Admin | Role::Manager) => {
            Denied
        }
    }
}

/// Identity of the user performing a task operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub username: Username,
    /// Contact address.
    pub email: EmailAddress,
    /// Role.
    pub role: Role,
    /// Employee identifier, present for Employee-role users.
    pub employee_id: Option<EmployeeId>,
}

impl Caller {
    /// Builds a caller from a user record.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().clone(),
            email: user.email().clone(),
            role: user.role(),
            employee_id: user.employee_id().cloned(),
        }
    }

    /// Returns the caller's access for `operation`.
    #[must_use]
    pub const fn access(&self, operation: TaskOperation) -> Access {
        access_for(operation, self.role)
    }

    /// Returns `true` when `task` is assigned to this caller.
    #[must_use]
    pub fn owns(&self, task: &Task) -> bool {
        self.employee_id
            .as_ref()
            .is_some_and(|employee_id| task.is_assigned_to(employee_id))
    }

    /// Returns `true` when the caller may perform `operation` on `task`.
    #[must_use]
    pub fn may(&self, operation: TaskOperation, task: &Task) -> bool {
        match self.access(operation) {
            Access::Denied => false,
            Access::Any => true,
            Access::Own => self.owns(task),
        }
    }
}
