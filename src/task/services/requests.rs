//! Request payloads accepted by the task lifecycle service.

/// Which employees a creation request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignees {
    /// Explicit employee identifiers; unknown or non-employee entries are
    /// dropped.
    Explicit(Vec<String>),
    /// Every Employee-role user.
    AllEmployees,
}

/// Request payload for creating one task per resolved employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTasksRequest {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) assignees: Assignees,
    pub(crate) priority: String,
    pub(crate) status: String,
    pub(crate) deadline: Option<String>,
}

impl CreateTasksRequest {
    /// Creates a request with no assignees and no deadline.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assignees: Assignees::Explicit(Vec::new()),
            priority: priority.into(),
            status: status.into(),
            deadline: None,
        }
    }

    /// Targets the listed employee identifiers.
    #[must_use]
    pub fn assign_to<I, S>(mut self, employee_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = Assignees::Explicit(employee_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Targets every Employee-role user.
    #[must_use]
    pub fn assign_to_all(mut self) -> Self {
        self.assignees = Assignees::AllEmployees;
        self
    }

    /// Sets the deadline, as `YYYY-MM-DD` or RFC 3339.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Request payload for updating a task.
///
/// Supervisors may set any field. Employees may only set `status`; other
/// fields in an employee request are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement assignee employee identifier.
    pub assigned_to: Option<String>,
    /// Replacement priority label.
    pub priority: Option<String>,
    /// Replacement status.
    pub status: Option<String>,
    /// Replacement deadline.
    pub deadline: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request that only changes the status.
    #[must_use]
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}
