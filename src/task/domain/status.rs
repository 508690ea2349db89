//! Task status values.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    Pending,
    /// The assignee is working on the task.
    #[serde(rename = "In Progress")]
    InProgress,
    /// The assignee has submitted the task.
    Done,
    /// The deadline passed before completion.
    Overdue,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Done, Self::Overdue];

    /// Returns the canonical display and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Overdue => "Overdue",
        }
    }

    /// Returns `true` when an employee status change to this value alerts
    /// supervisors.
    #[must_use]
    pub const fn alerts_supervisors(self) -> bool {
        matches!(self, Self::InProgress | Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses a status, ignoring case and treating `_`, `-` and spaces
    /// alike.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
