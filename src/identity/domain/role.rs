//! User roles.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role determining which task operations a user may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Assigns and supervises tasks.
    Manager,
    /// Works on tasks assigned to their employee identifier.
    Employee,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Manager, Self::Employee];

    /// Roles that receive supervisor notifications.
    pub const SUPERVISORS: [Self; 2] = [Self::Manager, Self::Admin];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
        }
    }

    /// Returns `true` for roles that supervise employees.
    #[must_use]
    pub const fn is_supervisor(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
