//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Assignee employee identifier.
    pub assigned_to: String,
    /// Priority label.
    pub priority: String,
    /// Task status.
    pub status: String,
    /// Optional deadline, as supplied (`YYYY-MM-DD` or RFC 3339).
    pub deadline: Option<String>,
    /// Creating supervisor.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRecord {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Assignee employee identifier.
    pub assigned_to: String,
    /// Priority label.
    pub priority: String,
    /// Task status.
    pub status: String,
    /// Optional deadline, as supplied (`YYYY-MM-DD` or RFC 3339).
    pub deadline: Option<String>,
    /// Creating supervisor.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
