//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for notification records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: uuid::Uuid,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub smtp_sent: bool,
    pub meta: Option<Value>,
}

/// Insert model for notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub id: uuid::Uuid,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub smtp_sent: bool,
    pub meta: Option<Value>,
}
