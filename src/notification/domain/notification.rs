//! Notification record.

use super::NotificationRequest;
use crate::identity::domain::EmailAddress;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a notification identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured task context attached to a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMeta {
    /// Status the notification reports, e.g. `Assigned` or `Done`.
    pub status: Option<String>,
    /// Related task identifier.
    pub task_id: Option<String>,
    /// Related task title.
    pub title: Option<String>,
    /// Employee the task belongs to.
    pub employee_id: Option<String>,
    /// Username of the acting employee.
    pub username: Option<String>,
}

impl NotificationMeta {
    /// Creates context reporting `status`.
    #[must_use]
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Sets the related task identifier.
    #[must_use]
    pub fn task_id(mut self, task_id: impl ToString) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }

    /// Sets the related task title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the related employee identifier.
    #[must_use]
    pub fn employee_id(mut self, employee_id: impl ToString) -> Self {
        self.employee_id = Some(employee_id.to_string());
        self
    }

    /// Sets the acting username.
    #[must_use]
    pub fn username(mut self, username: impl ToString) -> Self {
        self.username = Some(username.to_string());
        self
    }
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted identifier.
    pub id: NotificationId,
    /// Sender address.
    pub sender: EmailAddress,
    /// Recipient address.
    pub recipient: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// In-app read flag.
    pub read: bool,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Whether the transport accepted the mail.
    pub smtp_sent: bool,
    /// Structured context.
    pub meta: Option<NotificationMeta>,
}

/// Append-only record of a dispatched notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    id: NotificationId,
    #[serde(rename = "from")]
    sender: EmailAddress,
    recipient: EmailAddress,
    subject: String,
    #[serde(rename = "message")]
    body: String,
    read: bool,
    timestamp: DateTime<Utc>,
    smtp_sent: bool,
    meta: Option<NotificationMeta>,
}

impl Notification {
    /// Records a dispatched request with its transport outcome.
    #[must_use]
    pub fn record(
        request: &NotificationRequest,
        sender: &EmailAddress,
        smtp_sent: bool,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            sender: sender.clone(),
            recipient: request.recipient.clone(),
            subject: request.subject.clone(),
            body: request.body.clone(),
            read: false,
            timestamp: clock.utc(),
            smtp_sent,
            meta: request.meta.clone(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            sender: data.sender,
            recipient: data.recipient,
            subject: data.subject,
            body: data.body,
            read: data.read,
            timestamp: data.timestamp,
            smtp_sent: data.smtp_sent,
            meta: data.meta,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the sender address.
    #[must_use]
    pub const fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// Returns the recipient address.
    #[must_use]
    pub const fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the in-app read flag.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns whether the transport accepted the mail.
    #[must_use]
    pub const fn smtp_sent(&self) -> bool {
        self.smtp_sent
    }

    /// Returns the structured context.
    #[must_use]
    pub const fn meta(&self) -> Option<&NotificationMeta> {
        self.meta.as_ref()
    }

    /// Records that a detached delivery succeeded.
    pub const fn mark_smtp_sent(&mut self) {
        self.smtp_sent = true;
    }
}
