//! Repository port for the notification log.

use crate::identity::domain::EmailAddress;
use crate::notification::domain::{Notification, NotificationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Append-only notification storage contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Appends a notification record.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::Duplicate`] when the identifier
    /// already exists.
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Flags a record as delivered by the transport.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn mark_smtp_sent(&self, id: NotificationId) -> NotificationRepositoryResult<()>;

    /// Returns the records addressed to `recipient`, oldest first.
    async fn list_for_recipient(
        &self,
        recipient: &EmailAddress,
    ) -> NotificationRepositoryResult<Vec<Notification>>;

    /// Returns every record, oldest first.
    async fn list_all(&self) -> NotificationRepositoryResult<Vec<Notification>>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    Duplicate(NotificationId),

    /// The record was not found.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
