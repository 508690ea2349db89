//! In-memory notification log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::domain::EmailAddress;
use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};

/// Thread-safe in-memory notification log preserving append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    records: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> NotificationRepositoryError {
    NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        if records.iter().any(|existing| existing.id() == notification.id()) {
            return Err(NotificationRepositoryError::Duplicate(notification.id()));
        }
        records.push(notification.clone());
        Ok(())
    }

    async fn mark_smtp_sent(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        let record = records
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(NotificationRepositoryError::NotFound(id))?;
        record.mark_smtp_sent();
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient: &EmailAddress,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records
            .iter()
            .filter(|record| record.recipient() == recipient)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> NotificationRepositoryResult<Vec<Notification>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.clone())
    }
}
