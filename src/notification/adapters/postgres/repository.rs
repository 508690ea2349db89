//! `PostgreSQL` repository implementation for the notification log.

use super::{
    models::{NewNotificationRow, NotificationRow},
    schema::notifications,
};
use crate::identity::domain::EmailAddress;
use crate::notification::{
    domain::{Notification, NotificationId, NotificationMeta, PersistedNotificationData},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed notification log.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(NotificationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationRepositoryError::persistence)?
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let id = notification.id();
        let new_row = to_new_row(notification)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationRepositoryError::Duplicate(id)
                    }
                    _ => NotificationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn mark_smtp_sent(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(notifications::table.find(id.into_inner()))
                .set(notifications::smtp_sent.eq(true))
                .execute(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(NotificationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_for_recipient(
        &self,
        recipient: &EmailAddress,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let lookup = recipient.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::recipient.eq(lookup))
                .order(notifications::created_at.asc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }

    async fn list_all(&self) -> NotificationRepositoryResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .order(notifications::created_at.asc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }
}

fn to_new_row(notification: &Notification) -> NotificationRepositoryResult<NewNotificationRow> {
    let meta = notification
        .meta()
        .map(serde_json::to_value)
        .transpose()
        .map_err(NotificationRepositoryError::persistence)?;

    Ok(NewNotificationRow {
        id: notification.id().into_inner(),
        sender: notification.sender().as_str().to_owned(),
        recipient: notification.recipient().as_str().to_owned(),
        subject: notification.subject().to_owned(),
        body: notification.body().to_owned(),
        read: notification.is_read(),
        created_at: notification.timestamp(),
        smtp_sent: notification.smtp_sent(),
        meta,
    })
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let meta = row
        .meta
        .map(serde_json::from_value::<NotificationMeta>)
        .transpose()
        .map_err(NotificationRepositoryError::persistence)?;

    let data = PersistedNotificationData {
        id: NotificationId::from_uuid(row.id),
        sender: EmailAddress::new(row.sender).map_err(NotificationRepositoryError::persistence)?,
        recipient: EmailAddress::new(row.recipient)
            .map_err(NotificationRepositoryError::persistence)?,
        subject: row.subject,
        body: row.body,
        read: row.read,
        timestamp: row.created_at,
        smtp_sent: row.smtp_sent,
        meta,
    };
    Ok(Notification::from_persisted(data))
}
