//! Notification dispatcher: durable record plus best-effort mail.

use super::deliver_with_timeout;
use crate::identity::domain::EmailAddress;
use crate::notification::{
    domain::{Notification, NotificationRequest, OutgoingMail},
    ports::{MailTransport, NotificationRepository, NotificationRepositoryResult, Notifier},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// How the mail send relates to the dispatching request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Send first (bounded by the timeout), then record the outcome.
    #[default]
    Inline,
    /// Record first, then send on a background task and flag the record
    /// once the transport accepts the mail.
    Detached,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Sender address stamped on mail and records.
    pub sender: EmailAddress,
    /// Upper bound on a single transport attempt.
    pub send_timeout: Duration,
    /// Relationship between sending and responding.
    pub delivery: DeliveryMode,
}

impl DispatchSettings {
    /// Default transport time budget.
    pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates inline settings with the default timeout.
    #[must_use]
    pub const fn new(sender: EmailAddress) -> Self {
        Self {
            sender,
            send_timeout: Self::DEFAULT_SEND_TIMEOUT,
            delivery: DeliveryMode::Inline,
        }
    }

    /// Overrides the transport time budget.
    #[must_use]
    pub const fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// Overrides the delivery mode.
    #[must_use]
    pub const fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }
}

/// Notification dispatcher.
///
/// Each dispatch appends exactly one record per request regardless of how
/// the transport behaves; the record's `smtp_sent` flag carries the outcome.
pub struct NotificationDispatcher<N, M, C>
where
    N: NotificationRepository + 'static,
    M: MailTransport + 'static,
    C: Clock + Send + Sync,
{
    repository: Arc<N>,
    transport: Arc<M>,
    clock: Arc<C>,
    settings: DispatchSettings,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl<N, M, C> NotificationDispatcher<N, M, C>
where
    N: NotificationRepository + 'static,
    M: MailTransport + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(
        repository: Arc<N>,
        transport: Arc<M>,
        clock: Arc<C>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            repository,
            transport,
            clock,
            settings,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Returns the dispatcher configuration.
    #[must_use]
    pub const fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Returns the notifications addressed to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn inbox(
        &self,
        recipient: &EmailAddress,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        self.repository.list_for_recipient(recipient).await
    }

    /// Returns every recorded notification.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn history(&self) -> NotificationRepositoryResult<Vec<Notification>> {
        self.repository.list_all().await
    }

    /// Waits until every detached delivery started so far has finished.
    pub async fn wait_for_deliveries(&self) {
        let handles = match self.in_flight.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "detached mail delivery task failed");
            }
        }
    }

    async fn dispatch_inline(&self, request: NotificationRequest) {
        let mail = request.to_mail(&self.settings.sender);
        let smtp_sent = attempt(&*self.transport, &mail, self.settings.send_timeout).await;
        let record = Notification::record(&request, &self.settings.sender, smtp_sent, &*self.clock);
        self.append(&record).await;
    }

    async fn dispatch_detached(&self, request: NotificationRequest) {
        let mail = request.to_mail(&self.settings.sender);
        let record = Notification::record(&request, &self.settings.sender, false, &*self.clock);
        let recorded = self.append(&record).await;

        let repository = Arc::clone(&self.repository);
        let transport = Arc::clone(&self.transport);
        let limit = self.settings.send_timeout;
        let notification_id = record.id();
        let handle = tokio::spawn(async move {
            if !attempt(&*transport, &mail, limit).await || !recorded {
                return;
            }
            if let Err(err) = repository.mark_smtp_sent(notification_id).await {
                warn!(%notification_id, error = %err, "failed to flag notification as sent");
            }
        });

        match self.in_flight.lock() {
            Ok(mut guard) => {
                guard.retain(|pending| !pending.is_finished());
                guard.push(handle);
            }
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }

    async fn append(&self, record: &Notification) -> bool {
        match self.repository.append(record).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    notification_id = %record.id(),
                    recipient = %record.recipient(),
                    error = %err,
                    "failed to record notification"
                );
                false
            }
        }
    }
}

async fn attempt<M>(transport: &M, mail: &OutgoingMail, limit: std::time::Duration) -> bool
where
    M: MailTransport + ?Sized,
{
    match deliver_with_timeout(transport, mail, limit).await {
        Ok(()) => {
            debug!(recipient = %mail.to, subject = %mail.subject, "mail delivered");
            true
        }
        Err(err) => {
            warn!(recipient = %mail.to, error = %err, "mail delivery failed");
            false
        }
    }
}

#[async_trait]
impl<N, M, C> Notifier for NotificationDispatcher<N, M, C>
where
    N: NotificationRepository + 'static,
    M: MailTransport + 'static,
    C: Clock + Send + Sync,
{
    async fn dispatch(&self, request: NotificationRequest) {
        match self.settings.delivery {
            DeliveryMode::Inline => self.dispatch_inline(request).await,
            DeliveryMode::Detached => self.dispatch_detached(request).await,
        }
    }
}
