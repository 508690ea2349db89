//! Fire-and-forget notification port used by task services.

use crate::notification::domain::NotificationRequest;
use async_trait::async_trait;

/// Delivers notifications without ever failing the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Records the notification and attempts mail delivery.
    ///
    /// Failures are logged and absorbed; the call always completes.
    async fn dispatch(&self, request: NotificationRequest);
}
