//! Mail transport port.

use crate::notification::domain::OutgoingMail;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for mail transport operations.
pub type MailTransportResult<T> = Result<T, MailTransportError>;

/// External mail delivery mechanism, treated as unreliable.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`MailTransportError`] when the relay is unreachable or
    /// rejects the message.
    async fn send(&self, mail: &OutgoingMail) -> MailTransportResult<()>;
}

/// Errors returned by mail transport adapters.
#[derive(Debug, Clone, Error)]
pub enum MailTransportError {
    /// The relay could not be reached.
    #[error("mail relay unavailable: {0}")]
    Unavailable(String),

    /// The relay refused the message.
    #[error("mail rejected: {0}")]
    Rejected(String),

    /// The attempt exceeded its time budget.
    #[error("mail delivery timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other adapter failure.
    #[error("mail transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MailTransportError {
    /// Wraps an adapter failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
