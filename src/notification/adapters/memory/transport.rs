//! Recording mail transport for tests and local runs.

use crate::identity::domain::EmailAddress;
use crate::notification::{
    domain::OutgoingMail,
    ports::{MailTransport, MailTransportError, MailTransportResult},
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Mail transport that keeps delivered messages in memory.
///
/// Failures and latency can be injected to exercise the dispatcher's
/// degradation paths without a mail relay.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailTransport {
    state: Arc<RwLock<TransportState>>,
}

#[derive(Debug, Default)]
struct TransportState {
    delivered: Vec<OutgoingMail>,
    unavailable: bool,
    rejected_recipients: HashSet<EmailAddress>,
    latency: Option<Duration>,
}

fn lock_error(err: impl ToString) -> MailTransportError {
    MailTransportError::transport(std::io::Error::other(err.to_string()))
}

impl RecordingMailTransport {
    /// Creates a transport that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail as if the relay were down.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_unavailable(&self, unavailable: bool) -> MailTransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unavailable = unavailable;
        Ok(())
    }

    /// Rejects messages addressed to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn reject_recipient(&self, recipient: EmailAddress) -> MailTransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.rejected_recipients.insert(recipient);
        Ok(())
    }

    /// Delays every send by `latency`.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_latency(&self, latency: Duration) -> MailTransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.latency = Some(latency);
        Ok(())
    }

    /// Returns the messages delivered so far.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn delivered(&self) -> MailTransportResult<Vec<OutgoingMail>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.delivered.clone())
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> MailTransportResult<()> {
        let delay = self.state.read().map_err(lock_error)?.latency;
        if let Some(latency) = delay {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().map_err(lock_error)?;
        if state.unavailable {
            return Err(MailTransportError::Unavailable(
                "relay marked unavailable".to_owned(),
            ));
        }
        if state.rejected_recipients.contains(&mail.to) {
            return Err(MailTransportError::Rejected(format!(
                "recipient {} refused",
                mail.to
            )));
        }
        state.delivered.push(mail.clone());
        Ok(())
    }
}
