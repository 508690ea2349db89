//! Mail envelopes handed to the transport and the dispatcher.

use super::NotificationMeta;
use crate::identity::domain::EmailAddress;

/// Envelope submitted to a [`crate::notification::ports::MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender address.
    pub from: EmailAddress,
    /// Recipient address.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// A notification to deliver to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Recipient address.
    pub recipient: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Structured context stored with the record.
    pub meta: Option<NotificationMeta>,
}

impl NotificationRequest {
    /// Creates a request without structured context.
    #[must_use]
    pub fn new(
        recipient: EmailAddress,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            subject: subject.into(),
            body: body.into(),
            meta: None,
        }
    }

    /// Attaches structured context.
    #[must_use]
    pub fn with_meta(mut self, meta: NotificationMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Builds the transport envelope sent from `sender`.
    #[must_use]
    pub fn to_mail(&self, sender: &EmailAddress) -> OutgoingMail {
        OutgoingMail {
            from: sender.clone(),
            to: self.recipient.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }
}
