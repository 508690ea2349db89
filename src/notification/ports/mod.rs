//! Port contracts for notification delivery and storage.

mod notifier;
mod repository;
mod transport;

pub use notifier::Notifier;
pub use repository::{
    NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult,
};
pub use transport::{MailTransport, MailTransportError, MailTransportResult};
