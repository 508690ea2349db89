//! In-memory notification adapters.

mod repository;
mod transport;

pub use repository::InMemoryNotificationRepository;
pub use transport::RecordingMailTransport;
