//! Notification dispatch services.

mod delivery;
mod dispatcher;

pub use delivery::deliver_with_timeout;
pub use dispatcher::{DeliveryMode, DispatchSettings, NotificationDispatcher};
