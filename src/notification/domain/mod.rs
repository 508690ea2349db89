//! Domain model for notifications.

mod mail;
mod notification;

pub use mail::{NotificationRequest, OutgoingMail};
pub use notification::{
    Notification, NotificationId, NotificationMeta, PersistedNotificationData,
};
