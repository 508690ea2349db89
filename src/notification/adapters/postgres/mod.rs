//! `PostgreSQL` adapter for the notification log.

mod models;
mod repository;
mod schema;

pub use repository::PostgresNotificationRepository;
