//! Notification dispatch and the in-app notification log.
//!
//! Every dispatched notification produces two independent effects: a durable
//! notification record and a best-effort mail delivery through the external
//! [`ports::MailTransport`]. Transport failures are recorded on the record
//! and never propagate to the caller.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
