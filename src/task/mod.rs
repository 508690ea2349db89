//! Task lifecycle management.
//!
//! Supervisors create and edit tasks; employees move their own tasks through
//! `Pending`, `In Progress` and `Done`; anyone may flag a task as `Overdue`.
//! Transitions fan out notifications through
//! [`crate::notification::ports::Notifier`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
