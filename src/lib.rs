//! Tasklane: employee task management with role-based lifecycle rules.
//!
//! Supervisors (Admins and Managers) assign tasks to employees; employees
//! report progress on their own tasks; every notable transition is recorded
//! as an in-app notification and mailed on a best-effort basis.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`identity`]: Users, roles, registration, sessions
//! - [`task`]: Task lifecycle and its capability table
//! - [`notification`]: Notification records and mail dispatch
//! - [`api`]: Response bodies and status mapping
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Tracing bootstrap
//! - [`persistence`]: Shared `PostgreSQL` pool

pub mod api;
pub mod config;
pub mod identity;
pub mod notification;
pub mod persistence;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
