//! User accounts, roles, and caller identity.
//!
//! This module owns the user records consumed by the task lifecycle for
//! authorization: role, employee identifier, and contact address. It also
//! carries the account flows around them (registration with email
//! verification, session token issuance, and directory maintenance). Token
//! and password mechanics stay behind the [`ports::PasswordHasher`] and
//! [`ports::TokenIssuer`] contracts.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
