//! Port contracts for user persistence and credential handling.
//!
//! Ports define infrastructure-agnostic interfaces used by identity and task
//! services.

pub mod allocator;
pub mod credentials;
pub mod repository;

pub use allocator::EmployeeIdAllocator;
pub use credentials::{CredentialError, IssuedToken, PasswordHasher, TokenIssuer, TokenKind};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
