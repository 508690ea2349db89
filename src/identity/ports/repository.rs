//! Repository port for user persistence and role lookups.

use crate::identity::domain::{EmailAddress, EmployeeId, Role, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when the identifier
    /// exists, [`UserRepositoryError::DuplicateEmail`] when the address is
    /// taken, or [`UserRepositoryError::DuplicateEmployeeId`] when the
    /// employee identifier is already allocated.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Replaces the stored document of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// and [`UserRepositoryError::DuplicateEmail`] when a changed address
    /// collides with another user.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Removes a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;

    /// Returns the Employee-role users holding any of the given identifiers.
    ///
    /// Unknown identifiers are ignored; each matching user appears once.
    async fn find_employees(&self, ids: &[EmployeeId]) -> UserRepositoryResult<Vec<User>>;

    /// Returns all users whose role is in `roles`.
    async fn find_by_role_in(&self, roles: &[Role]) -> UserRepositoryResult<Vec<User>>;

    /// Counts users holding `role`.
    async fn count_by_role(&self, role: Role) -> UserRepositoryResult<u64>;

    /// Returns every user.
    async fn list_all(&self) -> UserRepositoryResult<Vec<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// Another user already owns the email address.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(EmailAddress),

    /// Another user already holds the employee identifier.
    #[error("duplicate employee identifier: {0}")]
    DuplicateEmployeeId(EmployeeId),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
