//! Administrative user directory.

use crate::api::{ResponseStatus, status};
use crate::identity::{
    domain::{UserId, UserPatch, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The user does not exist.
    #[error("user {0} not found")]
    NotFound(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl From<UserRepositoryError> for DirectoryError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl ResponseStatus for DirectoryError {
    fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => status::NOT_FOUND,
            Self::Repository(
                UserRepositoryError::DuplicateEmail(_) | UserRepositoryError::DuplicateUser(_),
            ) => status::BAD_REQUEST,
            Self::Repository(_) => status::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::NotFound(_) => "User not found".to_owned(),
            Self::Repository(UserRepositoryError::DuplicateEmail(_)) => {
                "Email already in use".to_owned()
            }
            Self::Repository(UserRepositoryError::DuplicateUser(_)) => {
                "User already exists!".to_owned()
            }
            Self::Repository(_) => "Internal server error".to_owned(),
        }
    }
}

/// Lists, reads, edits, and deletes users.
///
/// Authorisation of the calling user is the caller's concern; the service
/// never exposes credential material.
pub struct UserDirectoryService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    clock: Arc<C>,
}

impl<U, C> UserDirectoryService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(users: Arc<U>, clock: Arc<C>) -> Self {
        Self { users, clock }
    }

    /// Lists every user in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when loading fails.
    pub async fn list_users(&self) -> DirectoryResult<Vec<UserProfile>> {
        let users = self.users.list_all().await?;
        Ok(users.iter().map(crate::identity::domain::User::profile).collect())
    }

    /// Returns one user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when the user does not exist.
    pub async fn get_user(&self, id: UserId) -> DirectoryResult<UserProfile> {
        self.users
            .find_by_id(id)
            .await?
            .map(|user| user.profile())
            .ok_or(DirectoryError::NotFound(id))
    }

    /// Applies a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when the user does not exist and
    /// [`DirectoryError::Repository`] when a changed email collides.
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> DirectoryResult<UserProfile> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(user.profile());
        }
        user.apply_patch(patch, &*self.clock);
        self.users.update(&user).await?;
        info!(user_id = %id, "user updated");
        Ok(user.profile())
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when the user does not exist.
    pub async fn delete_user(&self, id: UserId) -> DirectoryResult<()> {
        self.users.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
