//! Login, token refresh, and caller resolution.

use crate::api::{ResponseStatus, status};
use crate::identity::{
    domain::{EmailAddress, EmployeeId, Role, User, UserId, Username},
    ports::{
        CredentialError, IssuedToken, PasswordHasher, TokenIssuer, TokenKind, UserRepository,
        UserRepositoryError,
    },
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Token lifetimes used by the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Access token lifetime.
    pub access_ttl: chrono::Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: chrono::Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            access_ttl: chrono::Duration::minutes(15),
            refresh_ttl: chrono::Duration::days(7),
        }
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    /// Short-lived access token.
    pub token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Role of the authenticated user.
    pub role: Role,
    /// Display name of the authenticated user.
    pub username: Username,
    /// Employee identifier, present for Employee-role users.
    pub employee_id: Option<EmployeeId>,
}

/// Service-level errors for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The user has not confirmed their email address.
    #[error("email address not verified")]
    NotVerified,
    /// A valid token names a user that no longer exists.
    #[error("token subject {0} no longer exists")]
    UnknownSubject(UserId),
    /// Token validation or signing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl ResponseStatus for SessionError {
    fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::UnknownSubject(_)
            | Self::Credential(CredentialError::InvalidToken | CredentialError::Expired) => {
                status::UNAUTHORIZED
            }
            Self::NotVerified => status::FORBIDDEN,
            Self::Credential(CredentialError::Backend(_)) | Self::Repository(_) => {
                status::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_owned(),
            Self::NotVerified => "Please verify your email before logging in".to_owned(),
            Self::UnknownSubject(_) => "User not found".to_owned(),
            Self::Credential(CredentialError::Expired) => "Token expired".to_owned(),
            Self::Credential(CredentialError::InvalidToken) => "Invalid token".to_owned(),
            Self::Credential(CredentialError::Backend(_)) | Self::Repository(_) => {
                "Internal server error".to_owned()
            }
        }
    }
}

/// Authenticates users and resolves bearer tokens to callers.
pub struct SessionService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<C>,
    settings: SessionSettings,
}

impl<U, C> SessionService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<C>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            settings,
        }
    }

    /// Authenticates a verified user and issues an access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCredentials`] for an unknown address or
    /// wrong password and [`SessionError::NotVerified`] for an unconfirmed
    /// address.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<LoginOutcome> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(SessionError::InvalidCredentials);
        };
        let user = self
            .users
            .find_by_email(&address)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;
        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "password mismatch");
            return Err(SessionError::InvalidCredentials);
        }
        if !user.is_verified() {
            return Err(SessionError::NotVerified);
        }

        let access = self.issue(&user, TokenKind::Access)?;
        let refresh = self.issue(&user, TokenKind::Refresh)?;
        info!(user_id = %user.id(), role = %user.role(), "user logged in");
        Ok(LoginOutcome {
            token: access.token,
            refresh_token: refresh.token,
            role: user.role(),
            username: user.username().clone(),
            employee_id: user.employee_id().cloned(),
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Credential`] for invalid or expired tokens and
    /// [`SessionError::UnknownSubject`] when the user has been deleted.
    pub async fn refresh(&self, refresh_token: &str) -> SessionResult<IssuedToken> {
        let subject = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh, self.clock.utc())?;
        let user = self.load_subject(subject).await?;
        self.issue(&user, TokenKind::Access)
    }

    /// Resolves an access token to the identifier of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Credential`] for invalid or expired tokens and
    /// [`SessionError::UnknownSubject`] when the user has been deleted.
    pub async fn resolve_caller(&self, access_token: &str) -> SessionResult<User> {
        let subject = self
            .tokens
            .verify(access_token, TokenKind::Access, self.clock.utc())?;
        self.load_subject(subject).await
    }

    async fn load_subject(&self, subject: UserId) -> SessionResult<User> {
        self.users
            .find_by_id(subject)
            .await?
            .ok_or(SessionError::UnknownSubject(subject))
    }

    fn issue(&self, user: &User, kind: TokenKind) -> SessionResult<IssuedToken> {
        let ttl = match kind {
            TokenKind::Access => self.settings.access_ttl,
            TokenKind::Refresh => self.settings.refresh_ttl,
        };
        let expires_at = self.clock.utc() + ttl;
        Ok(self.tokens.issue(user.id(), kind, expires_at)?)
    }
}
