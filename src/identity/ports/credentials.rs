//! Credential contracts: password hashing and session tokens.
//!
//! Both mechanisms live outside this crate; services only depend on these
//! traits.

use crate::identity::domain::{PasswordHash, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Token flavours issued at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// Encoded token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token value.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Errors returned by credential adapters.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The token is malformed, tampered with, or of the wrong kind.
    #[error("invalid token")]
    InvalidToken,

    /// The token has expired.
    #[error("token expired")]
    Expired,

    /// Adapter failure.
    #[error("credential backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl CredentialError {
    /// Wraps an adapter failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Backend`] when hashing fails.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Returns `true` when `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

/// Issues and validates identity tokens whose subject is a [`UserId`].
pub trait TokenIssuer: Send + Sync {
    /// Issues a token of `kind` for `subject` valid until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Backend`] when signing fails.
    fn issue(
        &self,
        subject: UserId,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError>;

    /// Validates a token of `kind` at `now` and returns its subject.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidToken`] or
    /// [`CredentialError::Expired`].
    fn verify(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<UserId, CredentialError>;
}
