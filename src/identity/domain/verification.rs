//! Email verification codes.

use super::IdentityDomainError;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Six-digit numeric verification code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    const LENGTH: usize = 6;

    /// Generates a fresh random code.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..Self::LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10_u8)))
            .collect();
        Self(code)
    }

    /// Parses a code supplied by a caller or read from storage.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::MalformedVerificationCode`] unless the
    /// trimmed value is exactly six ASCII digits.
    pub fn parse(value: &str) -> Result<Self, IdentityDomainError> {
        let trimmed = value.trim();
        if trimmed.len() != Self::LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentityDomainError::MalformedVerificationCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the code digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Verification code awaiting confirmation, with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    code: VerificationCode,
    expires_at: DateTime<Utc>,
}

impl PendingVerification {
    /// Issues a pending verification that expires `ttl` from now.
    #[must_use]
    pub fn issue(code: VerificationCode, ttl: Duration, clock: &impl Clock) -> Self {
        Self {
            code,
            expires_at: clock.utc() + ttl,
        }
    }

    /// Reconstructs a pending verification from storage.
    #[must_use]
    pub const fn from_parts(code: VerificationCode, expires_at: DateTime<Utc>) -> Self {
        Self { code, expires_at }
    }

    /// Returns the expected code.
    #[must_use]
    pub const fn code(&self) -> &VerificationCode {
        &self.code
    }

    /// Returns the expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Checks a supplied code against this verification at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidVerificationCode`] on mismatch and
    /// [`IdentityDomainError::VerificationCodeExpired`] once `now` is past the
    /// expiry.
    pub fn check(&self, supplied: &str, now: DateTime<Utc>) -> Result<(), IdentityDomainError> {
        if supplied.trim() != self.code.as_str() {
            return Err(IdentityDomainError::InvalidVerificationCode);
        }
        if now > self.expires_at {
            return Err(IdentityDomainError::VerificationCodeExpired);
        }
        Ok(())
    }
}
