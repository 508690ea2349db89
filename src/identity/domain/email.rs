//! Validated email address type.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized email address.
///
/// Addresses are trimmed and lowercased so that uniqueness checks are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] unless the value holds
    /// exactly one `@` with non-empty local and domain parts and no
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
