//! Error types for identity domain validation.

use thiserror::Error;

/// Errors returned while constructing or mutating user values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The employee identifier is empty or malformed.
    #[error("invalid employee identifier: {0}")]
    InvalidEmployeeId(String),

    /// Employee identifiers are present exactly when the role is Employee.
    #[error("employee identifier must be present exactly for the Employee role")]
    EmployeeIdRoleMismatch,

    /// The verification code is not six ASCII digits.
    #[error("malformed verification code")]
    MalformedVerificationCode,

    /// The supplied verification code does not match.
    #[error("invalid verification code")]
    InvalidVerificationCode,

    /// The verification code has expired.
    #[error("verification code expired")]
    VerificationCodeExpired,

    /// No verification is pending for the user.
    #[error("no verification pending")]
    NoPendingVerification,

    /// The email address is already verified.
    #[error("email already verified")]
    AlreadyVerified,
}

/// Error returned while parsing roles from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
