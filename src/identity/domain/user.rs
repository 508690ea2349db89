//! User aggregate root.

use super::{
    EmailAddress, EmployeeId, IdentityDomainError, PendingVerification, Role, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty display name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyUsername`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque password credential produced by a [`crate::identity::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash.
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated input for a newly registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub username: Username,
    /// Unique contact address.
    pub email: EmailAddress,
    /// Hashed credential.
    pub password_hash: PasswordHash,
    /// Assigned role.
    pub role: Role,
    /// Employee identifier, required exactly for [`Role::Employee`].
    pub employee_id: Option<EmployeeId>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted display name.
    pub username: Username,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted credential hash.
    pub password_hash: PasswordHash,
    /// Persisted role.
    pub role: Role,
    /// Persisted employee identifier.
    pub employee_id: Option<EmployeeId>,
    /// Whether the email address has been confirmed.
    pub is_verified: bool,
    /// Outstanding verification, if any.
    pub verification: Option<PendingVerification>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied through the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement display name.
    pub username: Option<Username>,
    /// Replacement email address.
    pub email: Option<EmailAddress>,
}

impl UserPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    role: Role,
    employee_id: Option<EmployeeId>,
    is_verified: bool,
    verification: Option<PendingVerification>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Registers a new, unverified user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmployeeIdRoleMismatch`] unless an
    /// employee identifier is supplied exactly when the role is
    /// [`Role::Employee`].
    pub fn register(
        new_user: NewUser,
        verification: PendingVerification,
        clock: &impl Clock,
    ) -> Result<Self, IdentityDomainError> {
        let is_employee = new_user.role == Role::Employee;
        if is_employee != new_user.employee_id.is_some() {
            return Err(IdentityDomainError::EmployeeIdRoleMismatch);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            employee_id: new_user.employee_id,
            is_verified: false,
            verification: Some(verification),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            employee_id: data.employee_id,
            is_verified: data.is_verified,
            verification: data.verification,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the credential hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the employee identifier for Employee-role users.
    #[must_use]
    pub const fn employee_id(&self) -> Option<&EmployeeId> {
        self.employee_id.as_ref()
    }

    /// Returns whether the email address has been confirmed.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Returns the outstanding verification, if any.
    #[must_use]
    pub const fn verification(&self) -> Option<&PendingVerification> {
        self.verification.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Confirms the email address with the supplied code.
    ///
    /// Clears the pending verification on success.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::AlreadyVerified`],
    /// [`IdentityDomainError::NoPendingVerification`], or the mismatch and
    /// expiry errors of [`PendingVerification::check`].
    pub fn verify_email(
        &mut self,
        code: &str,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        if self.is_verified {
            return Err(IdentityDomainError::AlreadyVerified);
        }
        let pending = self
            .verification
            .as_ref()
            .ok_or(IdentityDomainError::NoPendingVerification)?;
        let now = clock.utc();
        pending.check(code, now)?;

        self.is_verified = true;
        self.verification = None;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the outstanding verification with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::AlreadyVerified`] when there is nothing
    /// left to verify.
    pub fn reissue_verification(
        &mut self,
        verification: PendingVerification,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        if self.is_verified {
            return Err(IdentityDomainError::AlreadyVerified);
        }
        self.verification = Some(verification);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Applies a directory patch.
    pub fn apply_patch(&mut self, patch: UserPatch, clock: &impl Clock) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        self.updated_at = clock.utc();
    }

    /// Returns the credential-free public view of this user.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            employee_id: self.employee_id.clone(),
            is_verified: self.is_verified,
        }
    }
}

/// Credential-free view of a user returned by directory listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub username: Username,
    /// Email address.
    pub email: EmailAddress,
    /// Role.
    pub role: Role,
    /// Employee identifier for Employee-role users.
    pub employee_id: Option<EmployeeId>,
    /// Whether the email address has been confirmed.
    pub is_verified: bool,
}
