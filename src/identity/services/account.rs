//! Registration and email verification.

use crate::api::{ResponseStatus, status};
use crate::identity::{
    domain::{
        EmailAddress, IdentityDomainError, NewUser, PendingVerification, Role, User, Username,
        VerificationCode,
    },
    ports::{
        CredentialError, EmployeeIdAllocator, PasswordHasher, UserRepository, UserRepositoryError,
    },
};
use crate::notification::{
    domain::OutgoingMail, ports::MailTransport, services::deliver_with_timeout,
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const VERIFICATION_SUBJECT: &str = "Email Verification";

/// Request payload for registering a user.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    email: String,
    password: String,
    role: Role,
}

impl RegisterUserRequest {
    /// Creates a request for an Employee-role account.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: Role::Employee,
        }
    }

    /// Sets the requested role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Account service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    /// Sender of verification mail.
    pub sender: EmailAddress,
    /// Lifetime of a verification code.
    pub verification_ttl: chrono::Duration,
    /// Upper bound on a verification mail attempt.
    pub send_timeout: Duration,
}

impl AccountSettings {
    /// Creates settings with a ten minute code lifetime and ten second send
    /// budget.
    #[must_use]
    pub const fn new(sender: EmailAddress) -> Self {
        Self {
            sender,
            verification_ttl: chrono::Duration::minutes(10),
            send_timeout: Duration::from_secs(10),
        }
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// Password hashing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// The email address already belongs to a user.
    #[error("email already registered: {0}")]
    EmailTaken(EmailAddress),
    /// No user owns the email address.
    #[error("no user with email {0}")]
    UnknownEmail(EmailAddress),
    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

impl ResponseStatus for AccountError {
    fn status_code(&self) -> u16 {
        match self {
            Self::Domain(_)
            | Self::EmailTaken(_)
            | Self::EmptyPassword
            | Self::Repository(UserRepositoryError::DuplicateEmail(_)) => status::BAD_REQUEST,
            Self::UnknownEmail(_) => status::NOT_FOUND,
            Self::Repository(_) | Self::Credential(_) => status::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::EmailTaken(_) | Self::Repository(UserRepositoryError::DuplicateEmail(_)) => {
                "User already exists!".to_owned()
            }
            Self::UnknownEmail(_) => "User not found".to_owned(),
            Self::Domain(IdentityDomainError::InvalidVerificationCode) => "Invalid code".to_owned(),
            Self::Domain(IdentityDomainError::VerificationCodeExpired) => "Code expired".to_owned(),
            Self::Domain(IdentityDomainError::AlreadyVerified) => {
                "Email already verified".to_owned()
            }
            Self::Domain(err) => err.to_string(),
            Self::EmptyPassword => self.to_string(),
            Self::Repository(_) | Self::Credential(_) => "Internal server error".to_owned(),
        }
    }
}

/// Registration and email verification service.
pub struct AccountService<U, A, C>
where
    U: UserRepository,
    A: EmployeeIdAllocator,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    allocator: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn MailTransport>,
    clock: Arc<C>,
    settings: AccountSettings,
}

impl<U, A, C> AccountService<U, A, C>
where
    U: UserRepository,
    A: EmployeeIdAllocator,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        allocator: Arc<A>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn MailTransport>,
        clock: Arc<C>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            users,
            allocator,
            hasher,
            mailer,
            clock,
            settings,
        }
    }

    /// Registers an unverified user and mails a verification code.
    ///
    /// Employee-role users receive a freshly allocated employee identifier.
    /// Mail failures are logged and do not fail registration.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailTaken`] when the address is already
    /// registered, domain errors for malformed input, and repository or
    /// hashing errors.
    pub async fn register(&self, request: RegisterUserRequest) -> AccountResult<User> {
        let RegisterUserRequest {
            username: raw_username,
            email: raw_email,
            password,
            role,
        } = request;
        let username = Username::new(raw_username)?;
        let email = EmailAddress::new(raw_email)?;
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email));
        }

        let password_hash = self.hasher.hash(&password)?;
        let employee_id = match role {
            Role::Employee => Some(self.allocator.allocate().await?),
            Role::Admin | Role::Manager => None,
        };
        let verification = self.issue_verification();
        let code = verification.code().clone();

        let user = User::register(
            NewUser {
                username,
                email,
                password_hash,
                role,
                employee_id,
            },
            verification,
            &*self.clock,
        )?;
        self.users.store(&user).await?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");

        self.send_code(user.email(), &code).await;
        Ok(user)
    }

    /// Confirms a user's email address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownEmail`] when no user owns the address
    /// and domain errors for wrong, expired, or unnecessary codes.
    pub async fn verify_email(&self, email: &str, code: &str) -> AccountResult<User> {
        let mut user = self.find_by_email(email).await?;
        user.verify_email(code, &*self.clock)?;
        self.users.update(&user).await?;
        info!(user_id = %user.id(), "email verified");
        Ok(user)
    }

    /// Issues and mails a new verification code.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownEmail`] when no user owns the address
    /// and [`IdentityDomainError::AlreadyVerified`] when the address is
    /// already confirmed.
    pub async fn resend_code(&self, email: &str) -> AccountResult<()> {
        let mut user = self.find_by_email(email).await?;
        let verification = self.issue_verification();
        let code = verification.code().clone();
        user.reissue_verification(verification, &*self.clock)?;
        self.users.update(&user).await?;
        self.send_code(user.email(), &code).await;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<User> {
        let address = EmailAddress::new(email)?;
        self.users
            .find_by_email(&address)
            .await?
            .ok_or(AccountError::UnknownEmail(address))
    }

    fn issue_verification(&self) -> PendingVerification {
        let code = VerificationCode::generate(&mut rand::rng());
        PendingVerification::issue(code, self.settings.verification_ttl, &*self.clock)
    }

    async fn send_code(&self, recipient: &EmailAddress, code: &VerificationCode) {
        let mail = OutgoingMail {
            from: self.settings.sender.clone(),
            to: recipient.clone(),
            subject: VERIFICATION_SUBJECT.to_owned(),
            body: format!("Your verification code is: {}", code.as_str()),
        };
        if let Err(err) =
            deliver_with_timeout(&*self.mailer, &mail, self.settings.send_timeout).await
        {
            warn!(recipient = %recipient, error = %err, "verification mail not delivered");
        }
    }
}
