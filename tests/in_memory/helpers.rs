//! Shared wiring for in-memory integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tasklane::identity::{
    adapters::memory::{InMemoryEmployeeIdAllocator, InMemoryUserRepository},
    domain::{EmailAddress, PasswordHash, Role, User, UserId},
    ports::{CredentialError, IssuedToken, PasswordHasher, TokenIssuer, TokenKind},
    services::{
        AccountService, AccountSettings, RegisterUserRequest, SessionService, SessionSettings,
    },
};
use tasklane::notification::{
    adapters::memory::{InMemoryNotificationRepository, RecordingMailTransport},
    services::{DeliveryMode, DispatchSettings, NotificationDispatcher},
};
use tasklane::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};

/// Clock pinned to an instant until moved.
#[derive(Debug)]
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    /// Creates a clock at 2025-01-01 09:00 UTC.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.lock().map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

/// Password "hashing" by prefixing.
#[derive(Debug, Default)]
pub struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        Ok(PasswordHash::new(format!("hashed:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str() == format!("hashed:{password}")
    }
}

/// Token issuer that remembers the tokens it handed out.
#[derive(Debug, Default)]
pub struct MemoryTokens {
    issued: Mutex<HashMap<String, (UserId, TokenKind, DateTime<Utc>)>>,
}

impl TokenIssuer for MemoryTokens {
    fn issue(
        &self,
        subject: UserId,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError> {
        let token = format!("{kind:?}.{}", uuid::Uuid::new_v4());
        self.issued
            .lock()
            .map_err(|err| CredentialError::backend(std::io::Error::other(err.to_string())))?
            .insert(token.clone(), (subject, kind, expires_at));
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<UserId, CredentialError> {
        let issued = self
            .issued
            .lock()
            .map_err(|err| CredentialError::backend(std::io::Error::other(err.to_string())))?;
        match issued.get(token) {
            Some((subject, issued_kind, expires_at)) if *issued_kind == kind => {
                if now >= *expires_at {
                    Err(CredentialError::Expired)
                } else {
                    Ok(*subject)
                }
            }
            _ => Err(CredentialError::InvalidToken),
        }
    }
}

/// Dispatcher wired to in-memory adapters.
pub type TestDispatcher =
    NotificationDispatcher<InMemoryNotificationRepository, RecordingMailTransport, SteppingClock>;

/// Lifecycle service wired to in-memory adapters.
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    TestDispatcher,
    SteppingClock,
>;

/// Every service of the crate over one set of in-memory adapters.
pub struct App {
    pub users: Arc<InMemoryUserRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub mailer: Arc<RecordingMailTransport>,
    pub clock: Arc<SteppingClock>,
    pub dispatcher: Arc<TestDispatcher>,
    pub accounts:
        AccountService<InMemoryUserRepository, InMemoryEmployeeIdAllocator, SteppingClock>,
    pub sessions: SessionService<InMemoryUserRepository, SteppingClock>,
    pub lifecycle: TestLifecycle,
}

impl App {
    /// Wires the services with the given delivery mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender address is rejected.
    pub fn new(delivery: DeliveryMode) -> Result<Self, eyre::Report> {
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let mailer = Arc::new(RecordingMailTransport::new());
        let clock = Arc::new(SteppingClock::new());
        let sender = EmailAddress::new("noreply@tasklane.test")?;
        let hasher: Arc<dyn PasswordHasher> = Arc::new(PrefixHasher);

        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&notifications),
            Arc::clone(&mailer),
            Arc::clone(&clock),
            DispatchSettings::new(sender.clone()).with_delivery(delivery),
        ));
        let accounts = AccountService::new(
            Arc::clone(&users),
            Arc::new(InMemoryEmployeeIdAllocator::new()),
            Arc::clone(&hasher),
            mailer.clone(),
            Arc::clone(&clock),
            AccountSettings::new(sender),
        );
        let sessions = SessionService::new(
            Arc::clone(&users),
            hasher,
            Arc::new(MemoryTokens::default()),
            Arc::clone(&clock),
            SessionSettings::default(),
        );
        let lifecycle = TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&users),
            Arc::clone(&dispatcher),
            Arc::clone(&clock),
        );

        Ok(Self {
            users,
            tasks,
            notifications,
            mailer,
            clock,
            dispatcher,
            accounts,
            sessions,
            lifecycle,
        })
    }

    /// Registers and verifies a user, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or verification fails.
    pub async fn enrol(&self, name: &str, role: Role) -> Result<User, eyre::Report> {
        let email = format!("{}@example.com", name.to_ascii_lowercase());
        let user = self
            .accounts
            .register(RegisterUserRequest::new(name, email.as_str(), "s3cret").with_role(role))
            .await?;
        let code = user
            .verification()
            .map(|pending| pending.code().as_str().to_owned())
            .ok_or_else(|| eyre::eyre!("registration should leave a pending code"))?;
        Ok(self.accounts.verify_email(&email, &code).await?)
    }

    /// Logs in and resolves the access token back to a caller identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if login or token resolution fails.
    pub async fn sign_in(&self, user: &User) -> Result<UserId, eyre::Report> {
        let outcome = self.sessions.login(user.email().as_str(), "s3cret").await?;
        Ok(self.sessions.resolve_caller(&outcome.token).await?.id())
    }
}

/// Provides an inline-delivery application.
///
/// # Panics
///
/// Panics if the fixed sender address is rejected.
#[fixture]
pub fn app() -> App {
    App::new(DeliveryMode::Inline).unwrap_or_else(|err| panic!("app should wire: {err}"))
}
