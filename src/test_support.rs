//! Test doubles shared by the unit test modules.

use crate::identity::{
    domain::{PasswordHash, UserId},
    ports::{CredentialError, IssuedToken, PasswordHasher, TokenIssuer, TokenKind},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Mutex;

/// Clock that stays put until moved.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().expect("clock lock should not be poisoned");
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
                .single()
                .expect("valid fixed instant"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock should not be poisoned")
    }
}

/// Reversible "hash" that keeps tests readable.
#[derive(Debug, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        Ok(PasswordHash::new(format!("plain${password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str() == format!("plain${password}")
    }
}

/// Token issuer that remembers what it issued.
#[derive(Debug, Default)]
pub struct TableTokens {
    issued: Mutex<HashMap<String, (UserId, TokenKind, DateTime<Utc>)>>,
}

impl TokenIssuer for TableTokens {
    fn issue(
        &self,
        subject: UserId,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError> {
        let token = format!("{kind:?}-{}", uuid::Uuid::new_v4());
        self.issued
            .lock()
            .expect("token table lock should not be poisoned")
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
            .expect("token table lock should not be poisoned");
        let (subject, issued_kind, expires_at) = issued
            .get(token)
            .copied()
            .ok_or(CredentialError::InvalidToken)?;
        if issued_kind != kind {
            return Err(CredentialError::InvalidToken);
        }
        if now >= expires_at {
            return Err(CredentialError::Expired);
        }
        Ok(subject)
    }
}
