//! Runtime configuration loaded from environment variables.

use crate::identity::domain::EmailAddress;
use crate::identity::services::{AccountSettings, SessionSettings};
use crate::notification::services::{DeliveryMode, DispatchSettings};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SENDER: &str = "noreply@localhost";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` URL; `None` selects the in-memory adapters.
    pub database_url: Option<String>,
    /// Sender recorded on notifications and verification mail.
    pub sender: EmailAddress,
    /// Upper bound on one transport attempt.
    pub smtp_timeout: Duration,
    /// Whether mail is sent before or after the request completes.
    pub mail_delivery: DeliveryMode,
    /// Access token lifetime.
    pub access_token_ttl: chrono::Duration,
    /// Refresh token lifetime.
    pub refresh_token_ttl: chrono::Duration,
    /// Verification code lifetime.
    pub verification_code_ttl: chrono::Duration,
    /// Default tracing filter.
    pub log_level: String,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    ///
    /// Unset and blank variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let sender_raw = read("SMTP_USER").unwrap_or_else(|| DEFAULT_SENDER.to_owned());
        let sender = EmailAddress::new(sender_raw.clone()).map_err(|err| ConfigError::Invalid {
            key: "SMTP_USER",
            value: sender_raw,
            reason: err.to_string(),
        })?;

        let mail_delivery = match read("MAIL_DELIVERY") {
            None => DeliveryMode::default(),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "inline" => DeliveryMode::Inline,
                "detached" => DeliveryMode::Detached,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MAIL_DELIVERY",
                        value: raw,
                        reason: "expected 'inline' or 'detached'".to_owned(),
                    });
                }
            },
        };

        Ok(Self {
            database_url: read("DATABASE_URL"),
            sender,
            smtp_timeout: Duration::from_secs(positive(&read, "SMTP_TIMEOUT_SECS", 10)?.into()),
            mail_delivery,
            access_token_ttl: chrono::Duration::minutes(
                positive(&read, "JWT_ACCESS_TOKEN_MINUTES", 15)?.into(),
            ),
            refresh_token_ttl: chrono::Duration::days(
                positive(&read, "JWT_REFRESH_TOKEN_DAYS", 7)?.into(),
            ),
            verification_code_ttl: chrono::Duration::minutes(
                positive(&read, "VERIFICATION_CODE_MINUTES", 10)?.into(),
            ),
            log_level: read("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
        })
    }

    /// Settings for the notification dispatcher.
    #[must_use]
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings::new(self.sender.clone())
            .with_send_timeout(self.smtp_timeout)
            .with_delivery(self.mail_delivery)
    }

    /// Settings for the account service.
    #[must_use]
    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            sender: self.sender.clone(),
            verification_ttl: self.verification_code_ttl,
            send_timeout: self.smtp_timeout,
        }
    }

    /// Settings for the session service.
    #[must_use]
    pub const fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            access_ttl: self.access_token_ttl,
            refresh_ttl: self.refresh_token_ttl,
        }
    }
}

/// Parses a strictly positive whole number, or returns `default` when unset.
fn positive<R>(read: &R, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    R: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_owned(),
        }),
        Ok(value) => Ok(value),
        Err(err) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::notification::services::DeliveryMode;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::time::Duration;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[rstest]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&[]).expect("defaults should load");

        assert_eq!(config.database_url, None);
        assert_eq!(config.sender.as_str(), "noreply@localhost");
        assert_eq!(config.smtp_timeout, Duration::from_secs(10));
        assert_eq!(config.mail_delivery, DeliveryMode::Inline);
        assert_eq!(config.access_token_ttl, chrono::Duration::minutes(15));
        assert_eq!(config.refresh_token_ttl, chrono::Duration::days(7));
        assert_eq!(config.verification_code_ttl, chrono::Duration::minutes(10));
        assert_eq!(config.log_level, "info");
    }

    #[rstest]
    fn explicit_values_override_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/tasks"),
            ("SMTP_USER", "Alerts@Example.com"),
            ("SMTP_TIMEOUT_SECS", "3"),
            ("MAIL_DELIVERY", "Detached"),
            ("JWT_ACCESS_TOKEN_MINUTES", "30"),
            ("LOG_LEVEL", "debug"),
        ])
        .expect("config should load");

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tasks"));
        assert_eq!(config.sender.as_str(), "alerts@example.com");
        assert_eq!(config.smtp_timeout, Duration::from_secs(3));
        assert_eq!(config.mail_delivery, DeliveryMode::Detached);
        assert_eq!(config.access_token_ttl, chrono::Duration::minutes(30));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.dispatch_settings().send_timeout, Duration::from_secs(3));
    }

    #[rstest]
    fn largest_whole_numbers_are_accepted() {
        let config = load(&[
            ("SMTP_TIMEOUT_SECS", "4294967295"),
            ("JWT_ACCESS_TOKEN_MINUTES", "4294967295"),
            ("JWT_REFRESH_TOKEN_DAYS", "4294967295"),
        ])
        .expect("config should load");

        assert_eq!(config.smtp_timeout, Duration::from_secs(u64::from(u32::MAX)));
        assert_eq!(
            config.access_token_ttl,
            chrono::Duration::minutes(i64::from(u32::MAX))
        );
        assert_eq!(config.refresh_token_ttl, chrono::Duration::days(i64::from(u32::MAX)));
    }

    #[rstest]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("SMTP_TIMEOUT_SECS", "  "), ("DATABASE_URL", "")])
            .expect("config should load");

        assert_eq!(config.smtp_timeout, Duration::from_secs(10));
        assert_eq!(config.database_url, None);
    }

    #[rstest]
    #[case("SMTP_TIMEOUT_SECS", "ten")]
    #[case("SMTP_TIMEOUT_SECS", "0")]
    #[case("JWT_REFRESH_TOKEN_DAYS", "-1")]
    #[case("MAIL_DELIVERY", "carrier-pigeon")]
    #[case("SMTP_USER", "not-an-address")]
    fn invalid_values_name_the_variable(#[case] key: &str, #[case] value: &str) {
        let err = load(&[(key, value)]).expect_err("value should be rejected");

        let ConfigError::Invalid {
            key: reported,
            value: reported_value,
            ..
        } = err;
        assert_eq!(reported, key);
        assert_eq!(reported_value, value);
    }
}
