//! Identifier and validated scalar types for the task domain.

use super::TaskDomainError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form, non-empty priority label such as `High`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPriority(String);

impl TaskPriority {
    /// Creates a validated priority label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPriority`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyPriority);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Task deadline.
///
/// Keeps the form it was supplied in: calendar dates render back as
/// `YYYY-MM-DD` and timestamps as RFC 3339 with their original offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Deadline {
    instant: DateTime<FixedOffset>,
    calendar_date: bool,
}

impl Deadline {
    /// Parses a deadline from `YYYY-MM-DD` or an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDeadline`] for any other input.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self {
                instant: date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
                calendar_date: true,
            });
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|instant| Self {
                instant,
                calendar_date: false,
            })
            .map_err(|_| TaskDomainError::InvalidDeadline(value.to_owned()))
    }

    /// Returns the deadline instant in UTC.
    #[must_use]
    pub fn instant(self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }

    /// Returns `true` when the deadline was given as a calendar date.
    #[must_use]
    pub const fn is_calendar_date(self) -> bool {
        self.calendar_date
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.calendar_date {
            write!(f, "{}", self.instant.format("%Y-%m-%d"))
        } else {
            f.write_str(&self.instant.to_rfc3339())
        }
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
