//! Core value types shared by the domain objects.

use crate::error::ApiError;
use crate::services::User;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Parse a server timestamp.
///
/// Accepts RFC 3339, and ISO-8601 without an offset, which is read as UTC.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => {
            let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")?;
            Ok(Utc.from_utc_datetime(&naive))
        }
    }
}

/// Which receiver list an alert receiver belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// A Graylog user, addressed by username.
    User,
    /// A plain email address.
    Email,
}

impl ReceiverKind {
    /// Convert to the `type` query parameter value.
    pub fn to_query_value(&self) -> &'static str {
        match self {
            ReceiverKind::User => "users",
            ReceiverKind::Email => "emails",
        }
    }
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_query_value())
    }
}

/// An alert receiver: a user or an email address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReceiverRef {
    pub kind: ReceiverKind,
    pub value: String,
}

impl ReceiverRef {
    /// A receiver addressed by username.
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            kind: ReceiverKind::User,
            value: username.into(),
        }
    }

    /// A receiver addressed by email.
    pub fn email(address: impl Into<String>) -> Self {
        Self {
            kind: ReceiverKind::Email,
            value: address.into(),
        }
    }
}

impl From<&User> for ReceiverRef {
    fn from(user: &User) -> Self {
        ReceiverRef::user(user.username.clone())
    }
}

impl From<&str> for ReceiverRef {
    fn from(email: &str) -> Self {
        ReceiverRef::email(email)
    }
}

impl From<String> for ReceiverRef {
    fn from(email: String) -> Self {
        ReceiverRef::email(email)
    }
}

/// Match operation of a stream rule.
///
/// Wire codes are the integers the server uses in the `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamRuleType {
    Exact,
    Greater,
    Smaller,
    Regex,
    Presence,
    /// A code this client does not know about.
    Unknown(i32),
}

impl StreamRuleType {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => StreamRuleType::Exact,
            2 => StreamRuleType::Greater,
            3 => StreamRuleType::Smaller,
            4 => StreamRuleType::Regex,
            5 => StreamRuleType::Presence,
            other => StreamRuleType::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            StreamRuleType::Exact => 1,
            StreamRuleType::Greater => 2,
            StreamRuleType::Smaller => 3,
            StreamRuleType::Regex => 4,
            StreamRuleType::Presence => 5,
            StreamRuleType::Unknown(code) => *code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, StreamRuleType::Unknown(_))
    }
}

impl fmt::Display for StreamRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRuleType::Exact => f.write_str("match exactly"),
            StreamRuleType::Greater => f.write_str("greater than"),
            StreamRuleType::Smaller => f.write_str("smaller than"),
            StreamRuleType::Regex => f.write_str("match regular expression"),
            StreamRuleType::Presence => f.write_str("field presence"),
            StreamRuleType::Unknown(code) => write!(f, "unknown rule type {}", code),
        }
    }
}
