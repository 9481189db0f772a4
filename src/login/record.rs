//! Attempt records, login fingerprints and input validation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Separator between username and address inside a fingerprint.
const KEY_SEPARATOR: char = '\u{1f}';

/// Errors returned by the attempt tracker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Username empty, address too long, or similar caller mistake.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Deterministic key for one (username, address) pair.
///
/// The two parts are joined with the ASCII unit separator, which does not
/// occur in user names or network addresses, so distinct pairs map to
/// distinct keys and swapping the parts changes the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(username: &str, address: &str) -> Self {
        let mut key = String::with_capacity(username.len() + address.len() + 1);
        key.push_str(username);
        key.push(KEY_SEPARATOR);
        key.push_str(address);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render the separator visibly for logs.
        write!(f, "{}", self.0.replace(KEY_SEPARATOR, "@"))
    }
}

/// One login-attempt counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub key: Fingerprint,
    /// Attempts recorded in the current window, starting at 1.
    pub attempt: u32,
    pub username: String,
    pub address: String,
    /// First user agent seen for this key.
    pub user_agent: Option<String>,
}

impl AttemptRecord {
    pub(crate) fn first(key: Fingerprint, username: &str, address: &str, user_agent: Option<&str>) -> Self {
        Self {
            key,
            attempt: 1,
            username: username.to_string(),
            address: address.to_string(),
            user_agent: user_agent.map(str::to_string),
        }
    }

    /// The record that follows this one: count + 1, identity and first
    /// user agent kept.
    pub(crate) fn next(&self, user_agent: Option<&str>) -> Self {
        Self {
            key: self.key.clone(),
            attempt: self.attempt.saturating_add(1),
            username: self.username.clone(),
            address: self.address.clone(),
            user_agent: self
                .user_agent
                .clone()
                .or_else(|| user_agent.map(str::to_string)),
        }
    }
}

/// Validated tracker input.
#[derive(Debug)]
pub(crate) struct LoginInput<'a> {
    pub username: &'a str,
    pub address: &'a str,
}

impl<'a> LoginInput<'a> {
    /// Check caller input and resolve the address fallback.
    pub fn parse(
        username: &'a str,
        address: Option<&'a str>,
        fallback_address: &'a str,
        max_address_len: usize,
    ) -> TrackerResult<Self> {
        if username.trim().is_empty() {
            return Err(TrackerError::InvalidArgument("username is empty".into()));
        }

        // Length is checked on the raw input, before any fallback.
        let raw = address.unwrap_or(fallback_address);
        let len = raw.chars().count();
        if len > max_address_len {
            return Err(TrackerError::InvalidArgument(format!(
                "address is {} characters, limit is {}",
                len, max_address_len
            )));
        }

        let address = if raw.trim().is_empty() { fallback_address } else { raw };

        Ok(Self { username, address })
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.username, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        assert_eq!(Fingerprint::new("alice", "1.2.3.4"), Fingerprint::new("alice", "1.2.3.4"));
        assert_ne!(Fingerprint::new("alice", "bob"), Fingerprint::new("bob", "alice"));
        assert_ne!(Fingerprint::new("ab", "c"), Fingerprint::new("a", "bc"));
        assert_eq!(Fingerprint::new("alice", "::1").to_string(), "alice@::1");
    }

    #[test]
    fn test_next_keeps_first_user_agent() {
        let key = Fingerprint::new("alice", "1.2.3.4");
        let first = AttemptRecord::first(key, "alice", "1.2.3.4", None);
        let second = first.next(Some("UA2"));
        assert_eq!(second.attempt, 2);
        assert_eq!(second.user_agent.as_deref(), Some("UA2"));

        let third = second.next(Some("UA3"));
        assert_eq!(third.attempt, 3);
        assert_eq!(third.user_agent.as_deref(), Some("UA2"));
    }

    #[test]
    fn test_input_validation() {
        assert!(LoginInput::parse("  ", Some("1.2.3.4"), "0.0.0.0", 255).is_err());
        assert!(LoginInput::parse("", None, "0.0.0.0", 255).is_err());

        let long = "a".repeat(256);
        assert!(LoginInput::parse("alice", Some(long.as_str()), "0.0.0.0", 255).is_err());
        let edge = "a".repeat(255);
        assert!(LoginInput::parse("alice", Some(edge.as_str()), "0.0.0.0", 255).is_ok());

        let input = LoginInput::parse("alice", None, "0.0.0.0", 255).unwrap();
        assert_eq!(input.address, "0.0.0.0");
        let input = LoginInput::parse("alice", Some(" "), "0.0.0.0", 255).unwrap();
        assert_eq!(input.address, "0.0.0.0");

        let blank = " ".repeat(256);
        assert!(LoginInput::parse("alice", Some(blank.as_str()), "0.0.0.0", 255).is_err());
    }
}
