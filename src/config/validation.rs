//! Configuration validation.
//!
//! Pure function over a parsed config; reports every problem at once.

use std::fmt;

use crate::config::schema::GuardConfig;
use crate::upload::signatures::lookup;

/// One semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Longest accepted attempt window (7 days).
pub const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted sweeper interval (1 day).
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Validate a config, returning all errors found.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let login = &config.login;

    if login.ttl_secs == 0 {
        errors.push(ValidationError::new("login.ttl_secs", "must be greater than 0"));
    } else if login.ttl_secs > MAX_TTL_SECS {
        errors.push(ValidationError::new(
            "login.ttl_secs",
            format!("must be at most {}", MAX_TTL_SECS),
        ));
    }
    if login.max_address_len == 0 {
        errors.push(ValidationError::new("login.max_address_len", "must be greater than 0"));
    }
    if login.fallback_address.trim().is_empty() {
        errors.push(ValidationError::new("login.fallback_address", "must not be empty"));
    } else if login.fallback_address.chars().count() > login.max_address_len {
        errors.push(ValidationError::new(
            "login.fallback_address",
            format!("longer than max_address_len ({})", login.max_address_len),
        ));
    }
    if login.sweep_enabled {
        if login.sweep_interval_secs == 0 {
            errors.push(ValidationError::new("login.sweep_interval_secs", "must be greater than 0"));
        } else if login.sweep_interval_secs > MAX_SWEEP_INTERVAL_SECS {
            errors.push(ValidationError::new(
                "login.sweep_interval_secs",
                format!("must be at most {}", MAX_SWEEP_INTERVAL_SECS),
            ));
        }
    }

    for ext in &config.uploads.allowed_extensions {
        let key = if config.uploads.case_insensitive {
            ext.to_ascii_lowercase()
        } else {
            ext.clone()
        };
        if lookup(&key).is_none() {
            errors.push(ValidationError::new(
                "uploads.allowed_extensions",
                format!("unknown extension {:?}", ext),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
