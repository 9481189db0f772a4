//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Upload signature verification.
    pub uploads: UploadConfig,

    /// Login attempt tracking.
    pub login: LoginConfig,

    /// Logging.
    pub observability: ObservabilityConfig,
}

/// Upload verification policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Compare the filename suffix and extension ignoring ASCII case.
    pub case_insensitive: bool,

    /// Restrict accepted extensions. Empty means every known format.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            allowed_extensions: Vec::new(),
        }
    }
}

/// Login attempt tracker settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Lifetime of an attempt record after its latest attempt, in seconds.
    pub ttl_secs: u64,

    /// Address used when the client address is unknown.
    pub fallback_address: String,

    /// Longest accepted address, in characters.
    pub max_address_len: usize,

    /// Run the background sweeper.
    pub sweep_enabled: bool,

    /// Sweeper interval in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            fallback_address: "0.0.0.0".to_string(),
            max_address_len: 255,
            sweep_enabled: true,
            sweep_interval_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
