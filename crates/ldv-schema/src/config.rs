//! Loader and traversal configuration.
//!
//! Schema fetches are configured from the environment, with explicit
//! construction available for tests and embedding.

use std::time::Duration;

/// Environment variable holding the fetch timeout in seconds.
pub const TIMEOUT_ENV: &str = "LDV_FETCH_TIMEOUT_SECS";

/// Environment variable overriding the HTTP `User-Agent`.
pub const USER_AGENT_ENV: &str = "LDV_USER_AGENT";

/// How schema documents are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// `User-Agent` header sent with every fetch.
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LDV_FETCH_TIMEOUT_SECS` (default: unset, no timeout)
    /// - `LDV_USER_AGENT` (default: `ldv/<version>`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            timeout: parse_timeout(std::env::var(TIMEOUT_ENV).ok().as_deref())?,
            user_agent: std::env::var(USER_AGENT_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_user_agent),
        })
    }

    /// Replace the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_user_agent() -> String {
    format!("ldv/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidTimeout(s.to_string())),
    }
}

/// Traversal switches for a payload walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Validate core objects only; domain objects are neither fetched nor checked.
    pub core_only: bool,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `LDV_FETCH_TIMEOUT_SECS` is set but is not a whole number of seconds.
    #[error("LDV_FETCH_TIMEOUT_SECS must be a whole number of seconds, got \"{0}\"")]
    InvalidTimeout(String),
}
