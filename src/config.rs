//! Configuration Module
//!
//! Handles loading the cache root and server settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default cache root, relative to the process working directory.
pub const DEFAULT_ROOT: &str = "../JsonData";

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which every cached document lives
    pub root: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Max age in seconds applied by HTTP reads that name none (0 = never expire)
    pub default_max_age: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `JSON_CACHE_ROOT` - Cache root directory (default: `../JsonData`)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_MAX_AGE` - Default read max age in seconds (default: 0)
    pub fn from_env() -> Self {
        Self {
            root: env::var("JSON_CACHE_ROOT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            default_max_age: env::var("DEFAULT_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Creates a Config rooted at the given directory, other values defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Returns the default max age, or None when expiry is disabled.
    pub fn default_max_age(&self) -> Option<Duration> {
        (self.default_max_age > 0).then(|| Duration::from_secs(self.default_max_age))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            server_port: 3000,
            default_max_age: 0,
        }
    }
}
