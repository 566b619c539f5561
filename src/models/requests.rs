//! Request DTOs for the cache server API
//!
//! Defines the query strings accepted by the read and list endpoints.

use std::time::Duration;

use serde::Deserialize;

/// Query for document reads (GET /docs/*key)
///
/// # Fields
/// - `max_age`: Optional max age in seconds; older entries are evicted and reported missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadQuery {
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl ReadQuery {
    /// Returns the requested max age, falling back to `default`.
    ///
    /// An explicit `max_age=0` disables expiry even when a default is configured.
    pub fn max_age_or(&self, default: Option<Duration>) -> Option<Duration> {
        match self.max_age {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => default,
        }
    }
}

/// Query for subtree listing (GET /list/*prefix)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Include nested folders
    #[serde(default)]
    pub recursive: bool,
    /// File name prefix filter
    #[serde(default)]
    pub filter: String,
}
