//! Error types for the document cache
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the document cache.
///
/// A missing or expired entry is never an error: the `try_*` operations
/// report it as `Ok(None)` / `Ok(false)`. These variants describe why an
/// operation could not complete.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty, contains invalid characters, or escapes the cache root
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Document or folder required by the operation does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is well-formed but cannot be served
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Stored text could not be decoded as a document
    #[error("Malformed document at '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying filesystem failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Background blocking task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Malformed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Io { .. } | CacheError::Internal(_) => {
                tracing::error!(error = %self, "Cache operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the document cache.
pub type Result<T> = std::result::Result<T, CacheError>;
