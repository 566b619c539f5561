//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for document reads (GET /docs/*key)
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    /// The requested key
    pub key: String,
    /// The stored document
    pub document: Value,
}

impl DocumentResponse {
    pub fn new(key: impl Into<String>, document: Value) -> Self {
        Self {
            key: key.into(),
            document,
        }
    }
}

/// Response body for field reads (GET /fields/:field/*key)
#[derive(Debug, Clone, Serialize)]
pub struct FieldResponse {
    pub key: String,
    pub field: String,
    pub value: Value,
}

impl FieldResponse {
    pub fn new(key: impl Into<String>, field: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
            value,
        }
    }
}

/// Response body for document writes (PUT /docs/*key)
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
}

impl WriteResponse {
    /// Creates a new WriteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' written successfully", key),
            key,
        }
    }
}

/// Response body for document and folder deletes
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key or folder targeted
    pub key: String,
    /// False if there was nothing to delete
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for subtree listings (GET /list/*prefix)
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// The listed prefix ("" for the whole cache)
    pub prefix: String,
    /// Number of documents returned
    pub count: usize,
    /// Documents in filesystem enumeration order
    pub documents: Vec<Value>,
}

impl ListResponse {
    pub fn new(prefix: impl Into<String>, documents: Vec<Value>) -> Self {
        Self {
            prefix: prefix.into(),
            count: documents.len(),
            documents,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
