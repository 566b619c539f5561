//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers use the
//! explicit `try_*` cache operations so that a missing entry (404) can be
//! told apart from a failure (4xx/5xx).

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::JsonCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, DocumentResponse, FieldResponse, HealthResponse, ListQuery, ListResponse,
    ReadQuery, WriteResponse,
};

/// Application state shared across all handlers.
///
/// The cache serializes same-key operations itself, so it is shared through
/// a plain `Arc` without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Shared document cache
    pub cache: Arc<JsonCache>,
    /// Max age applied to reads that name none
    pub default_max_age: Option<Duration>,
}

impl AppState {
    /// Creates a new AppState with the given cache and no default max age.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(cache),
            default_max_age: None,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache: Arc::new(JsonCache::from_config(config)),
            default_max_age: config.default_max_age(),
        }
    }
}

/// Handler for PUT /docs/*key
///
/// Stores the JSON request body under `key`.
pub async fn put_document_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(document): Json<Value>,
) -> Result<Json<WriteResponse>> {
    if !state.cache.try_write(&key, &document).await? {
        return Err(CacheError::InvalidRequest(
            "Document cannot be null".to_string(),
        ));
    }

    Ok(Json(WriteResponse::new(key)))
}

/// Handler for GET /docs/*key
///
/// Retrieves a document, evicting it first if it is older than `max_age`.
pub async fn get_document_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Json<DocumentResponse>> {
    let max_age = query.max_age_or(state.default_max_age);

    match state.cache.try_load_document(&key, max_age).await? {
        Some(document) => Ok(Json(DocumentResponse::new(key, document))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /fields/:field/*key
///
/// Retrieves a single top-level field of a document.
pub async fn get_field_handler(
    State(state): State<AppState>,
    Path((field, key)): Path<(String, String)>,
) -> Result<Json<FieldResponse>> {
    match state.cache.try_load_field(&key, &field).await? {
        Some(value) => Ok(Json(FieldResponse::new(key, field, value))),
        None => Err(CacheError::NotFound(format!("{key}#{field}"))),
    }
}

/// Handler for DELETE /docs/*key
pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.try_delete(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /list
///
/// Lists documents at the top of the cache root.
pub async fn list_root_handler(
    state: State<AppState>,
    query: Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    list_prefix_handler(state, Path(String::new()), query).await
}

/// Handler for GET /list/*prefix
///
/// Lists documents below `prefix`, optionally recursively and filtered by file name.
pub async fn list_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let documents = state
        .cache
        .try_list_subtree(&prefix, query.recursive, &query.filter)
        .await?;

    Ok(Json(ListResponse::new(prefix, documents)))
}

/// Handler for DELETE /folders/*key
pub async fn delete_folder_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.try_delete_folder(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
