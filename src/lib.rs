//! JSON Cache - A filesystem-backed JSON document cache
//!
//! Documents are addressed by slash-delimited keys and stored one file per
//! key under a cache root. Expiry is lazy: a stale entry is deleted only when
//! a reader asks for it with a max age.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::JsonCache;
pub use config::Config;
pub use error::{CacheError, Result};
