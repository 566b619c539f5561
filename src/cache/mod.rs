//! Cache Module
//!
//! Provides a filesystem-backed JSON document cache with lazy, read-time expiry.

pub mod codec;
pub mod expiry;
mod locks;
mod path;
mod store;


// Re-export public types
pub use expiry::Freshness;
pub use locks::{KeyGuard, KeyLocks};
pub use path::PathResolver;
pub use store::JsonCache;

// == Public Constants ==
/// File extension of every stored document
pub const DOCUMENT_EXTENSION: &str = "json";
