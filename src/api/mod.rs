//! API Module
//!
//! HTTP handlers and routing exposing the document cache over REST.
//!
//! # Endpoints
//! - `PUT|GET|DELETE /docs/*key` - Write, read or delete a document
//! - `GET /fields/:field/*key` - Read one top-level field
//! - `GET /list[/*prefix]` - Enumerate a subtree
//! - `DELETE /folders/*key` - Delete a subtree
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
