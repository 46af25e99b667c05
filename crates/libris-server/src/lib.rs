//! HTTP service for the Libris catalog.
//!
//! Exposes author and book CRUD plus the atomic joint update over a JSON
//! REST API backed by a pooled SQLite store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use server::LibrisServer;
pub use state::AppState;
