//! Libris Store - SQLite persistence for authors and books
//!
//! Provides:
//! - A pooled storage handle (`StoreHandle`) shared by all requests
//! - Schema bootstrap (tables created if absent when the handle opens)
//! - Single-table repositories for authors and books

pub mod db;
pub mod errors;
pub mod pool;
pub mod repo;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use pool::{Location, PoolConfig, PoolStats, PooledConnection, StoreHandle};
pub use repo::{AuthorRepo, BookRepo};
