//! Libris Engine - Orchestration layer
//!
//! Coordinates the store repositories into the operations the HTTP layer
//! exposes: single-entity CRUD and the atomic joint book/author update.

pub mod commands;

pub use commands::joint_update::{update_book_and_author, AuthorLinkPolicy, JointUpdate};
