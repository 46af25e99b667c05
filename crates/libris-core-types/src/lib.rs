//! Core types shared across Libris facilities
//!
//! This crate provides foundational types used by the error, logging and
//! HTTP layers:
//!
//! - **Correlation types**: RequestId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
