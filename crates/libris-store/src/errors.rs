//! Error handling for libris-store
//!
//! Wraps libris-core ExError with store-specific helpers

use libris_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
///
/// Busy/locked databases become `Concurrency` so callers can tell contention
/// apart from a broken store; constraint failures (including trigger
/// aborts) become `ConstraintViolation`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => ExErrorKind::Concurrency,
            ErrorCode::ConstraintViolation => ExErrorKind::ConstraintViolation,
            _ => ExErrorKind::Persistence,
        },
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a schema bootstrap error caused by `cause`
pub fn schema_error(cause: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("ensure_schema")
        .with_message("Schema bootstrap failed")
        .with_source(from_rusqlite(cause))
}

/// Pool could not be built (the first connection failed to open)
pub fn pool_build_failed(location: impl std::fmt::Display, err: &r2d2::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("open_store")
        .with_message(format!("Could not open store at {}: {}", location, err))
}

/// Pool could not hand out a connection before the acquire timeout
///
/// r2d2 reports the last connection error, if any, as the timeout reason.
pub fn pool_exhausted(max_connections: usize, waited_ms: u128, err: &r2d2::Error) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("acquire_connection")
        .with_message(format!(
            "All {} connections busy after waiting {} ms: {}",
            max_connections, waited_ms, err
        ))
}

/// Acquisition attempted after `StoreHandle::close`
pub fn pool_closed() -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("acquire_connection")
        .with_message("Store handle is closed")
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
