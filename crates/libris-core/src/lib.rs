//! Libris Core - entity model, error facility and logging facility
//!
//! This crate provides the foundational pieces shared by every Libris layer:
//! - Author and Book records plus their create/change payloads
//! - Boundary value types (`Year`, `Isbn`, `Birthday`, typed identifiers)
//! - The canonical `ExError` facility and the `LibrisError` domain taxonomy
//! - Structured logging initialization and `log_op_*` macros

pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, LibrisError, Result};
pub use model::{
    Author, AuthorChanges, AuthorId, Birthday, Book, BookChanges, BookId, Isbn, NewAuthor,
    NewBook, Year,
};

#[doc(hidden)]
pub mod __private {
    pub use libris_core_types::schema;
    pub use tracing;
}
