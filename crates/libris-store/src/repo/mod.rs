//! Repository layer mapping `authors` and `books` rows to entity records
//!
//! Repositories are stateless: every function takes the connection to run
//! on, so the same call works on a pooled connection or inside a
//! `rusqlite::Transaction` (which derefs to `Connection`). Each function is
//! a single SQL statement; updates and inserts read the row back through
//! `RETURNING` rather than a second query.

pub mod author_repo;
pub mod book_repo;

pub use author_repo::AuthorRepo;
pub use book_repo::BookRepo;

use libris_core::LibrisError;
use rusqlite::types::Type;

/// Wrap a value-type rejection of a stored column as a row mapping error
fn column_rejected(index: usize, ty: Type, err: LibrisError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, ty, Box::new(err))
}
