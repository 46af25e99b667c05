//! Book commands

#![allow(clippy::result_large_err)]

use super::finish;
use libris_core::log_op_start;
use libris_core::model::{Book, BookChanges, BookId, NewBook};
use libris_core::{ExError, LibrisError};
use libris_store::{BookRepo, Result};
use rusqlite::Connection;
use std::time::Instant;

fn not_found(id: BookId) -> ExError {
    LibrisError::BookNotFound { book_id: id.get() }.into()
}

/// List every book in insertion order
pub fn book_list(conn: &Connection) -> Result<Vec<Book>> {
    log_op_start!("book_list");
    let start = Instant::now();
    finish("book_list", start, BookRepo::list(conn))
}

/// Fetch one book
///
/// # Errors
///
/// `NotFound` when no book has this id.
pub fn book_get(conn: &Connection, id: BookId) -> Result<Book> {
    log_op_start!("book_get", book_id = id.get());
    let start = Instant::now();
    let result = BookRepo::get(conn, id).and_then(|found| found.ok_or_else(|| not_found(id)));
    finish("book_get", start, result)
}

/// Insert a book; the author reference is not checked
///
/// # Errors
///
/// Store failures only.
pub fn book_create(conn: &Connection, draft: &NewBook) -> Result<Book> {
    log_op_start!("book_create");
    let start = Instant::now();
    finish("book_create", start, BookRepo::create(conn, draft))
}

/// Overwrite the supplied fields of a book
///
/// # Errors
///
/// `NotFound` when no book has this id.
pub fn book_update(conn: &Connection, id: BookId, changes: &BookChanges) -> Result<Book> {
    log_op_start!("book_update", book_id = id.get());
    let start = Instant::now();
    let result =
        BookRepo::update(conn, id, changes).and_then(|found| found.ok_or_else(|| not_found(id)));
    finish("book_update", start, result)
}

/// Delete a book
///
/// # Errors
///
/// `NotFound` when no book has this id.
pub fn book_delete(conn: &Connection, id: BookId) -> Result<()> {
    log_op_start!("book_delete", book_id = id.get());
    let start = Instant::now();
    let result = BookRepo::delete(conn, id)
        .and_then(|deleted| if deleted { Ok(()) } else { Err(not_found(id)) });
    finish("book_delete", start, result)
}
