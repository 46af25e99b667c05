//! Author commands
//!
//! Thin wrappers over `AuthorRepo` that turn "no such row" into a
//! `NotFound` error and log each operation's lifecycle.

#![allow(clippy::result_large_err)]

use super::finish;
use libris_core::log_op_start;
use libris_core::model::{Author, AuthorChanges, AuthorId, NewAuthor};
use libris_core::{ExError, LibrisError};
use libris_store::{AuthorRepo, Result};
use rusqlite::Connection;
use std::time::Instant;

fn not_found(id: AuthorId) -> ExError {
    LibrisError::AuthorNotFound {
        author_id: id.get(),
    }
    .into()
}

/// List every author in insertion order
pub fn author_list(conn: &Connection) -> Result<Vec<Author>> {
    log_op_start!("author_list");
    let start = Instant::now();
    finish("author_list", start, AuthorRepo::list(conn))
}

/// Fetch one author
///
/// # Errors
///
/// `NotFound` when no author has this id.
pub fn author_get(conn: &Connection, id: AuthorId) -> Result<Author> {
    log_op_start!("author_get", author_id = id.get());
    let start = Instant::now();
    let result = AuthorRepo::get(conn, id).and_then(|found| found.ok_or_else(|| not_found(id)));
    finish("author_get", start, result)
}

/// Insert an author
///
/// # Errors
///
/// Store failures only; every `NewAuthor` is storable.
pub fn author_create(conn: &Connection, draft: &NewAuthor) -> Result<Author> {
    log_op_start!("author_create");
    let start = Instant::now();
    finish("author_create", start, AuthorRepo::create(conn, draft))
}

/// Overwrite the supplied fields of an author
///
/// # Errors
///
/// `NotFound` when no author has this id.
pub fn author_update(conn: &Connection, id: AuthorId, changes: &AuthorChanges) -> Result<Author> {
    log_op_start!("author_update", author_id = id.get());
    let start = Instant::now();
    let result = AuthorRepo::update(conn, id, changes)
        .and_then(|found| found.ok_or_else(|| not_found(id)));
    finish("author_update", start, result)
}

/// Delete an author; books referencing it keep their reference
///
/// # Errors
///
/// `NotFound` when no author has this id.
pub fn author_delete(conn: &Connection, id: AuthorId) -> Result<()> {
    log_op_start!("author_delete", author_id = id.get());
    let start = Instant::now();
    let result = AuthorRepo::delete(conn, id)
        .and_then(|deleted| if deleted { Ok(()) } else { Err(not_found(id)) });
    finish("author_delete", start, result)
}
