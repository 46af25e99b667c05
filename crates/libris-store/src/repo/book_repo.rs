//! `books` table access

#![allow(clippy::result_large_err)]

use super::column_rejected;
use crate::errors::{from_rusqlite, Result};
use libris_core::model::{AuthorId, Book, BookChanges, BookId, Isbn, NewBook, Year};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository for books
pub struct BookRepo;

impl BookRepo {
    /// All books in insertion order
    pub fn list(conn: &Connection) -> Result<Vec<Book>> {
        let mut stmt = conn
            .prepare_cached("SELECT id, title, authorid, isbn, year FROM books ORDER BY id")
            .map_err(from_rusqlite)?;

        let books = stmt
            .query_map([], book_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(books)
    }

    /// Get a book by ID
    pub fn get(conn: &Connection, id: BookId) -> Result<Option<Book>> {
        let mut stmt = conn
            .prepare_cached("SELECT id, title, authorid, isbn, year FROM books WHERE id = ?1")
            .map_err(from_rusqlite)?;

        stmt.query_row([id.get()], book_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Current author reference of a book
    ///
    /// Outer `None`: no such book. Inner `None`: book without an author.
    pub fn author_of(conn: &Connection, id: BookId) -> Result<Option<Option<AuthorId>>> {
        conn.query_row(
            "SELECT authorid FROM books WHERE id = ?1",
            [id.get()],
            |row| Ok(row.get::<_, Option<i64>>(0)?.map(AuthorId::new)),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Insert a book and return it with its store-assigned ID
    ///
    /// The author reference is stored as given; it is not checked against
    /// the `authors` table.
    pub fn create(conn: &Connection, draft: &NewBook) -> Result<Book> {
        let book = conn
            .query_row(
                "INSERT INTO books (title, authorid, isbn, year)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, title, authorid, isbn, year",
                rusqlite::params![
                    draft.title,
                    draft.author_id.map(AuthorId::get),
                    draft.isbn.as_ref().map(Isbn::as_str),
                    draft.year.map(Year::get),
                ],
                book_from_row,
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(book_id = book.id.get(), "Created book");
        Ok(book)
    }

    /// Overwrite the supplied fields of a book
    ///
    /// Returns `None` when no row has this ID. Safe to call inside a
    /// transaction.
    pub fn update(conn: &Connection, id: BookId, changes: &BookChanges) -> Result<Option<Book>> {
        conn.query_row(
            "UPDATE books SET
                title = COALESCE(?1, title),
                authorid = COALESCE(?2, authorid),
                isbn = COALESCE(?3, isbn),
                year = COALESCE(?4, year)
             WHERE id = ?5
             RETURNING id, title, authorid, isbn, year",
            rusqlite::params![
                changes.title,
                changes.author_id.map(AuthorId::get),
                changes.isbn.as_ref().map(Isbn::as_str),
                changes.year.map(Year::get),
                id.get(),
            ],
            book_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Delete a book; `false` when no row had this ID
    pub fn delete(conn: &Connection, id: BookId) -> Result<bool> {
        let affected = conn
            .execute("DELETE FROM books WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)?;

        if affected > 0 {
            tracing::debug!(book_id = id.get(), "Deleted book");
        }
        Ok(affected > 0)
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let isbn = row
        .get::<_, Option<String>>(3)?
        .map(|raw| Isbn::parse(&raw))
        .transpose()
        .map_err(|e| column_rejected(3, Type::Text, e))?;

    let year = row
        .get::<_, Option<i64>>(4)?
        .map(Year::new)
        .transpose()
        .map_err(|e| column_rejected(4, Type::Integer, e))?;

    Ok(Book {
        id: BookId::new(row.get(0)?),
        title: row.get(1)?,
        author_id: row.get::<_, Option<i64>>(2)?.map(AuthorId::new),
        isbn,
        year,
    })
}
