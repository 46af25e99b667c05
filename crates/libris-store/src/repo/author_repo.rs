//! `authors` table access

#![allow(clippy::result_large_err)]

use super::column_rejected;
use crate::errors::{from_rusqlite, Result};
use libris_core::model::{Author, AuthorChanges, AuthorId, Birthday, NewAuthor};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository for authors
pub struct AuthorRepo;

impl AuthorRepo {
    /// All authors in insertion order
    pub fn list(conn: &Connection) -> Result<Vec<Author>> {
        let mut stmt = conn
            .prepare_cached("SELECT id, name, surname, biography, birthday FROM authors ORDER BY id")
            .map_err(from_rusqlite)?;

        let authors = stmt
            .query_map([], author_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(authors)
    }

    /// Get an author by ID
    pub fn get(conn: &Connection, id: AuthorId) -> Result<Option<Author>> {
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, name, surname, biography, birthday FROM authors WHERE id = ?1",
            )
            .map_err(from_rusqlite)?;

        stmt.query_row([id.get()], author_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Insert an author and return it with its store-assigned ID
    pub fn create(conn: &Connection, draft: &NewAuthor) -> Result<Author> {
        let author = conn
            .query_row(
                "INSERT INTO authors (name, surname, biography, birthday)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, surname, biography, birthday",
                rusqlite::params![
                    draft.name,
                    draft.surname,
                    draft.biography,
                    draft.birthday.map(|b| b.to_string()),
                ],
                author_from_row,
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(author_id = author.id.get(), "Created author");
        Ok(author)
    }

    /// Overwrite the supplied fields of an author
    ///
    /// Returns `None` when no row has this ID. Safe to call inside a
    /// transaction; the returned record is the row as the transaction sees it.
    pub fn update(
        conn: &Connection,
        id: AuthorId,
        changes: &AuthorChanges,
    ) -> Result<Option<Author>> {
        conn.query_row(
            "UPDATE authors SET
                name = COALESCE(?1, name),
                surname = COALESCE(?2, surname),
                biography = COALESCE(?3, biography),
                birthday = COALESCE(?4, birthday)
             WHERE id = ?5
             RETURNING id, name, surname, biography, birthday",
            rusqlite::params![
                changes.name,
                changes.surname,
                changes.biography,
                changes.birthday.map(|b| b.to_string()),
                id.get(),
            ],
            author_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Delete an author; `false` when no row had this ID
    ///
    /// Books referencing the author are left as they are.
    pub fn delete(conn: &Connection, id: AuthorId) -> Result<bool> {
        let affected = conn
            .execute("DELETE FROM authors WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)?;

        if affected > 0 {
            tracing::debug!(author_id = id.get(), "Deleted author");
        }
        Ok(affected > 0)
    }
}

fn author_from_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    let birthday = row
        .get::<_, Option<String>>(4)?
        .map(|raw| raw.parse::<Birthday>())
        .transpose()
        .map_err(|e| column_rejected(4, Type::Text, e))?;

    Ok(Author {
        id: AuthorId::new(row.get(0)?),
        name: row.get(1)?,
        surname: row.get(2)?,
        biography: row.get(3)?,
        birthday,
    })
}
