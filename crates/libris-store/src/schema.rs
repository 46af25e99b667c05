//! Schema bootstrap
//!
//! The schema is embedded at compile time and applied idempotently when a
//! storage handle opens its first connection.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, schema_error, Result};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("../schema/library.sql");

/// Create the `authors` and `books` tables if they do not exist
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(SCHEMA_SQL)
        .map_err(schema_error)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!("Schema ensured");
    Ok(())
}

/// List user tables, sorted by name
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .map_err(from_rusqlite)?;

    let names = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;

    Ok(names)
}
