//! Per-connection configuration
//!
//! Runs as the pool's connection initializer, so it reports raw
//! `rusqlite` errors; the pool maps them.

use rusqlite::Connection;
use std::time::Duration;

/// Configure a fresh connection
///
/// WAL is only requested for on-disk databases; in-memory databases report
/// `memory` and ignore it.
///
/// # Errors
///
/// Returns the first pragma that SQLite rejects.
pub fn configure(
    conn: &Connection,
    on_disk: bool,
    busy_timeout: Duration,
) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    if on_disk {
        // journal_mode answers with a row, so it cannot go through execute()
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "Configured connection");
    }

    Ok(())
}
