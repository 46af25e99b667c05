//! Pooled storage handle
//!
//! `StoreHandle` is the one shared mutable resource of the service. It is
//! opened at startup, cloned into every request, and closed on shutdown.
//! Connections come from an `r2d2` pool; every new connection is
//! configured by `db::configure` before it is handed out. Each repository
//! call or transaction holds one `PooledConnection` and gives it back when
//! the guard drops, on success and failure alike.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{
    from_rusqlite, io_error, pool_build_failed, pool_closed, pool_exhausted, Result,
};
use crate::schema;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Path spelling that selects an in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Pool sizing and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Upper bound on open connections (forced to 1 for in-memory stores)
    pub max_connections: usize,
    /// How long `acquire` waits for a free connection
    pub acquire_timeout_ms: u64,
    /// SQLite busy handler timeout per connection
    pub busy_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 8,
            acquire_timeout_ms: 5_000,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    fn is_on_disk(&self) -> bool {
        matches!(self, Location::File(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Memory => f.write_str(MEMORY_PATH),
        }
    }
}

/// Point-in-time pool counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub open: usize,
    pub idle: usize,
    pub closed: bool,
}

/// Shared, cloneable handle to the connection pool
#[derive(Clone)]
pub struct StoreHandle {
    pool: Pool<SqliteConnectionManager>,
    location: Location,
    config: PoolConfig,
    closed: Arc<AtomicBool>,
}

impl StoreHandle {
    /// Open (creating if needed) the database at `path` and bootstrap the schema
    ///
    /// The literal path `:memory:` opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Fails if the parent directory cannot be created, the first connection
    /// cannot be opened, or the schema cannot be applied.
    pub fn open<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let path = path.as_ref();
        if path == Path::new(MEMORY_PATH) {
            return Self::with_location(Location::Memory, config);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error("open_store", e))?;
        }
        Self::with_location(Location::File(path.to_path_buf()), config)
    }

    /// Open a private in-memory store (single connection)
    ///
    /// # Errors
    ///
    /// Fails if SQLite cannot allocate the database or apply the schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_location(Location::Memory, PoolConfig::default())
    }

    fn with_location(location: Location, mut config: PoolConfig) -> Result<Self> {
        // every in-memory connection would be its own empty database
        config.max_connections = match location {
            Location::Memory => 1,
            Location::File(_) => config.max_connections.max(1),
        };

        let on_disk = location.is_on_disk();
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let manager = match &location {
            Location::File(path) => SqliteConnectionManager::file(path),
            Location::Memory => SqliteConnectionManager::memory(),
        }
        .with_init(move |conn| db::configure(conn, on_disk, busy_timeout));

        // r2d2 rejects a zero size or timeout
        let mut builder = Pool::builder()
            .max_size(u32::try_from(config.max_connections).unwrap_or(u32::MAX))
            .min_idle(Some(1))
            .connection_timeout(Duration::from_millis(config.acquire_timeout_ms.max(1)));
        if !on_disk {
            // the single connection is the database; never reap it
            builder = builder.idle_timeout(None).max_lifetime(None);
        }
        let pool = builder
            .build(manager)
            .map_err(|e| pool_build_failed(&location, &e))?;

        let handle = Self {
            pool,
            location,
            config,
            closed: Arc::new(AtomicBool::new(false)),
        };
        handle.with_conn(schema::ensure_schema)?;

        tracing::info!(
            location = %handle.location,
            max_connections = handle.config.max_connections,
            "Opened store"
        );
        Ok(handle)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Check out a connection, waiting up to `acquire_timeout_ms`
    ///
    /// # Errors
    ///
    /// `Concurrency` when no connection frees up in time, `Persistence` when
    /// the handle is closed or a leftover transaction cannot be rolled back.
    pub fn acquire(&self) -> Result<PooledConnection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(pool_closed());
        }

        let started = Instant::now();
        let conn = self.pool.get().map_err(|e| {
            pool_exhausted(self.config.max_connections, started.elapsed().as_millis(), &e)
        })?;

        let conn = PooledConnection { conn };
        conn.roll_back_open_transaction().map_err(from_rusqlite)?;
        Ok(conn)
    }

    /// Run `f` with a pooled connection
    ///
    /// # Errors
    ///
    /// Propagates acquisition errors and whatever `f` returns.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.acquire()?;
        f(&mut *conn)
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns the acquisition or query error.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(from_rusqlite)
        })
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            open: state.connections as usize,
            idle: state.idle_connections as usize,
            closed: self.closed.load(Ordering::Acquire),
        }
    }

    /// Refuse further acquisition
    ///
    /// Pooled connections close once the last clone of the handle drops.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::info!(location = %self.location, "Closed store");
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("location", &self.location)
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// A checked-out connection; returns itself to the pool on drop
///
/// A transaction left open by the holder is rolled back first.
pub struct PooledConnection {
    conn: r2d2::PooledConnection<SqliteConnectionManager>,
}

impl PooledConnection {
    fn roll_back_open_transaction(&self) -> rusqlite::Result<()> {
        if self.conn.is_autocommit() {
            Ok(())
        } else {
            self.conn.execute_batch("ROLLBACK")
        }
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Err(e) = self.roll_back_open_transaction() {
            tracing::warn!(err = %e, "Could not roll back abandoned transaction");
        }
    }
}
