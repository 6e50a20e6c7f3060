//! `SQLite` connection pool with WAL mode and foreign keys enabled.
//!
//! Uses `r2d2` connection pooling with the `r2d2_sqlite` backend. The
//! [`PragmaCustomizer`] runs on each new connection so every member of the
//! pool shares the same busy timeout, journal mode, and foreign-key setting.
//!
//! Connection strings are file paths, `file:` URIs, or `:memory:`. A plain
//! `:memory:` would give each pooled connection its own private database, so
//! it is rewritten to a uniquely named `memdb` VFS database instead. Every
//! connection opening that name sees the same pages, and it locks like a file
//! so the busy timeout applies between pooled connections.
//!
//! A named in-memory database is freed when its last connection closes, so
//! memory pools never retire connections by age or idleness.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{Result, TaskStoreError};

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connection string selecting a private in-memory database.
pub const MEMORY_TARGET: &str = ":memory:";

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 16).
    pub pool_size: u32,
    /// Busy timeout in milliseconds (default: 30000).
    pub busy_timeout_ms: u32,
    /// Cache size in KiB (default: 8192 = 8 MB).
    pub cache_size_kib: i64,
    /// How long pool construction and checkout wait for a connection (default: 5s).
    pub connection_timeout: Duration,
    /// Age after which a pooled connection is replaced (default: 30 min).
    pub max_lifetime: Option<Duration>,
    /// Idle time after which a pooled connection is closed (default: 10 min).
    pub idle_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 16,
            busy_timeout_ms: 30_000,
            cache_size_kib: 8192,
            connection_timeout: Duration::from_secs(5),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
        }
    }
}

/// `SQLite` pragma customizer that runs on each new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
    cache_size_kib: i64,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        // busy_timeout goes first so the journal mode switch waits on siblings
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {};\
             PRAGMA journal_mode = WAL;\
             PRAGMA foreign_keys = ON;\
             PRAGMA cache_size = -{};\
             PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms, self.cache_size_kib
        ))?;
        Ok(())
    }
}

/// Map a connection string to the target the manager should open.
///
/// `:memory:` becomes a fresh named `memdb` URI; everything else passes through.
pub fn resolve_target(connection_string: &str) -> String {
    if connection_string == MEMORY_TARGET {
        format!("file:/taskstore-{}?vfs=memdb", Uuid::now_v7())
    } else {
        connection_string.to_string()
    }
}

/// Pool settings actually used for `connection_string`.
///
/// Memory targets keep every connection open for the life of the pool.
pub fn effective_config(connection_string: &str, config: &ConnectionConfig) -> ConnectionConfig {
    if connection_string == MEMORY_TARGET {
        ConnectionConfig {
            max_lifetime: None,
            idle_timeout: None,
            ..config.clone()
        }
    } else {
        config.clone()
    }
}

/// Build a pool for the given connection string.
///
/// Blocks until the pool has opened its connections, then probes one with
/// `SELECT 1`. Any failure is reported as [`TaskStoreError::Connection`].
pub fn new_pool(connection_string: &str, config: &ConnectionConfig) -> Result<ConnectionPool> {
    let target = resolve_target(connection_string);
    let config = effective_config(connection_string, config);
    debug!(
        target_db = %target,
        pool_size = config.pool_size,
        "building connection pool"
    );

    let manager = SqliteConnectionManager::file(&target);
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connection_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            cache_size_kib: config.cache_size_kib,
        }))
        .build(manager)
        .map_err(|e| TaskStoreError::connection(connection_string, e))?;

    {
        let conn = pool
            .get()
            .map_err(|e| TaskStoreError::connection(connection_string, e))?;
        let _: i64 = conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .map_err(|e| TaskStoreError::connection(connection_string, e))?;
    }

    Ok(pool)
}

/// Create an in-memory connection pool (for testing).
///
/// All connections in the pool share one database, which lives until the
/// last connection closes.
pub fn new_in_memory(config: &ConnectionConfig) -> Result<ConnectionPool> {
    new_pool(MEMORY_TARGET, config)
}

/// Create a file-backed connection pool.
pub fn new_file(path: &str, config: &ConnectionConfig) -> Result<ConnectionPool> {
    new_pool(path, config)
}

/// Verify pragmas are set correctly on a connection.
pub fn verify_pragmas(conn: &Connection) -> Result<PragmaState> {
    let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
    let foreign_keys: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
    Ok(PragmaState {
        journal_mode,
        foreign_keys_enabled: foreign_keys == 1,
    })
}

/// Pragma state for verification.
#[derive(Debug)]
pub struct PragmaState {
    /// Journal mode ("wal" on disk, "memory" for in-memory databases).
    pub journal_mode: String,
    /// Whether foreign keys are enabled.
    pub foreign_keys_enabled: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
