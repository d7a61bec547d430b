//! Connection pool creation and per-connection configuration.
//!
//! The pragmas live in [`configure_connection`] rather than inline in the
//! pool's init hook, so the pooled connections and the standalone one from
//! [`open_connection`] come up identically. A pool opened on `:memory:` is
//! backed by one named shared-cache database instead of a private database
//! per connection, so every checkout sees the same schema and rows.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// Applies the pragmas every jobplus connection runs with.
///
/// Enables WAL journaling (in-memory databases report `memory`, which is
/// accepted), foreign-key enforcement, and the configured busy timeout.
/// Foreign keys are what turn a dangling `company_id` or the deletion of a
/// still-referenced row into a constraint error.
///
/// # Errors
///
/// Returns the underlying `rusqlite::Error` if a pragma fails or WAL mode
/// is refused.
pub fn configure_connection(
    conn: &Connection,
    settings: DbRuntimeSettings,
) -> Result<(), rusqlite::Error> {
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if journal_mode != "wal" && journal_mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!(
                "failed to set WAL journal mode, got: {}",
                journal_mode
            )),
        ));
    }
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};",
        settings.busy_timeout_ms
    ))
}

/// Opens a single configured connection outside the pool.
///
/// `:memory:` yields a private in-memory database, which is what tests and
/// one-off tooling use.
///
/// # Errors
///
/// Returns the underlying `rusqlite::Error` if the file cannot be opened or
/// configured.
pub fn open_connection(
    db_path: &str,
    settings: DbRuntimeSettings,
) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    configure_connection(&conn, settings)?;
    Ok(conn)
}

static MEMORY_POOLS: AtomicU64 = AtomicU64::new(0);

/// Resolves `:memory:` to a shared-cache URI unique to one pool.
///
/// The database lives as long as at least one of the pool's connections
/// stays open; distinct pools never share it.
fn pool_target(db_path: &str) -> Cow<'_, str> {
    if db_path == ":memory:" {
        let n = MEMORY_POOLS.fetch_add(1, Ordering::Relaxed);
        Cow::Owned(format!(
            "file:jobplus-memory-{}-{n}?mode=memory&cache=shared",
            std::process::id()
        ))
    } else {
        Cow::Borrowed(db_path)
    }
}

/// Creates a new SQLite connection pool with WAL mode and foreign keys enabled.
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file, or `:memory:` for an
///   in-memory database shared by all of this pool's connections.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let target = pool_target(db_path);
    let manager = SqliteConnectionManager::file(&*target)
        .with_flags(flags)
        .with_init(move |conn| configure_connection(conn, settings));

    let mut builder = Pool::builder().max_size(settings.pool_max_size);
    if matches!(target, Cow::Owned(_)) {
        // Recycling every connection at once would drop the shared database.
        builder = builder.max_lifetime(None).idle_timeout(None);
    }
    let pool = builder.build(manager)?;

    tracing::debug!(
        path = db_path,
        target = %target,
        max_size = settings.pool_max_size,
        "database pool ready"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_in_memory_pool() {
        let settings = DbRuntimeSettings {
            busy_timeout_ms: 2_500,
            pool_max_size: 3,
        };

        let pool = create_pool(":memory:", settings).expect("pool creation should succeed");
        let conn = pool.get().expect("should get a connection");

        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .expect("should query journal_mode");
        assert!(
            mode == "wal" || mode == "memory",
            "unexpected journal_mode: {mode}"
        );

        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .expect("should query foreign_keys");
        assert_eq!(fk, 1, "foreign keys should be enabled");

        let busy_timeout: i32 = conn
            .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
            .expect("should query busy_timeout");
        assert_eq!(busy_timeout, 2_500, "busy timeout should match settings");

        assert_eq!(pool.max_size(), 3, "pool max size should match settings");
    }

    #[test]
    fn in_memory_pool_connections_share_one_database() {
        let pool = create_pool(":memory:", DbRuntimeSettings::default())
            .expect("pool creation should succeed");
        let first = pool.get().expect("should get first connection");
        let second = pool.get().expect("should get second connection");

        first
            .execute_batch("CREATE TABLE shared (v INTEGER); INSERT INTO shared VALUES (7);")
            .expect("should write through first connection");
        let v: i64 = second
            .query_row("SELECT v FROM shared", [], |row| row.get(0))
            .expect("second connection should see the table");
        assert_eq!(v, 7);
    }

    #[test]
    fn separate_in_memory_pools_are_isolated() {
        let a = create_pool(":memory:", DbRuntimeSettings::default()).expect("pool a");
        let b = create_pool(":memory:", DbRuntimeSettings::default()).expect("pool b");

        a.get()
            .expect("should get connection")
            .execute_batch("CREATE TABLE only_in_a (v INTEGER);")
            .expect("should create table");

        let count: i64 = b
            .get()
            .expect("should get connection")
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'only_in_a'",
                [],
                |row| row.get(0),
            )
            .expect("should query schema");
        assert_eq!(count, 0);
    }

    #[test]
    fn open_connection_enables_foreign_keys() {
        let conn = open_connection(":memory:", DbRuntimeSettings::default())
            .expect("should open connection");

        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .expect("should query foreign_keys");
        assert_eq!(fk, 1);
    }
}
