//! Pooled handle to a migrated jobplus database.

use jobplus_db::{create_pool, run_migrations, DbPool, MigrationError, PoolError};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Errors that can occur while opening or using the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// No connection could be checked out of the pool.
    #[error("failed to check out database connection: {0}")]
    Checkout(#[from] r2d2::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// A connection pool whose database has every migration applied.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    /// Opens the pool described by `config` and brings the schema up to date.
    ///
    /// A `:memory:` path gives this store its own in-memory database, shared
    /// by every connection it hands out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the pool cannot be built, no connection can be
    /// checked out, or a migration fails.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = create_pool(&config.path, config.runtime_settings())?;

        let applied = {
            let conn = pool.get()?;
            run_migrations(&conn)?
        };

        tracing::info!(
            path = %config.path,
            migrations_applied = applied,
            "database ready"
        );

        Ok(Self { pool })
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Checkout` if the pool times out.
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
