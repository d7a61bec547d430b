//! Database layer for jobplus.
//!
//! Provides SQLite connection pooling (via `r2d2`), per-connection pragma
//! setup, and the embedded SQL migrations that create the `user`,
//! `personal`, `company`, `job` and `jobwanted` tables.
//!
//! # Design decisions
//!
//! - **Schema as migrations**: the table layout is the contract other layers
//!   depend on, so it lives in versioned SQL files compiled into the crate
//!   with `include_str!` and applied in order.
//! - **Constraints in the store**: uniqueness, foreign keys, and column
//!   widths are declared in SQL. Nothing in Rust pre-checks them; violations
//!   surface from SQLite at write time.
//! - **No cascades**: foreign keys are declared without `ON DELETE` actions.
//!   With `foreign_keys = ON`, deleting a referenced row is rejected.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError, SCHEMA_TABLES};
pub use pool::{
    configure_connection, create_pool, open_connection, DbPool, DbRuntimeSettings, PoolError,
};
