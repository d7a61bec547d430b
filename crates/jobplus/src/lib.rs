//! jobplus: the persistence layer of a job board.
//!
//! This crate ties the workspace together for callers. It loads
//! configuration, installs the `tracing` subscriber, and opens a migrated
//! connection pool ([`Store`]). The entity records and their repository
//! functions are re-exported from `jobplus-models` as [`models`].
//!
//! ```rust,ignore
//! let config = jobplus::load_config(Some("jobplus.toml"))?;
//! jobplus::init_tracing(&config.logging);
//!
//! let store = jobplus::Store::open(&config.database)?;
//! let conn = store.connection()?;
//! let user = jobplus::models::user::authenticate(&conn, "alice", "secret123")?;
//! ```

pub mod config;
mod store;
mod telemetry;

pub use config::{load_config, Config, ConfigError, DatabaseConfig, LoggingConfig};
pub use store::{Store, StoreError};
pub use telemetry::init_tracing;

pub use jobplus_models as models;
pub use jobplus_types as types;
