//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global `tracing` subscriber described by `logging`.
///
/// An unparseable level falls back to `info`. Calling this more than once
/// is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
