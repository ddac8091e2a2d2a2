//! Logging configuration using tracing
//!
//! Logs go to stderr so list output on stdout stays clean. Filtering follows
//! `RUST_LOG` and defaults to `warn`.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error returned when a global subscriber is already installed
#[derive(Debug, Error)]
#[error("Failed to initialize tracing: {0}")]
pub struct LoggingError(String);

/// Initialize the tracing subscriber
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show cache hits and misses
/// - `RUST_LOG=api_interface=error` - Only fetch errors
pub fn init() -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}
