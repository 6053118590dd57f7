//! Structured logging setup using tracing
//!
//! Console logging with an environment filter. `RUST_LOG` overrides the
//! configured level when set.

use crate::domain::{HarvestError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes the logging system.
///
/// # Errors
///
/// Returns a configuration error for an unknown log level or when a
/// subscriber is already installed.
pub fn init_logging(log_level: &str) -> Result<()> {
    let level = parse_log_level(log_level)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geoharvest={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HarvestError::Configuration(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

fn parse_log_level(log_level: &str) -> Result<Level> {
    match log_level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(HarvestError::Configuration(format!(
            "Invalid log level: {other}. Expected trace, debug, info, warn or error"
        ))),
    }
}
