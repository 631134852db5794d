//! Tracing subscriber setup from the `[logging]` config section

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parse the configured level name
pub fn parse_level(config: &LoggingConfig) -> Result<Level> {
    Level::from_str(config.level.trim())
        .map_err(|_| Error::Config(format!("Unknown log level: {}", config.level)))
}

/// Filter admitting events at the configured level and above
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    Ok(EnvFilter::default().add_directive(parse_level(config)?.into()))
}

/// Install the global fmt subscriber
///
/// Fails when the level is unknown or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .try_init()
        .map_err(|e| Error::Config(format!("Logging already initialized: {}", e)))
}
