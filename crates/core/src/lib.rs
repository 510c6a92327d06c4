//! Core functionality for the Mirage identity-shielding system.
//!
//! This crate provides the configuration model and logging initialization
//! shared by every other Mirage crate.

pub mod config;
pub mod logging;

pub use config::{
    CatalogConfig, ConfigError, LogFormat, LoggingConfig, MirageConfig, PolicyConfig,
    ProfileConfig, StoreConfig, CONFIG_SCHEMA_VERSION,
};

/// Current Unix time in milliseconds.
///
/// Clocks set before the epoch report zero rather than failing.
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
