//! Structured logging infrastructure for Mirage.
//!
//! One entry point, driven by the `[logging]` config section, with pretty
//! or JSON output on stderr.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter_or(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize from the `[logging]` config section.
///
/// ```no_run
/// use mirage_core::{logging, LoggingConfig};
///
/// logging::init_from(&LoggingConfig::default());
/// tracing::info!(component = "session", "Session started");
/// ```
///
/// `RUST_LOG` still wins over `config.level`. Returns `false` when a global
/// subscriber was already installed (e.g. by a test harness or the host).
pub fn init_from(config: &LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(filter_or(&config.level));

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_from_twice_does_not_panic() {
        let config = LoggingConfig::default();
        let _first = init_from(&config);
        assert!(!init_from(&config));
    }

    #[test]
    fn test_fallback_filter_builds() {
        let _ = filter_or("debug");
    }
}
