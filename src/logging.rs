//! # Logging
//!
//! `tracing` subscriber setup. `RUST_LOG` directives are honored and the
//! configured level is added on top. With `logging.directory` set, output
//! goes to a daily rolling file through a non-blocking writer instead of
//! stdout.

use serde::de::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{PilotError, Result};

/// File name prefix for rolling log files
pub const LOG_FILE_PREFIX: &str = "ardrone-pilot.log";

/// Parse the configured level
pub fn level(config: &LoggingConfig) -> Result<Level> {
    config.level.parse::<Level>().map_err(|_| {
        PilotError::Config(toml::de::Error::custom(format!(
            "unknown logging level: {}",
            config.level
        )))
    })
}

/// Build the subscriber filter
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive(level(config)?.into()))
}

/// Install the global subscriber
///
/// Hold on to the returned guard for the life of the program when logging
/// to a file; dropping it flushes and stops the background writer. Calling
/// this more than once keeps the first subscriber.
///
/// # Errors
///
/// Returns error if the configured level is not a valid level
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config)?;

    let (installed, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .is_ok();
            (installed, Some(guard))
        }
        None => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .is_ok();
            (installed, None)
        }
    };

    if installed {
        tracing::info!("ARDrone Pilot v{} logging at {}", env!("CARGO_PKG_VERSION"), config.level);
    } else {
        tracing::debug!("Global subscriber already set, keeping it");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            directory: None,
        }
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(level(&logging("trace")).unwrap(), Level::TRACE);
        assert_eq!(level(&logging("info")).unwrap(), Level::INFO);
        assert_eq!(level(&logging("error")).unwrap(), Level::ERROR);
    }

    #[test]
    fn test_unknown_level() {
        let result = level(&logging("loud"));
        assert!(matches!(result, Err(PilotError::Config(_))));
        assert!(env_filter(&logging("loud")).is_err());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init(&logging("debug")).unwrap().is_none());
        assert!(init(&logging("debug")).unwrap().is_none());
    }

    #[test]
    fn test_init_with_directory_returns_guard() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            directory: Some(dir.path().to_string_lossy().to_string()),
        };
        assert!(init(&config).unwrap().is_some());
    }
}
