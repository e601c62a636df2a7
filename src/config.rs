//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values fall back to the
//! calibration measured on the reference vehicle.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::flight::profile::ManeuverProfiles;

/// Upper bound for any settle interval
const MAX_SETTLE_MS: u64 = 60_000;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub maneuvers: ManeuverProfiles,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Settle intervals between command steps, in milliseconds
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_reset_settle_ms")]
    pub reset_settle_ms: u64,

    #[serde(default = "default_trim_settle_ms")]
    pub trim_settle_ms: u64,

    #[serde(default = "default_takeoff_stabilize_ms")]
    pub takeoff_stabilize_ms: u64,

    #[serde(default = "default_watchdog_settle_ms")]
    pub watchdog_settle_ms: u64,

    #[serde(default = "default_hover_settle_ms")]
    pub hover_settle_ms: u64,

    #[serde(default = "default_land_settle_ms")]
    pub land_settle_ms: u64,

    #[serde(default = "default_camera_settle_ms")]
    pub camera_settle_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write daily-rotated log files here when set
    #[serde(default)]
    pub directory: Option<String>,
}

/// Telemetry configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,
}

// Default value functions
fn default_reset_settle_ms() -> u64 { 250 }
fn default_trim_settle_ms() -> u64 { 250 }
fn default_takeoff_stabilize_ms() -> u64 { 4500 }
fn default_watchdog_settle_ms() -> u64 { 250 }
fn default_hover_settle_ms() -> u64 { 3000 }
fn default_land_settle_ms() -> u64 { 250 }
fn default_camera_settle_ms() -> u64 { 250 }

fn default_log_level() -> String { "info".to_string() }

fn default_telemetry_enabled() -> bool { false }
fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reset_settle_ms: default_reset_settle_ms(),
            trim_settle_ms: default_trim_settle_ms(),
            takeoff_stabilize_ms: default_takeoff_stabilize_ms(),
            watchdog_settle_ms: default_watchdog_settle_ms(),
            hover_settle_ms: default_hover_settle_ms(),
            land_settle_ms: default_land_settle_ms(),
            camera_settle_ms: default_camera_settle_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ardrone_pilot::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate settle intervals
        for (name, value) in [
            ("reset_settle_ms", self.timing.reset_settle_ms),
            ("trim_settle_ms", self.timing.trim_settle_ms),
            ("takeoff_stabilize_ms", self.timing.takeoff_stabilize_ms),
            ("watchdog_settle_ms", self.timing.watchdog_settle_ms),
            ("hover_settle_ms", self.timing.hover_settle_ms),
            ("land_settle_ms", self.timing.land_settle_ms),
            ("camera_settle_ms", self.timing.camera_settle_ms),
        ] {
            if value > MAX_SETTLE_MS {
                return Err(crate::error::PilotError::Config(
                    toml::de::Error::custom(format!("{} must be at most {}", name, MAX_SETTLE_MS))
                ));
            }
        }

        // Hovering is the only brake the vehicle gets
        if self.timing.hover_settle_ms == 0 {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("hover_settle_ms must be greater than 0")
            ));
        }

        if self.timing.takeoff_stabilize_ms == 0 {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("takeoff_stabilize_ms must be greater than 0")
            ));
        }

        self.maneuvers.validate()?;

        // Validate log level
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("logging level must be one of: trace, debug, info, warn, error")
            ));
        }

        if matches!(&self.logging.directory, Some(dir) if dir.is_empty()) {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("logging directory cannot be empty when set")
            ));
        }

        // Validate telemetry configuration
        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("telemetry log_dir cannot be empty when enabled")
            ));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("max_records_per_file must be greater than 0")
            ));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(crate::error::PilotError::Config(
                toml::de::Error::custom("max_files_to_keep must be greater than 0")
            ));
        }

        Ok(())
    }
}
