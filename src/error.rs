//! # Error Types
//!
//! Custom error types for ARDrone Pilot using `thiserror`.

use thiserror::Error;

use crate::flight::state::FlightState;

/// Main error type for ARDrone Pilot
#[derive(Debug, Error)]
pub enum PilotError {
    /// Operation not allowed in the current flight state
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        state: FlightState,
        operation: &'static str,
    },

    /// Magnitude or axis value outside its defined bounds
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Raw camera frame cannot be decoded into the output frame
    #[error("image decode error: {0}")]
    Decode(String),

    /// Transport/session collaborator failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Maneuver interrupted before completion (vehicle was told to hover)
    #[error("maneuver aborted")]
    Aborted,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telemetry serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ARDrone Pilot
pub type Result<T> = std::result::Result<T, PilotError>;
