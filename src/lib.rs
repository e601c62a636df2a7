//! # ARDrone Pilot Library
//!
//! High-level flight control for a consumer quadcopter.
//!
//! This library turns simple commands ("take off", "move up 50 cm", "turn
//! left", "capture image") into timed sequences of low-level control inputs,
//! tracks whether the vehicle is grounded or airborne, and decodes raw
//! camera frames into 3-channel images.
//!
//! The command channel and the video/navdata receivers are supplied by the
//! caller through the [`transport::Transport`] and [`transport::Downlink`]
//! traits.

pub mod blocking;
pub mod camera;
pub mod config;
pub mod drone;
pub mod error;
pub mod flight;
pub mod logging;
pub mod telemetry;
pub mod transport;

pub use config::Config;
pub use drone::Drone;
pub use error::{PilotError, Result};
