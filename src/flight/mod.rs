//! # Flight Module
//!
//! Open-loop movement control.
//!
//! This module handles:
//! - The grounded/airborne state machine
//! - Bounded four-axis command vectors and their transport encoding
//! - Per-maneuver calibration (duty cycles and duration models)
//! - Planning operations as step sequences and executing them

pub mod command;
pub mod plan;
pub mod profile;
pub mod sequence;
pub mod state;
