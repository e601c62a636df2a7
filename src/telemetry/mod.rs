//! # Telemetry Module
//!
//! Handles navdata normalization and telemetry logging to JSONL files.
//!
//! This module handles:
//! - Converting raw attitude/altitude/battery readings to normalized ranges
//! - Timestamped telemetry snapshots
//! - Writing snapshots to rotating JSON Lines files
//! - Retaining only the last N files

pub mod logger;
pub mod navdata;

pub use logger::TelemetryLogger;
pub use navdata::{Navdata, TelemetryRecord};
