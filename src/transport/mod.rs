//! # Transport Module
//!
//! Trait seams for the vehicle-side collaborators.
//!
//! The session layer, the AT command encoder and the navdata/video receivers
//! live outside this crate. The controller talks to them through:
//! - [`Transport`]: the command channel (async, one writer at a time)
//! - [`Downlink`]: the latest camera frame and navdata sample

use async_trait::async_trait;

use crate::camera::{Camera, RawFrame};
use crate::error::Result;
use crate::flight::command::RadioInput;
use crate::telemetry::Navdata;

/// Command channel to the vehicle.
///
/// Implementations must serialize writes; the controller never issues two
/// calls concurrently, but a shared transport must not interleave callers.
/// Failures are reported as `PilotError::Transport` and are not retried by
/// the controller.
#[async_trait]
pub trait Transport: Send {
    /// Open the command and data channels.
    async fn initialize_session(&mut self) -> Result<()>;

    /// Close the command and data channels.
    async fn teardown_session(&mut self) -> Result<()>;

    /// Route the video downlink to a camera.
    async fn select_camera(&mut self, camera: Camera) -> Result<()>;

    /// Clear the vehicle UI/emergency state.
    async fn reset_ui_state(&mut self) -> Result<()>;

    /// Recalibrate the level reference on a flat surface.
    async fn trim_level(&mut self) -> Result<()>;

    /// The start/stop signal. Takes off when grounded, lands when flying.
    async fn trigger_start_stop_toggle(&mut self) -> Result<()>;

    /// Reset the command watchdog.
    async fn reset_watchdog(&mut self) -> Result<()>;

    /// Set the four control slots and the hover flag.
    ///
    /// The vehicle keeps acting on the last input until a new one arrives.
    async fn set_radio_input(&mut self, input: RadioInput) -> Result<()>;
}

/// Data flowing back from the vehicle.
#[cfg_attr(test, mockall::automock)]
pub trait Downlink: Send {
    /// Most recent raw camera frame.
    fn latest_frame(&mut self) -> Result<RawFrame>;

    /// Most recent navdata sample.
    fn navdata(&mut self) -> Result<Navdata>;
}
