//! # Maneuver Planning
//!
//! Pure functions from a request plus configuration to a [`Sequence`].
//! Nothing here touches the transport or the clock, so plans can be checked
//! step by step in tests.

use std::time::Duration;

use super::command::CommandVector;
use super::profile::{Maneuver, ManeuverProfiles};
use super::sequence::{Sequence, Signal};
use crate::camera::Camera;
use crate::config::TimingConfig;
use crate::error::Result;

/// Builds command sequences from timing and calibration settings.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    timing: &'a TimingConfig,
    profiles: &'a ManeuverProfiles,
}

impl<'a> Planner<'a> {
    #[must_use]
    pub fn new(timing: &'a TimingConfig, profiles: &'a ManeuverProfiles) -> Self {
        Self { timing, profiles }
    }

    /// Reset, trim and the start signal.
    ///
    /// The vehicle is flying once the last step of this plan has been sent,
    /// whatever happens after. The order is fixed; the vehicle launches
    /// unstably if any step is skipped or reordered.
    #[must_use]
    pub fn lift_off(&self) -> Sequence {
        Sequence::new()
            .signal(Signal::ResetUiState)
            .hold(ms(self.timing.reset_settle_ms))
            .signal(Signal::TrimLevel)
            .hold(ms(self.timing.trim_settle_ms))
            .signal(Signal::StartStopToggle)
    }

    /// Wait for the climb to finish, then refresh the watchdog.
    ///
    /// The caller follows this with [`Planner::hover`].
    #[must_use]
    pub fn stabilize(&self) -> Sequence {
        Sequence::new()
            .hold(ms(self.timing.takeoff_stabilize_ms))
            .signal(Signal::ResetWatchdog)
            .hold(ms(self.timing.watchdog_settle_ms))
    }

    /// Neutral command and settle, arresting any residual motion.
    #[must_use]
    pub fn hover(&self) -> Sequence {
        Sequence::new()
            .command(CommandVector::neutral())
            .hold(ms(self.timing.hover_settle_ms))
    }

    /// The start/stop toggle lands a flying vehicle.
    #[must_use]
    pub fn land(&self) -> Sequence {
        Sequence::new()
            .signal(Signal::StartStopToggle)
            .hold(ms(self.timing.land_settle_ms))
    }

    #[must_use]
    pub fn camera(&self, camera: Camera) -> Sequence {
        Sequence::new()
            .signal(Signal::SelectCamera(camera))
            .hold(ms(self.timing.camera_settle_ms))
    }

    /// Actuate for the calibrated duration, then hover.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an invalid magnitude or calibration.
    pub fn maneuver(&self, maneuver: Maneuver) -> Result<Sequence> {
        let (command, duration) = self.profiles.actuation(maneuver)?;
        Ok(Sequence::new()
            .command(command)
            .hold(duration)
            .then(self.hover()))
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
