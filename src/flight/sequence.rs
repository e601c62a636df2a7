//! # Command Sequences
//!
//! Every controller operation is planned as a [`Sequence`] of steps before
//! anything is sent. A step is a one-shot signal, a command vector, or a hold.
//! [`execute`] walks the steps against a [`Transport`], awaiting
//! `tokio::time::sleep` for every hold. The vehicle keeps acting on the last
//! command for the whole hold.
//!
//! ```
//! use std::time::Duration;
//! use ardrone_pilot::flight::command::CommandVector;
//! use ardrone_pilot::flight::sequence::{Sequence, Step};
//!
//! let seq = Sequence::new()
//!     .command(CommandVector::new(0.0, 0.0, 0.5, 0.0).unwrap())
//!     .hold(Duration::from_secs(2))
//!     .command(CommandVector::neutral());
//!
//! assert_eq!(seq.len(), 3);
//! assert_eq!(seq.total_hold(), Duration::from_secs(2));
//! assert_eq!(seq.steps().last(), Some(&Step::Command(CommandVector::neutral())));
//! ```

use std::time::Duration;
use tracing::{debug, warn};

use super::command::CommandVector;
use crate::camera::Camera;
use crate::error::Result;
use crate::transport::Transport;

/// One-shot session signals understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Clear the vehicle's UI/emergency state.
    ResetUiState,
    /// Recalibrate the level reference against the floor.
    TrimLevel,
    /// Start/stop button; takes off when grounded, lands when flying.
    StartStopToggle,
    /// Keep the command channel watchdog alive.
    ResetWatchdog,
    /// Route the downlink to a camera.
    SelectCamera(Camera),
}

/// A single scheduled action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Signal(Signal),
    Command(CommandVector),
    Hold(Duration),
}

/// Ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    steps: Vec<Step>,
}

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signal(mut self, signal: Signal) -> Self {
        self.steps.push(Step::Signal(signal));
        self
    }

    #[must_use]
    pub fn command(mut self, command: CommandVector) -> Self {
        self.steps.push(Step::Command(command));
        self
    }

    /// Appends a hold. Zero-length holds are dropped.
    #[must_use]
    pub fn hold(mut self, duration: Duration) -> Self {
        if !duration.is_zero() {
            self.steps.push(Step::Hold(duration));
        }
        self
    }

    /// Appends all steps of another sequence.
    #[must_use]
    pub fn then(mut self, other: Sequence) -> Self {
        self.steps.extend(other.steps);
        self
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all holds, i.e. how long executing the sequence blocks.
    #[must_use]
    pub fn total_hold(&self) -> Duration {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Hold(d) => Some(*d),
                _ => None,
            })
            .sum()
    }

    /// The last command vector in the sequence, if any.
    #[must_use]
    pub fn last_command(&self) -> Option<CommandVector> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::Command(cmd) => Some(*cmd),
            _ => None,
        })
    }
}

/// Run a sequence against the transport.
///
/// On the first failing step `recovery` is run (best effort) and the
/// failing error is returned. The controller passes its hover plan, so an
/// abnormal exit still brakes the vehicle and waits out the hover settle.
/// Nothing is retried: repeating a partly executed timed step would apply
/// its motion twice.
///
/// # Errors
///
/// Returns the error of the first step that failed.
pub async fn execute<T>(sequence: &Sequence, transport: &mut T, recovery: &Sequence) -> Result<()>
where
    T: Transport + ?Sized,
{
    for (index, step) in sequence.steps().iter().enumerate() {
        debug!("Step {}: {:?}", index, step);
        if let Err(e) = run_step(transport, *step).await {
            warn!("Step {} failed ({}), running recovery", index, e);
            recover(transport, recovery).await;
            return Err(e);
        }
    }

    Ok(())
}

/// Runs until the first failed send; a hold after a failed send is skipped.
async fn recover<T>(transport: &mut T, recovery: &Sequence)
where
    T: Transport + ?Sized,
{
    for step in recovery.steps() {
        if let Err(e) = run_step(transport, *step).await {
            warn!("Recovery step {:?} failed: {}", step, e);
            return;
        }
    }
}

async fn run_step<T>(transport: &mut T, step: Step) -> Result<()>
where
    T: Transport + ?Sized,
{
    match step {
        Step::Signal(signal) => send_signal(transport, signal).await,
        Step::Command(command) => transport.set_radio_input(command.to_radio_input()).await,
        Step::Hold(duration) => {
            tokio::time::sleep(duration).await;
            Ok(())
        }
    }
}

async fn send_signal<T>(transport: &mut T, signal: Signal) -> Result<()>
where
    T: Transport + ?Sized,
{
    match signal {
        Signal::ResetUiState => transport.reset_ui_state().await,
        Signal::TrimLevel => transport.trim_level().await,
        Signal::StartStopToggle => transport.trigger_start_stop_toggle().await,
        Signal::ResetWatchdog => transport.reset_watchdog().await,
        Signal::SelectCamera(camera) => transport.select_camera(camera).await,
    }
}
