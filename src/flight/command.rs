//! # Command Vectors
//!
//! A [`CommandVector`] is the four-axis actuation request the controller
//! hands to the transport for one maneuver step:
//!
//! | Axis  | -1.0                 | +1.0                 |
//! |-------|----------------------|----------------------|
//! | roll  | full left tilt       | full right tilt      |
//! | pitch | full forward tilt    | full backward tilt   |
//! | gaz   | full descent         | full climb           |
//! | yaw   | full counter-clockwise | full clockwise     |
//!
//! ## Transport quirks
//!
//! The radio-input primitive of the transport expects integers in
//! `-33000..=33000`, negates gaz before sending, and swaps the first two
//! slots. [`CommandVector::to_radio_input`] pre-compensates for both so the
//! vehicle receives what the vector says.

use crate::error::{PilotError, Result};

/// Full-scale value of the transport's radio input slots.
pub const RADIO_INPUT_SCALE: f64 = 33_000.0;

/// Four bounded axis values plus the hover flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandVector {
    roll: f64,
    pitch: f64,
    gaz: f64,
    yaw: f64,
    hover: bool,
}

impl CommandVector {
    /// Creates a progressive (non-hover) command.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if any axis is non-finite or outside `[-1, 1]`.
    /// Values are rejected, never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ardrone_pilot::flight::command::CommandVector;
    ///
    /// let climb = CommandVector::new(0.0, 0.0, 0.5, 0.0).unwrap();
    /// assert!(!climb.is_neutral());
    /// assert!(CommandVector::new(0.0, 1.5, 0.0, 0.0).is_err());
    /// ```
    pub fn new(roll: f64, pitch: f64, gaz: f64, yaw: f64) -> Result<Self> {
        for (name, value) in [("roll", roll), ("pitch", pitch), ("gaz", gaz), ("yaw", yaw)] {
            check_axis(name, value)?;
        }

        Ok(Self {
            roll,
            pitch,
            gaz,
            yaw,
            hover: false,
        })
    }

    /// All axes zero with the hover flag set.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            gaz: 0.0,
            yaw: 0.0,
            hover: true,
        }
    }

    /// True for the neutral hover command.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    #[must_use]
    pub fn roll(&self) -> f64 {
        self.roll
    }

    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    #[must_use]
    pub fn gaz(&self) -> f64 {
        self.gaz
    }

    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    #[must_use]
    pub fn hover(&self) -> bool {
        self.hover
    }

    /// Converts to the transport's native slot layout.
    ///
    /// Slot order is `[roll, pitch, -gaz, yaw]`; the transport swaps the
    /// first two and negates the third on its way to the wire.
    #[must_use]
    pub fn to_radio_input(&self) -> RadioInput {
        RadioInput {
            slots: [
                scale(self.roll),
                scale(self.pitch),
                scale(-self.gaz),
                scale(self.yaw),
            ],
            hover: self.hover,
        }
    }
}

/// Collaborator-native form of a [`CommandVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioInput {
    /// Scaled axis values in transport slot order.
    pub slots: [i32; 4],
    /// Hover flag (1 on the wire when set).
    pub hover: bool,
}

fn check_axis(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(PilotError::OutOfRange(format!(
            "{} must be within [-1, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Truncates toward zero, as the transport's own float-to-int conversion
/// does. Every default duty cycle scales to an exact integer.
#[inline]
fn scale(value: f64) -> i32 {
    (value * RADIO_INPUT_SCALE) as i32
}
