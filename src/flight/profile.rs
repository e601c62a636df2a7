//! # Maneuver Profiles
//!
//! Calibration constants that turn a requested displacement into an open-loop
//! actuation: a duty cycle per axis and a model mapping the magnitude to a
//! duration.
//!
//! ## Duration Models
//!
//! - `linear`: `seconds = cm / cm_per_second`
//! - `logarithmic`: `seconds = max(0, log2(cm / reference_cm) + offset_seconds)`
//!   (forward flight, whose response to duty cycle is non-linear)
//! - `fixed`: a constant duration, used for the 90° turns
//!
//! The defaults were measured on one vehicle indoors. Battery level, floor
//! surface and air movement all shift them, so every value can be overridden
//! from the configuration file.
//!
//! ## Usage
//!
//! ```
//! use ardrone_pilot::flight::profile::{Maneuver, ManeuverProfiles};
//!
//! let profiles = ManeuverProfiles::default();
//! let (command, duration) = profiles.actuation(Maneuver::Up(56.0)).unwrap();
//!
//! assert_eq!(command.gaz(), 0.5);
//! assert_eq!(duration.as_secs_f64(), 2.0); // 56 cm at 28 cm/s
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::command::CommandVector;
use crate::error::{PilotError, Result};

/// Turns always rotate by this many degrees.
pub const TURN_DEGREES: f64 = 90.0;

/// The calibrated maneuver families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverKind {
    Ascend,
    Descend,
    Advance,
    TurnLeft,
    TurnRight,
}

impl ManeuverKind {
    pub const ALL: [ManeuverKind; 5] = [
        ManeuverKind::Ascend,
        ManeuverKind::Descend,
        ManeuverKind::Advance,
        ManeuverKind::TurnLeft,
        ManeuverKind::TurnRight,
    ];
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManeuverKind::Ascend => "ascend",
            ManeuverKind::Descend => "descend",
            ManeuverKind::Advance => "advance",
            ManeuverKind::TurnLeft => "turn_left",
            ManeuverKind::TurnRight => "turn_right",
        };
        f.write_str(name)
    }
}

/// A single maneuver request with its magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maneuver {
    /// Climb by the given centimeters.
    Up(f64),
    /// Descend by the given centimeters.
    Down(f64),
    /// Fly forward by the given centimeters.
    Ahead(f64),
    /// Rotate 90° counter-clockwise.
    TurnLeft,
    /// Rotate 90° clockwise.
    TurnRight,
}

impl Maneuver {
    #[must_use]
    pub fn kind(&self) -> ManeuverKind {
        match self {
            Maneuver::Up(_) => ManeuverKind::Ascend,
            Maneuver::Down(_) => ManeuverKind::Descend,
            Maneuver::Ahead(_) => ManeuverKind::Advance,
            Maneuver::TurnLeft => ManeuverKind::TurnLeft,
            Maneuver::TurnRight => ManeuverKind::TurnRight,
        }
    }

    /// Centimeters for linear moves, degrees for turns.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        match *self {
            Maneuver::Up(cm) | Maneuver::Down(cm) | Maneuver::Ahead(cm) => cm,
            Maneuver::TurnLeft | Maneuver::TurnRight => TURN_DEGREES,
        }
    }

    /// Rejects magnitudes that are not finite or not strictly positive.
    pub fn validate(&self) -> Result<()> {
        let magnitude = self.magnitude();
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(PilotError::OutOfRange(format!(
                "{} magnitude must be a positive finite number, got {}",
                self.kind(),
                magnitude
            )));
        }
        Ok(())
    }
}

/// Duty cycle per axis, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AxisDuty {
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub gaz: f64,
    #[serde(default)]
    pub yaw: f64,
}

impl AxisDuty {
    fn is_zero(&self) -> bool {
        self.roll == 0.0 && self.pitch == 0.0 && self.gaz == 0.0 && self.yaw == 0.0
    }
}

/// Maps a maneuver magnitude to an actuation time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DurationModel {
    Linear { cm_per_second: f64 },
    Logarithmic { reference_cm: f64, offset_seconds: f64 },
    Fixed { seconds: f64 },
}

impl DurationModel {
    /// Raw model output in seconds, floored at zero.
    #[must_use]
    pub fn seconds_for(&self, magnitude: f64) -> f64 {
        let seconds = match *self {
            DurationModel::Linear { cm_per_second } => magnitude / cm_per_second,
            DurationModel::Logarithmic {
                reference_cm,
                offset_seconds,
            } => (magnitude / reference_cm).log2() + offset_seconds,
            DurationModel::Fixed { seconds } => seconds,
        };
        seconds.max(0.0)
    }

    /// Model output as a `Duration`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when the model yields a non-finite or
    /// unrepresentable duration.
    pub fn duration_for(&self, magnitude: f64) -> Result<Duration> {
        let seconds = self.seconds_for(magnitude);
        Duration::try_from_secs_f64(seconds).map_err(|_| {
            PilotError::OutOfRange(format!(
                "magnitude {} produces an invalid duration ({} s)",
                magnitude, seconds
            ))
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            DurationModel::Linear { cm_per_second } => {
                if !cm_per_second.is_finite() || cm_per_second <= 0.0 {
                    return Err("cm_per_second must be a positive finite number".into());
                }
            }
            DurationModel::Logarithmic {
                reference_cm,
                offset_seconds,
            } => {
                if !reference_cm.is_finite() || reference_cm <= 0.0 {
                    return Err("reference_cm must be a positive finite number".into());
                }
                if !offset_seconds.is_finite() {
                    return Err("offset_seconds must be finite".into());
                }
            }
            DurationModel::Fixed { seconds } => {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err("seconds must be a non-negative finite number".into());
                }
            }
        }
        Ok(())
    }
}

/// Calibration for one maneuver kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ManeuverProfile {
    pub axes: AxisDuty,
    pub duration: DurationModel,
}

impl ManeuverProfile {
    /// The progressive command this profile actuates with.
    pub fn command(&self) -> Result<CommandVector> {
        CommandVector::new(self.axes.roll, self.axes.pitch, self.axes.gaz, self.axes.yaw)
    }
}

/// One profile per maneuver kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManeuverProfiles {
    #[serde(default = "default_ascend")]
    pub ascend: ManeuverProfile,

    #[serde(default = "default_descend")]
    pub descend: ManeuverProfile,

    #[serde(default = "default_advance")]
    pub advance: ManeuverProfile,

    #[serde(default = "default_turn_left")]
    pub turn_left: ManeuverProfile,

    #[serde(default = "default_turn_right")]
    pub turn_right: ManeuverProfile,
}

impl Default for ManeuverProfiles {
    fn default() -> Self {
        Self {
            ascend: default_ascend(),
            descend: default_descend(),
            advance: default_advance(),
            turn_left: default_turn_left(),
            turn_right: default_turn_right(),
        }
    }
}

// Default calibration (measured with the duty cycles below)
fn default_ascend() -> ManeuverProfile {
    ManeuverProfile {
        axes: AxisDuty { gaz: 0.5, ..AxisDuty::default() },
        duration: DurationModel::Linear { cm_per_second: 28.0 },
    }
}

fn default_descend() -> ManeuverProfile {
    ManeuverProfile {
        axes: AxisDuty { gaz: -0.5, ..AxisDuty::default() },
        duration: DurationModel::Linear { cm_per_second: 48.0 },
    }
}

fn default_advance() -> ManeuverProfile {
    ManeuverProfile {
        axes: AxisDuty { pitch: -0.15, ..AxisDuty::default() },
        duration: DurationModel::Logarithmic {
            reference_cm: 100.0,
            offset_seconds: 1.415,
        },
    }
}

fn default_turn_left() -> ManeuverProfile {
    ManeuverProfile {
        axes: AxisDuty { yaw: -0.5, ..AxisDuty::default() },
        duration: DurationModel::Fixed { seconds: 1.85 },
    }
}

fn default_turn_right() -> ManeuverProfile {
    ManeuverProfile {
        axes: AxisDuty { yaw: 0.5, ..AxisDuty::default() },
        duration: DurationModel::Fixed { seconds: 1.99 },
    }
}

impl ManeuverProfiles {
    #[must_use]
    pub fn profile(&self, kind: ManeuverKind) -> &ManeuverProfile {
        match kind {
            ManeuverKind::Ascend => &self.ascend,
            ManeuverKind::Descend => &self.descend,
            ManeuverKind::Advance => &self.advance,
            ManeuverKind::TurnLeft => &self.turn_left,
            ManeuverKind::TurnRight => &self.turn_right,
        }
    }

    /// Command and actuation time for a maneuver.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an invalid magnitude or a profile whose
    /// axes fall outside `[-1, 1]`.
    pub fn actuation(&self, maneuver: Maneuver) -> Result<(CommandVector, Duration)> {
        maneuver.validate()?;
        let profile = self.profile(maneuver.kind());
        let command = profile.command()?;
        let duration = profile.duration.duration_for(maneuver.magnitude())?;
        Ok((command, duration))
    }

    /// Validate every profile
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first invalid profile.
    pub fn validate(&self) -> Result<()> {
        for kind in ManeuverKind::ALL {
            let profile = self.profile(kind);

            for (axis, value) in [
                ("roll", profile.axes.roll),
                ("pitch", profile.axes.pitch),
                ("gaz", profile.axes.gaz),
                ("yaw", profile.axes.yaw),
            ] {
                if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                    return Err(PilotError::Config(toml::de::Error::custom(format!(
                        "maneuvers.{}.axes.{} must be between -1.0 and 1.0",
                        kind, axis
                    ))));
                }
            }

            if profile.axes.is_zero() {
                return Err(PilotError::Config(toml::de::Error::custom(format!(
                    "maneuvers.{} must actuate at least one axis",
                    kind
                ))));
            }

            profile.duration.validate().map_err(|msg| {
                PilotError::Config(toml::de::Error::custom(format!(
                    "maneuvers.{}.duration: {}",
                    kind, msg
                )))
            })?;
        }

        Ok(())
    }
}
