//! # Navdata
//!
//! Raw attitude, altitude and battery readings and their normalized forms.
//!
//! | Reading  | Raw unit       | Normalized                                  |
//! |----------|----------------|---------------------------------------------|
//! | roll     | millidegrees   | `phi / 180000`: ±0.5 at 90°, ±1 upside down |
//! | pitch    | millidegrees   | `theta / 90000`: ±1 at 90°                  |
//! | yaw      | millidegrees   | `psi / 180000`: +0.5 at 90° counter-clockwise |
//! | altitude | millimetres    | centimetres, never below 23                 |
//! | battery  | percent        | percent (0-100)                             |

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw navdata sample as reported by the vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Navdata {
    /// Roll angle (millidegrees)
    pub phi: f64,
    /// Pitch angle (millidegrees)
    pub theta: f64,
    /// Heading (millidegrees)
    pub psi: f64,
    /// Altitude (millimetres)
    pub altitude: i32,
    /// Remaining battery (percent)
    pub battery: f64,
}

impl Navdata {
    /// Left-to-right inclination in `[-1, 1]`.
    #[must_use]
    pub fn roll(&self) -> f64 {
        self.phi / 180_000.0
    }

    /// Front-to-back inclination in `[-1, 1]`.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.theta / 90_000.0
    }

    /// Rotation in `[-1, 1]`, positive counter-clockwise.
    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.psi / 180_000.0
    }

    /// Altitude in centimetres. The sonar bottoms out at 23 cm.
    #[must_use]
    pub fn altitude_cm(&self) -> i32 {
        self.altitude / 10
    }

    #[must_use]
    pub fn battery_percent(&self) -> f64 {
        self.battery
    }
}

/// Timestamped, normalized telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub timestamp: DateTime<Utc>,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub altitude_cm: i32,
    pub battery_percent: f64,
}

impl TelemetryRecord {
    #[must_use]
    pub fn from_navdata(navdata: &Navdata, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            roll: navdata.roll(),
            pitch: navdata.pitch(),
            yaw: navdata.yaw(),
            altitude_cm: navdata.altitude_cm(),
            battery_percent: navdata.battery_percent(),
        }
    }

    /// Snapshot taken now.
    #[must_use]
    pub fn now(navdata: &Navdata) -> Self {
        Self::from_navdata(navdata, Utc::now())
    }
}
