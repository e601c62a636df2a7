//! # Flight State Machine
//!
//! Two states, `Grounded` and `Airborne`. Every request is resolved through
//! [`FlightState::resolve`], which is the single transition table for the
//! controller.
//!
//! | State    | Takeoff        | Land           | Maneuver |
//! |----------|----------------|----------------|----------|
//! | Grounded | Enter Airborne | Ignore         | Reject   |
//! | Airborne | Ignore         | Enter Grounded | Proceed  |

use std::fmt;

use crate::error::{PilotError, Result};

/// Whether the vehicle is on the floor or flying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlightState {
    /// On the floor (initial state).
    #[default]
    Grounded,
    /// Flying, hovering between maneuvers.
    Airborne,
}

/// Requests that may change or depend on the flight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightRequest {
    Takeoff,
    Land,
    /// Any directional maneuver (up, down, ahead, turn).
    Maneuver,
}

/// Outcome of resolving a request against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Run the request, then move to the given state.
    Enter(FlightState),
    /// Run the request, state is unchanged.
    Proceed,
    /// Nothing to do; the request is already satisfied.
    Ignore,
}

impl FlightRequest {
    fn name(self) -> &'static str {
        match self {
            FlightRequest::Takeoff => "take off",
            FlightRequest::Land => "land",
            FlightRequest::Maneuver => "maneuver",
        }
    }
}

impl FlightState {
    /// Resolve a request against this state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for a maneuver while grounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use ardrone_pilot::flight::state::{FlightRequest, FlightState, Transition};
    ///
    /// let t = FlightState::Grounded.resolve(FlightRequest::Takeoff).unwrap();
    /// assert_eq!(t, Transition::Enter(FlightState::Airborne));
    /// assert!(FlightState::Grounded.resolve(FlightRequest::Maneuver).is_err());
    /// ```
    pub fn resolve(self, request: FlightRequest) -> Result<Transition> {
        use FlightRequest::*;
        use FlightState::*;

        match (self, request) {
            (Grounded, Takeoff) => Ok(Transition::Enter(Airborne)),
            (Airborne, Land) => Ok(Transition::Enter(Grounded)),
            (Airborne, Maneuver) => Ok(Transition::Proceed),
            (Airborne, Takeoff) | (Grounded, Land) => Ok(Transition::Ignore),
            (Grounded, Maneuver) => Err(PilotError::InvalidTransition {
                state: self,
                operation: request.name(),
            }),
        }
    }

    /// Returns true when flying.
    #[must_use]
    pub fn is_airborne(self) -> bool {
        self == FlightState::Airborne
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightState::Grounded => f.write_str("grounded"),
            FlightState::Airborne => f.write_str("airborne"),
        }
    }
}
