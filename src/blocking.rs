//! # Blocking Facade
//!
//! Synchronous wrapper around [`crate::drone::Drone`] for scripts that do not
//! run their own async runtime. Each call blocks the calling thread for the
//! full duration of the operation on a private current-thread runtime.
//!
//! ```no_run
//! use ardrone_pilot::blocking::Drone;
//! use ardrone_pilot::config::Config;
//! # use ardrone_pilot::transport::{Downlink, Transport};
//!
//! # fn fly<T: Transport, D: Downlink>(transport: T, downlink: D) -> ardrone_pilot::error::Result<()> {
//! let mut drone = Drone::connect(transport, downlink, Config::default())?;
//! drone.takeoff()?;
//! drone.move_up(50.0)?;
//! drone.turn_right()?;
//! drone.land()?;
//! drone.shutdown()
//! # }
//! ```

use tokio::runtime::{Builder, Runtime};

use crate::camera::{Camera, DecodedImage};
use crate::config::Config;
use crate::drone;
use crate::error::Result;
use crate::flight::profile::Maneuver;
use crate::flight::state::FlightState;
use crate::telemetry::{Navdata, TelemetryRecord};
use crate::transport::{Downlink, Transport};

/// Blocking vehicle controller
pub struct Drone<T, D> {
    inner: drone::Drone<T, D>,
    runtime: Runtime,
}

impl<T, D> std::fmt::Debug for Drone<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drone").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl<T, D> Drone<T, D>
where
    T: Transport,
    D: Downlink,
{
    /// Connect on a fresh current-thread runtime
    ///
    /// Must not be called from inside an async context.
    pub fn connect(transport: T, downlink: D, config: Config) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        Self::with_runtime(runtime, transport, downlink, config)
    }

    /// Connect on a caller-supplied runtime
    pub fn with_runtime(runtime: Runtime, transport: T, downlink: D, config: Config) -> Result<Self> {
        let inner = runtime.block_on(drone::Drone::connect(transport, downlink, config))?;
        Ok(Self { inner, runtime })
    }

    #[must_use]
    pub fn state(&self) -> FlightState {
        self.inner.state()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.inner.camera()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    pub fn takeoff(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.takeoff())
    }

    pub fn land(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.land())
    }

    pub fn move_up(&mut self, cm: f64) -> Result<()> {
        self.runtime.block_on(self.inner.move_up(cm))
    }

    pub fn move_down(&mut self, cm: f64) -> Result<()> {
        self.runtime.block_on(self.inner.move_down(cm))
    }

    pub fn move_ahead(&mut self, cm: f64) -> Result<()> {
        self.runtime.block_on(self.inner.move_ahead(cm))
    }

    pub fn turn_left(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.turn_left())
    }

    pub fn turn_right(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.turn_right())
    }

    pub fn perform(&mut self, maneuver: Maneuver) -> Result<()> {
        self.runtime.block_on(self.inner.perform(maneuver))
    }

    pub fn stop_and_hover(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.stop_and_hover())
    }

    /// Send raw axis values; pair with [`stop_and_hover`](Self::stop_and_hover)
    pub fn send_commands(&mut self, roll: f64, pitch: f64, gaz: f64, yaw: f64) -> Result<()> {
        self.runtime
            .block_on(self.inner.send_commands(roll, pitch, gaz, yaw))
    }

    pub fn select_camera(&mut self, camera: Camera) -> Result<()> {
        self.runtime.block_on(self.inner.select_camera(camera))
    }

    pub fn switch_camera(&mut self) -> Result<Camera> {
        self.runtime.block_on(self.inner.switch_camera())
    }

    pub fn capture_image(&mut self) -> Result<DecodedImage> {
        self.inner.capture_image()
    }

    pub fn navdata(&mut self) -> Result<Navdata> {
        self.inner.navdata()
    }

    pub fn telemetry(&mut self) -> Result<TelemetryRecord> {
        self.inner.telemetry()
    }

    /// Land if needed and close the session
    pub fn shutdown(self) -> Result<()> {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.shutdown())
    }
}
