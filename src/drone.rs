//! # Drone
//!
//! The vehicle-facing API: flight state, timed maneuvers, camera capture and
//! telemetry for one physical vehicle.
//!
//! Every spatial maneuver is dead reckoning. The vehicle is driven with a
//! fixed duty cycle for a calibrated time and then told to hover, which
//! brakes it. There is no position feedback, so accuracy depends entirely
//! on the [`ManeuverProfiles`](crate::flight::profile::ManeuverProfiles) in
//! the configuration.
//!
//! Operations take `&mut self` and suspend the caller for the full length of
//! the maneuver, including the hover settle at the end.
//!
//! ## Usage
//!
//! ```no_run
//! use ardrone_pilot::config::Config;
//! use ardrone_pilot::drone::Drone;
//! # use ardrone_pilot::transport::{Downlink, Transport};
//!
//! # async fn fly<T: Transport, D: Downlink>(transport: T, downlink: D) -> ardrone_pilot::error::Result<()> {
//! let mut drone = Drone::connect(transport, downlink, Config::default()).await?;
//!
//! drone.takeoff().await?;
//! for _ in 0..4 {
//!     drone.move_ahead(100.0).await?;
//!     drone.turn_left().await?;
//! }
//! let image = drone.capture_image()?;
//! drone.land().await?;
//! drone.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use tracing::{debug, info, warn};

use crate::camera::{Camera, DecodedImage};
use crate::config::Config;
use crate::error::{PilotError, Result};
use crate::flight::command::CommandVector;
use crate::flight::plan::Planner;
use crate::flight::profile::Maneuver;
use crate::flight::sequence::{execute, Sequence};
use crate::flight::state::{FlightRequest, FlightState, Transition};
use crate::telemetry::{Navdata, TelemetryLogger, TelemetryRecord};
use crate::transport::{Downlink, Transport};

/// Controller for a single vehicle
pub struct Drone<T, D> {
    transport: T,
    downlink: D,
    config: Config,
    state: FlightState,
    camera: Camera,
    recorder: Option<TelemetryLogger>,
}

impl<T, D> std::fmt::Debug for Drone<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drone")
            .field("state", &self.state)
            .field("camera", &self.camera)
            .field("recording", &self.recorder.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, D> Drone<T, D>
where
    T: Transport,
    D: Downlink,
{
    /// Open the session and select the horizontal camera
    ///
    /// The vehicle is assumed to be on the floor. When telemetry is enabled
    /// every [`telemetry`](Self::telemetry) snapshot is also appended to the
    /// telemetry log.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, the telemetry
    /// directory cannot be created or the transport cannot open the session
    pub async fn connect(mut transport: T, downlink: D, config: Config) -> Result<Self> {
        config.validate()?;
        let recorder = if config.telemetry.enabled {
            Some(TelemetryLogger::new(&config.telemetry)?)
        } else {
            None
        };

        transport.initialize_session().await?;
        info!("Vehicle session initialized");

        let mut drone = Self {
            transport,
            downlink,
            config,
            state: FlightState::Grounded,
            camera: Camera::Horizontal,
            recorder,
        };

        let select = drone.planner().camera(drone.camera);
        drone.run(&select).await?;
        Ok(drone)
    }

    /// Current flight state
    #[must_use]
    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Currently selected camera
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reset, trim and take off, then hover (about 1 m up)
    ///
    /// Does nothing when already airborne.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the first failing step. The vehicle
    /// counts as airborne as soon as the start signal has been sent, so a
    /// failure after that point leaves the state `Airborne` and a later
    /// [`land`](Self::land) or [`shutdown`](Self::shutdown) still lands it.
    pub async fn takeoff(&mut self) -> Result<()> {
        let Some(next) = self.transition(FlightRequest::Takeoff)? else {
            warn!("Takeoff ignored: already {}", self.state);
            return Ok(());
        };

        info!("Taking off");
        let lift_off = self.planner().lift_off();
        self.run(&lift_off).await?;

        self.state = next;
        info!("Vehicle is {}", self.state);

        let stabilize = self.planner().stabilize();
        self.run(&stabilize).await?;

        self.stop_and_hover().await
    }

    /// Land the vehicle
    ///
    /// Does nothing when already grounded.
    pub async fn land(&mut self) -> Result<()> {
        let Some(next) = self.transition(FlightRequest::Land)? else {
            debug!("Land ignored: already {}", self.state);
            return Ok(());
        };

        info!("Landing");
        let land = self.planner().land();
        self.run(&land).await?;

        self.state = next;
        info!("Vehicle is {}", self.state);
        Ok(())
    }

    /// Climb `cm` centimeters
    pub async fn move_up(&mut self, cm: f64) -> Result<()> {
        self.perform(Maneuver::Up(cm)).await
    }

    /// Descend `cm` centimeters
    pub async fn move_down(&mut self, cm: f64) -> Result<()> {
        self.perform(Maneuver::Down(cm)).await
    }

    /// Fly forward `cm` centimeters
    pub async fn move_ahead(&mut self, cm: f64) -> Result<()> {
        self.perform(Maneuver::Ahead(cm)).await
    }

    /// Rotate 90° counter-clockwise
    pub async fn turn_left(&mut self) -> Result<()> {
        self.perform(Maneuver::TurnLeft).await
    }

    /// Rotate 90° clockwise
    pub async fn turn_right(&mut self) -> Result<()> {
        self.perform(Maneuver::TurnRight).await
    }

    /// Run a maneuver to completion, ending in a hover
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when grounded
    /// - `OutOfRange` for a magnitude that is not a positive finite number
    /// - `Transport` if a command cannot be sent
    pub async fn perform(&mut self, maneuver: Maneuver) -> Result<()> {
        let plan = self.plan_maneuver(maneuver)?;
        self.run(&plan).await
    }

    /// Run a maneuver unless `abort` completes first
    ///
    /// When `abort` wins the vehicle is told to hover before returning
    /// `Aborted`, so a cancelled maneuver never leaves it drifting.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ardrone_pilot::drone::Drone;
    /// # use ardrone_pilot::flight::profile::Maneuver;
    /// # use ardrone_pilot::transport::{Downlink, Transport};
    /// # async fn demo<T: Transport, D: Downlink>(drone: &mut Drone<T, D>) {
    /// let deadline = tokio::time::sleep(std::time::Duration::from_secs(2));
    /// if let Err(e) = drone.perform_until(Maneuver::Ahead(300.0), deadline).await {
    ///     eprintln!("Maneuver did not complete: {e}");
    /// }
    /// # }
    /// ```
    pub async fn perform_until<F>(&mut self, maneuver: Maneuver, abort: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let plan = self.plan_maneuver(maneuver)?;

        let recovery = self.planner().hover();
        let completed = {
            let run = execute(&plan, &mut self.transport, &recovery);
            tokio::select! {
                result = run => Some(result),
                _ = abort => None,
            }
        };

        match completed {
            Some(result) => result,
            None => {
                warn!("{:?} aborted, commanding hover", maneuver);
                self.stop_and_hover().await?;
                Err(PilotError::Aborted)
            }
        }
    }

    /// Stop moving in every direction and hover in place
    ///
    /// Allowed in any state. Blocks for the configured hover settle.
    pub async fn stop_and_hover(&mut self) -> Result<()> {
        debug!("Stop and hover");
        let hover = self.planner().hover();
        self.run(&hover).await
    }

    /// Send raw axis values (each in `[-1, 1]`)
    ///
    /// Low-level escape hatch. The vehicle keeps moving until
    /// [`stop_and_hover`](Self::stop_and_hover) is called, so always pair
    /// the two.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if any value is outside `[-1, 1]` or not
    /// finite; nothing is sent in that case.
    pub async fn send_commands(&mut self, roll: f64, pitch: f64, gaz: f64, yaw: f64) -> Result<()> {
        let command = CommandVector::new(roll, pitch, gaz, yaw)?;
        if !self.state.is_airborne() {
            warn!("Sending commands while {}", self.state);
        }
        self.run(&Sequence::new().command(command)).await
    }

    /// Route the downlink to a camera
    pub async fn select_camera(&mut self, camera: Camera) -> Result<()> {
        let select = self.planner().camera(camera);
        self.run(&select).await?;
        self.camera = camera;
        info!("Selected {:?} camera", camera);
        Ok(())
    }

    /// Toggle between horizontal and vertical cameras
    ///
    /// # Returns
    ///
    /// * `Result<Camera>` - The camera now selected
    pub async fn switch_camera(&mut self) -> Result<Camera> {
        let next = self.camera.toggled();
        self.select_camera(next).await?;
        Ok(next)
    }

    /// Capture and decode the latest frame from the selected camera
    ///
    /// # Errors
    ///
    /// Returns error if the downlink has no frame or the frame cannot be
    /// decoded
    pub fn capture_image(&mut self) -> Result<DecodedImage> {
        let frame = self.downlink.latest_frame()?;
        debug!("Decoding {}x{} frame ({} bytes)", frame.width, frame.height, frame.data.len());
        frame.decode()
    }

    /// Latest raw navdata
    pub fn navdata(&mut self) -> Result<Navdata> {
        self.downlink.navdata()
    }

    /// Normalized telemetry snapshot
    ///
    /// Recorded to the telemetry log when enabled. A failed write is logged
    /// and does not fail the read.
    pub fn telemetry(&mut self) -> Result<TelemetryRecord> {
        let navdata = self.downlink.navdata()?;
        let record = TelemetryRecord::now(&navdata);

        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.log(&record) {
                warn!("Failed to record telemetry: {}", e);
            }
        }

        Ok(record)
    }

    /// Land if needed and close the session
    pub async fn shutdown(mut self) -> Result<()> {
        if self.state.is_airborne() {
            self.land().await?;
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.flush()?;
        }
        self.transport.teardown_session().await?;
        info!("Vehicle session closed");
        Ok(())
    }

    fn planner(&self) -> Planner<'_> {
        Planner::new(&self.config.timing, &self.config.maneuvers)
    }

    /// Next state for a request, or `None` when it is already satisfied
    fn transition(&self, request: FlightRequest) -> Result<Option<FlightState>> {
        Ok(match self.state.resolve(request)? {
            Transition::Enter(next) => Some(next),
            Transition::Proceed => Some(self.state),
            Transition::Ignore => None,
        })
    }

    fn plan_maneuver(&self, maneuver: Maneuver) -> Result<Sequence> {
        if let Err(e) = self.state.resolve(FlightRequest::Maneuver) {
            warn!("{:?} rejected: {}", maneuver, e);
            return Err(e);
        }

        let plan = self.planner().maneuver(maneuver)?;
        info!("{:?}: {:?} until hover", maneuver, plan.total_hold());
        Ok(plan)
    }

    /// Execute with the hover plan as recovery
    async fn run(&mut self, sequence: &Sequence) -> Result<()> {
        let recovery = self.planner().hover();
        execute(sequence, &mut self.transport, &recovery).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::RawFrame;
    use crate::transport::mocks::{hover_call, Call, MockTransport};
    use crate::transport::MockDownlink;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_test::{assert_err, assert_ok};

    async fn connected() -> (Drone<MockTransport, MockDownlink>, MockTransport) {
        let transport = MockTransport::new();
        let drone = Drone::connect(transport.clone(), MockDownlink::new(), Config::default())
            .await
            .unwrap();
        (drone, transport)
    }

    async fn airborne() -> (Drone<MockTransport, MockDownlink>, MockTransport) {
        let (mut drone, transport) = connected().await;
        drone.takeoff().await.unwrap();
        (drone, transport)
    }

    fn radio(roll: f64, pitch: f64, gaz: f64, yaw: f64) -> Call {
        Call::RadioInput(CommandVector::new(roll, pitch, gaz, yaw).unwrap().to_radio_input())
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_selects_horizontal_camera() {
        let start = Instant::now();
        let (drone, transport) = connected().await;

        assert_eq!(
            transport.calls(),
            vec![Call::InitializeSession, Call::SelectCamera(Camera::Horizontal)]
        );
        assert_eq!(drone.state(), FlightState::Grounded);
        assert_eq!(drone.camera(), Camera::Horizontal);
        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure() {
        let transport = MockTransport::new();
        transport.fail_on(Call::InitializeSession);

        let result = Drone::connect(transport, MockDownlink::new(), Config::default()).await;
        assert!(matches!(result, Err(PilotError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_rejects_invalid_config() {
        let mut config = Config::default();
        config.timing.hover_settle_ms = 0;

        let result = Drone::connect(MockTransport::new(), MockDownlink::new(), config).await;
        assert!(matches!(result, Err(PilotError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_takeoff_sequence_and_timing() {
        let (mut drone, transport) = connected().await;
        let start = Instant::now();

        drone.takeoff().await.unwrap();

        assert_eq!(drone.state(), FlightState::Airborne);

        let log: Vec<(Duration, Call)> = transport
            .timed_calls()
            .into_iter()
            .skip(2)
            .map(|(at, call)| (at - start, call))
            .collect();

        assert_eq!(
            log,
            vec![
                (Duration::from_millis(0), Call::ResetUiState),
                (Duration::from_millis(250), Call::TrimLevel),
                (Duration::from_millis(500), Call::StartStopToggle),
                (Duration::from_millis(5000), Call::ResetWatchdog),
                (Duration::from_millis(5250), hover_call()),
            ]
        );
        assert_eq!(start.elapsed(), Duration::from_millis(8250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_takeoff_is_noop() {
        let (mut drone, transport) = airborne().await;
        let sent = transport.calls().len();

        assert_ok!(drone.takeoff().await);

        assert_eq!(transport.calls().len(), sent);
        assert_eq!(drone.state(), FlightState::Airborne);
    }

    #[tokio::test(start_paused = true)]
    async fn test_takeoff_then_land_leaves_grounded() {
        let (mut drone, transport) = connected().await;

        drone.takeoff().await.unwrap();
        drone.land().await.unwrap();

        assert_eq!(drone.state(), FlightState::Grounded);
        assert_eq!(transport.last_call(), Some(Call::StartStopToggle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_land_while_grounded_is_noop() {
        let (mut drone, transport) = connected().await;
        let sent = transport.calls().len();
        let start = Instant::now();

        assert_ok!(drone.land().await);

        assert_eq!(drone.state(), FlightState::Grounded);
        assert_eq!(transport.calls().len(), sent);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_before_start_signal_keeps_grounded() {
        let (mut drone, transport) = connected().await;
        transport.fail_on(Call::TrimLevel);
        let start = Instant::now();

        let result = drone.takeoff().await;

        assert!(matches!(result, Err(PilotError::Transport(_))));
        assert_eq!(drone.state(), FlightState::Grounded);
        assert!(!transport.calls().contains(&Call::StartStopToggle));
        assert_eq!(transport.last_call(), Some(hover_call()));
        // Reset settle, then the recovery hover settle
        assert_eq!(start.elapsed(), Duration::from_millis(3250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_start_signal_counts_as_airborne() {
        let (mut drone, transport) = connected().await;
        transport.fail_on(Call::ResetWatchdog);

        let result = drone.takeoff().await;

        assert!(matches!(result, Err(PilotError::Transport(_))));
        assert_eq!(drone.state(), FlightState::Airborne);
        assert_eq!(transport.last_call(), Some(hover_call()));

        transport.clear_failure();
        let before = transport.calls().len();
        drone.land().await.unwrap();

        assert_eq!(transport.calls()[before..].to_vec(), vec![Call::StartStopToggle]);
        assert_eq!(drone.state(), FlightState::Grounded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_lands_after_failed_takeoff() {
        let (mut drone, transport) = connected().await;
        transport.fail_on(Call::ResetWatchdog);
        assert_err!(drone.takeoff().await);

        transport.clear_failure();
        let before = transport.calls().len();
        drone.shutdown().await.unwrap();

        assert_eq!(
            transport.calls()[before..].to_vec(),
            vec![Call::StartStopToggle, Call::TeardownSession]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retried_takeoff_after_late_failure_is_noop() {
        let (mut drone, transport) = connected().await;
        transport.fail_on(Call::ResetWatchdog);
        assert_err!(drone.takeoff().await);

        transport.clear_failure();
        let sent = transport.calls().len();
        assert_ok!(drone.takeoff().await);

        // A second start signal would land the vehicle
        assert_eq!(transport.calls().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_maneuvers_rejected_while_grounded() {
        let (mut drone, transport) = connected().await;
        let sent = transport.calls().len();

        assert_err!(drone.move_up(50.0).await);
        assert_err!(drone.move_down(50.0).await);
        assert_err!(drone.move_ahead(50.0).await);
        assert_err!(drone.turn_left().await);
        let err = drone.turn_right().await.unwrap_err();

        assert!(matches!(
            err,
            PilotError::InvalidTransition {
                state: FlightState::Grounded,
                ..
            }
        ));
        assert_eq!(transport.calls().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_maneuver_ends_in_hover() {
        let (mut drone, transport) = airborne().await;

        drone.move_up(30.0).await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));

        drone.move_down(30.0).await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));

        drone.move_ahead(120.0).await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));

        drone.turn_left().await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));

        drone.turn_right().await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));

        assert_eq!(drone.state(), FlightState::Airborne);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_up_timing() {
        let (mut drone, transport) = airborne().await;
        let before = transport.calls().len();
        let start = Instant::now();

        // 56 cm at 28 cm/s
        drone.move_up(56.0).await.unwrap();

        let log: Vec<(Duration, Call)> = transport
            .timed_calls()
            .into_iter()
            .skip(before)
            .map(|(at, call)| (at - start, call))
            .collect();

        assert_eq!(
            log,
            vec![
                (Duration::ZERO, radio(0.0, 0.0, 0.5, 0.0)),
                (Duration::from_secs(2), hover_call()),
            ]
        );
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_ahead_command() {
        let (mut drone, transport) = airborne().await;
        let before = transport.calls().len();

        drone.move_ahead(200.0).await.unwrap();

        let calls = transport.calls()[before..].to_vec();
        assert_eq!(calls, vec![radio(0.0, -0.15, 0.0, 0.0), hover_call()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_magnitude_sends_nothing() {
        let (mut drone, transport) = airborne().await;
        let sent = transport.calls().len();

        let result = drone.move_ahead(-20.0).await;

        assert!(matches!(result, Err(PilotError::OutOfRange(_))));
        assert_eq!(transport.calls().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_actuation_failure_hovers_and_settles() {
        let (mut drone, transport) = airborne().await;
        let before = transport.calls().len();
        transport.fail_on(radio(0.0, 0.0, 0.0, 0.5));
        let start = Instant::now();

        let result = drone.turn_right().await;

        assert!(matches!(result, Err(PilotError::Transport(_))));
        assert_eq!(transport.calls()[before..].to_vec(), vec![hover_call()]);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_failure_after_actuation() {
        let (mut drone, transport) = airborne().await;
        let before = transport.calls().len();
        transport.fail_on(hover_call());
        let start = Instant::now();

        let result = drone.turn_right().await;

        // Turn completes its hold, both the planned and the recovery hover
        // fail, and nothing is retried
        assert!(matches!(result, Err(PilotError::Transport(_))));
        assert_eq!(
            transport.calls()[before..].to_vec(),
            vec![radio(0.0, 0.0, 0.0, 0.5)]
        );
        // Only the turn hold elapsed, no hover settle
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1989), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(2), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_perform_until_abort_hovers() {
        let (mut drone, transport) = airborne().await;
        let before = transport.calls().len();
        let start = Instant::now();

        let abort = tokio::time::sleep(Duration::from_secs(1));
        let result = drone.perform_until(Maneuver::TurnRight, abort).await;

        assert!(matches!(result, Err(PilotError::Aborted)));
        assert_eq!(drone.state(), FlightState::Airborne);

        let log: Vec<(Duration, Call)> = transport
            .timed_calls()
            .into_iter()
            .skip(before)
            .map(|(at, call)| (at - start, call))
            .collect();
        assert_eq!(
            log,
            vec![
                (Duration::ZERO, radio(0.0, 0.0, 0.0, 0.5)),
                (Duration::from_secs(1), hover_call()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_perform_until_completes() {
        let (mut drone, transport) = airborne().await;

        let result = drone
            .perform_until(Maneuver::Up(28.0), std::future::pending())
            .await;

        assert_ok!(result);
        assert_eq!(transport.last_call(), Some(hover_call()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_commands() {
        let (mut drone, transport) = airborne().await;

        drone.send_commands(0.25, -0.5, 1.0, -1.0).await.unwrap();

        // No implicit hover: the caller owns stopping
        assert_eq!(transport.last_call(), Some(radio(0.25, -0.5, 1.0, -1.0)));

        drone.stop_and_hover().await.unwrap();
        assert_eq!(transport.last_call(), Some(hover_call()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_commands_out_of_range() {
        let (mut drone, transport) = airborne().await;
        let sent = transport.calls().len();

        let result = drone.send_commands(0.0, 1.2, 0.0, 0.0).await;

        assert!(matches!(result, Err(PilotError::OutOfRange(_))));
        assert_eq!(transport.calls().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_and_hover_while_grounded() {
        let (mut drone, transport) = connected().await;
        let start = Instant::now();

        drone.stop_and_hover().await.unwrap();

        assert_eq!(transport.last_call(), Some(hover_call()));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_camera() {
        let (mut drone, transport) = connected().await;

        assert_eq!(drone.switch_camera().await.unwrap(), Camera::Vertical);
        assert_eq!(transport.last_call(), Some(Call::SelectCamera(Camera::Vertical)));

        assert_eq!(drone.switch_camera().await.unwrap(), Camera::Horizontal);
        assert_eq!(drone.camera(), Camera::Horizontal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_camera_switch_keeps_camera() {
        let (mut drone, transport) = connected().await;
        transport.fail_on(Call::SelectCamera(Camera::Vertical));

        assert_err!(drone.switch_camera().await);
        assert_eq!(drone.camera(), Camera::Horizontal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_image() {
        let mut downlink = MockDownlink::new();
        downlink
            .expect_latest_frame()
            .times(1)
            .returning(|| Ok(RawFrame::new(vec![0xFFu8; 320 * 240 * 2], 320, 240)));

        let mut drone = Drone::connect(MockTransport::new(), downlink, Config::default())
            .await
            .unwrap();

        let image = drone.capture_image().unwrap();
        assert_eq!(image.pixel(160, 120), Some([0xF8, 0xFC, 0xF8]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_image_rejects_bad_frame() {
        let mut downlink = MockDownlink::new();
        downlink
            .expect_latest_frame()
            .returning(|| Ok(RawFrame::new(vec![0u8; 16], 640, 480)));

        let mut drone = Drone::connect(MockTransport::new(), downlink, Config::default())
            .await
            .unwrap();

        assert!(matches!(drone.capture_image(), Err(PilotError::Decode(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_telemetry() {
        let mut downlink = MockDownlink::new();
        downlink.expect_navdata().returning(|| {
            Ok(Navdata {
                phi: 90_000.0,
                theta: 45_000.0,
                psi: 0.0,
                altitude: 1000,
                battery: 64.0,
            })
        });

        let mut drone = Drone::connect(MockTransport::new(), downlink, Config::default())
            .await
            .unwrap();

        let record = drone.telemetry().unwrap();
        assert_eq!(record.roll, 0.5);
        assert_eq!(record.pitch, 0.5);
        assert_eq!(record.altitude_cm, 100);
        assert_eq!(record.battery_percent, 64.0);
        assert_eq!(drone.navdata().unwrap().altitude_cm(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_telemetry_is_recorded_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.telemetry.enabled = true;
        config.telemetry.log_dir = dir.path().to_string_lossy().to_string();

        let mut downlink = MockDownlink::new();
        downlink.expect_navdata().times(3).returning(|| {
            Ok(Navdata {
                altitude: 800,
                battery: 90.0,
                ..Navdata::default()
            })
        });

        let mut drone = Drone::connect(MockTransport::new(), downlink, config)
            .await
            .unwrap();
        for _ in 0..3 {
            drone.telemetry().unwrap();
        }
        drone.shutdown().await.unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let contents = std::fs::read_to_string(&files[0]).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.lines().all(|line| line.contains("\"altitude_cm\":80")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_lands_and_tears_down() {
        let (drone, transport) = airborne().await;

        drone.shutdown().await.unwrap();

        let calls = transport.calls();
        let n = calls.len();
        assert_eq!(
            &calls[n - 2..],
            &[Call::StartStopToggle, Call::TeardownSession]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_while_grounded() {
        let (drone, transport) = connected().await;

        drone.shutdown().await.unwrap();

        assert_eq!(transport.last_call(), Some(Call::TeardownSession));
        assert!(!transport.calls().contains(&Call::StartStopToggle));
    }
}
