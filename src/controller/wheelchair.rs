use nalgebra::{Vector2, Vector3};
use tracing::{debug, info};

use crate::config::{BodyConfig, ControllerConfig};
use crate::physics::{BodyDynamics, BodyHandle, Pose, World};
use super::camera::CameraRig;
use super::events::{ControllerEvent, PromptSink};
use super::held::HeldObjectManager;
use super::input::{self, BindingError, EdgeDetector, InputEvent, InputHost, Signal, Subscriptions, WheelSide};
use super::interaction::{ActionEdges, InteractionScanner, ScanOutcome};
use super::locomotion::{LocomotionController, PushOutcome};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("failed to bind input signal {signal}")]
    Binding {
        signal: Signal,
        #[source]
        source: BindingError,
    },
    #[error("controller is already initialized")]
    AlreadyInitialized,
    #[error("{name} must be finite, got {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}

/// What a variable tick did, for callers that record sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub actions: ActionEdges,
    pub scan: ScanOutcome,
}

/// First-person wheelchair: locomotion, camera, interaction and carrying
/// behind one lifecycle and a two-phase tick.
///
/// The host calls [`initialize`](Self::initialize) once, forwards input with
/// [`handle_input`](Self::handle_input), and drives
/// [`on_variable_tick`](Self::on_variable_tick) every frame and
/// [`on_fixed_tick`](Self::on_fixed_tick) before each physics step.
pub struct WheelchairController {
    vehicle: BodyHandle,
    body: BodyConfig,
    hold_offset: Option<Vector3<f64>>,
    locomotion: LocomotionController,
    camera: CameraRig,
    scanner: InteractionScanner,
    held: HeldObjectManager,
    subscriptions: Option<Subscriptions>,
    interact: EdgeDetector,
    pickup: EdgeDetector,
    scare: EdgeDetector,
    look: Vector2<f64>,
    events: Vec<ControllerEvent>,
}

impl std::fmt::Debug for WheelchairController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelchairController")
            .field("vehicle", &self.vehicle)
            .field("enabled", &self.is_enabled())
            .field("wheels", &self.locomotion.wheels())
            .field("camera", &self.camera.pose())
            .field("held", &self.held.state())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl WheelchairController {
    pub fn new(config: ControllerConfig, vehicle: BodyHandle) -> Self {
        let ControllerConfig { movement, camera, interaction, hold, body } = config;
        Self {
            vehicle,
            body,
            hold_offset: hold.hold_point.map(Vector3::from),
            locomotion: LocomotionController::new(movement),
            camera: CameraRig::new(camera),
            scanner: InteractionScanner::new(interaction),
            held: HeldObjectManager::new(hold),
            subscriptions: None,
            interact: EdgeDetector::default(),
            pickup: EdgeDetector::default(),
            scare: EdgeDetector::default(),
            look: Vector2::zeros(),
            events: Vec::new(),
        }
    }

    pub fn with_camera(mut self, pose: Pose) -> Self {
        self.camera.attach(pose);
        self
    }

    pub fn with_prompt_sink(mut self, sink: impl PromptSink + 'static) -> Self {
        self.scanner.set_prompt_sink(Box::new(sink));
        self
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe every bound signal, set up the vehicle body and clear the
    /// prompt. On a rejected subscription nothing stays acquired.
    pub fn initialize<H, W>(&mut self, host: &mut H, world: &mut W) -> Result<(), ControllerError>
    where
        H: InputHost + ?Sized,
        W: BodyDynamics + ?Sized,
    {
        if self.subscriptions.is_some() {
            return Err(ControllerError::AlreadyInitialized);
        }
        let subs = input::acquire(host, &Signal::ALL)
            .map_err(|(signal, source)| ControllerError::Binding { signal, source })?;

        let b = &self.body;
        world.configure_body(self.vehicle, b.linear_damping, b.angular_damping, b.lock_tilt);
        self.scanner.reset_prompt();

        info!(vehicle = ?self.vehicle, signals = subs.signals().len(), "wheelchair controller initialized");
        self.subscriptions = Some(subs);
        Ok(())
    }

    /// Release all subscriptions and zero the wheel state. Safe to call twice.
    pub fn shutdown<H: InputHost + ?Sized>(&mut self, host: &mut H) {
        let Some(subs) = self.subscriptions.take() else { return };
        subs.release(host);
        self.locomotion.release_wheels();
        self.interact.reset();
        self.pickup.reset();
        self.scare.reset();
        self.look = Vector2::zeros();
        info!(vehicle = ?self.vehicle, "wheelchair controller shut down");
    }

    pub fn is_enabled(&self) -> bool {
        self.subscriptions.is_some()
    }

    fn subscribed(&self, signal: Signal) -> bool {
        self.subscriptions.as_ref().is_some_and(|s| s.is_active(signal))
    }

    /// Replace the look sensitivity with a settings value, when one is set.
    /// A non-finite value is rejected and the current sensitivity kept.
    pub fn apply_sensitivity(&mut self, setting: Option<f64>) -> Result<(), ControllerError> {
        let Some(s) = setting else { return Ok(()) };
        if !s.is_finite() {
            return Err(ControllerError::InvalidSetting { name: "camera.sensitivity", value: s });
        }
        self.camera.set_sensitivity(s);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Route one input event. Events for signals that are not subscribed are
    /// dropped. Scroll pushes queue forces on the vehicle immediately.
    pub fn handle_input<W: BodyDynamics + ?Sized>(&mut self, event: InputEvent, world: &mut W) -> Option<PushOutcome> {
        if !self.subscribed(event.signal()) {
            return None;
        }
        match event {
            InputEvent::Pressed(Signal::LeftWheel) => self.locomotion.set_wheel(WheelSide::Left, true),
            InputEvent::Released(Signal::LeftWheel) => self.locomotion.set_wheel(WheelSide::Left, false),
            InputEvent::Pressed(Signal::RightWheel) => self.locomotion.set_wheel(WheelSide::Right, true),
            InputEvent::Released(Signal::RightWheel) => self.locomotion.set_wheel(WheelSide::Right, false),
            InputEvent::Pressed(Signal::Interact) => self.interact.press(),
            InputEvent::Released(Signal::Interact) => self.interact.release(),
            InputEvent::Pressed(Signal::Pickup) => self.pickup.press(),
            InputEvent::Released(Signal::Pickup) => self.pickup.release(),
            InputEvent::Pressed(Signal::Jumpscare) => self.scare.press(),
            InputEvent::Released(Signal::Jumpscare) => self.scare.release(),
            InputEvent::Look(v) => self.look = v,
            InputEvent::Scroll(v) => {
                let outcome = self.locomotion.on_scroll_push(v.y, self.vehicle, world);
                if outcome.pulsed() {
                    debug!("movement pulse");
                    self.events.push(ControllerEvent::MovementPulse);
                }
                return Some(outcome);
            }
            // Continuous signals have no press/release meaning.
            InputEvent::Pressed(_) | InputEvent::Released(_) => {}
        }
        None
    }

    // -----------------------------------------------------------------------
    // Ticks
    // -----------------------------------------------------------------------

    /// Frame-rate tick: edge sampling, camera look and follow, interaction scan.
    pub fn on_variable_tick<W: World + ?Sized>(&mut self, dt: f64, world: &mut W) -> Option<TickReport> {
        if !self.is_enabled() {
            return None;
        }
        let actions = ActionEdges { interact: self.interact.sample(), pickup: self.pickup.sample() };
        let scare = self.scare.sample();

        let body_pose = world.pose(self.vehicle);
        let body_yaw = body_pose.map_or(0.0, |p| p.yaw_deg());

        if self.subscribed(Signal::Look) {
            self.camera.handle_look(self.look, dt, body_yaw);
        }
        if let Some(pose) = body_pose {
            self.camera.follow_target(dt, pose.position);
        }

        let scan = self.scanner.scan(
            self.camera.pose(),
            actions,
            Some(self.vehicle),
            &mut self.held,
            world,
            &mut self.events,
        );

        if scare {
            debug!("scare cue");
            self.events.push(ControllerEvent::ScareCue);
        }
        Some(TickReport { actions, scan })
    }

    /// Physics-rate tick, called before the host steps the integrator.
    pub fn on_fixed_tick<W: BodyDynamics + ?Sized>(&mut self, dt_fixed: f64, world: &mut W) {
        if !self.is_enabled() {
            return;
        }
        let hold_point = self.hold_pose();
        self.held.tick_hold(dt_fixed, hold_point, world);
    }

    /// Hold point in world space: the configured camera-local offset, facing
    /// where the camera faces.
    pub fn hold_pose(&self) -> Option<Pose> {
        let camera = self.camera.pose()?;
        let offset = self.hold_offset?;
        Some(Pose::new(camera.transform_point(&offset), camera.rotation))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn vehicle(&self) -> BodyHandle {
        self.vehicle
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn scanner(&self) -> &InteractionScanner {
        &self.scanner
    }

    pub fn held(&self) -> &HeldObjectManager {
        &self.held
    }

    pub fn events(&self) -> &[ControllerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
