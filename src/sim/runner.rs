use nalgebra::Vector3;
use tracing::info;

use crate::config::ControllerConfig;
use crate::controller::{ControllerError, InputHost, MemoryHost, TimedEvent, WheelchairController};
use crate::physics::SimWorld;
use super::scenario::Scenario;
use super::script::InputScript;

// ---------------------------------------------------------------------------
// Session configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub duration: f64,      // s
    pub frame_dt: f64,      // s, nominal variable tick
    pub frame_jitter: f64,  // fraction of frame_dt, deterministic
    pub fixed_dt: f64,      // s, physics step
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { duration: 10.0, frame_dt: 1.0 / 60.0, frame_jitter: 0.25, fixed_dt: 0.02 }
    }
}

impl SessionConfig {
    /// Length of variable frame `i`.
    pub fn frame(&self, i: usize) -> f64 {
        let wobble = (i as f64 * 1.37).sin();
        (self.frame_dt * (1.0 + self.frame_jitter * wobble)).max(1e-6)
    }
}

// ---------------------------------------------------------------------------
// Recorded session
// ---------------------------------------------------------------------------

/// Telemetry sampled after every variable tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub position: Vector3<f64>,
    pub yaw_deg: f64,
    pub speed: f64,
    pub camera_pitch: f64,
    pub camera_yaw: f64,
    pub holding: bool,
    pub prompt_visible: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub samples: Vec<Sample>,
    pub events: Vec<TimedEvent>,
    pub frames: usize,
    pub fixed_steps: usize,
}

impl Session {
    pub fn count(&self, label: &str) -> usize {
        self.events.iter().filter(|e| e.event.label() == label).count()
    }

    pub fn distance_travelled(&self) -> f64 {
        self.samples.windows(2).map(|w| (w[1].position - w[0].position).norm()).sum()
    }
}

fn sample(time: f64, controller: &WheelchairController, world: &SimWorld) -> Sample {
    let (position, yaw_deg, speed) = world
        .body(controller.vehicle())
        .map_or((Vector3::zeros(), 0.0, 0.0), |b| (b.pos, b.yaw_deg(), b.speed()));
    let o = controller.camera().orientation();
    Sample {
        time,
        position,
        yaw_deg,
        speed,
        camera_pitch: o.pitch,
        camera_yaw: o.yaw,
        holding: controller.held().is_holding(),
        prompt_visible: !controller.scanner().prompt().is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// Drive `controller` through `script` for `config.duration` seconds.
///
/// Each frame: deliver scripted input, run the fixed ticks the accumulator
/// owes (controller first, then the world integrator), then the variable
/// tick. The controller is initialized on entry and shut down on exit.
pub fn run_session<H: InputHost + ?Sized>(
    controller: &mut WheelchairController,
    world: &mut SimWorld,
    host: &mut H,
    script: &mut dyn InputScript,
    config: &SessionConfig,
) -> Result<Session, ControllerError> {
    controller.initialize(host, world)?;
    info!(script = script.name(), duration = config.duration, "session started");

    let capacity = (config.duration / config.frame_dt) as usize + 2;
    let mut samples = Vec::with_capacity(capacity.min(200_000));
    let mut events = vec![];
    samples.push(sample(0.0, controller, world));

    let mut time = 0.0;
    let mut accumulator = 0.0;
    let mut frames = 0;
    let mut fixed_steps = 0;

    while time < config.duration {
        let dt = config.frame(frames);

        for input in script.poll(time, time + dt) {
            controller.handle_input(input, world);
        }

        accumulator += dt;
        while accumulator >= config.fixed_dt {
            controller.on_fixed_tick(config.fixed_dt, world);
            world.step(config.fixed_dt);
            accumulator -= config.fixed_dt;
            fixed_steps += 1;
        }

        controller.on_variable_tick(dt, world);
        time += dt;
        frames += 1;

        events.extend(controller.drain_events().into_iter().map(|event| TimedEvent { time, event }));
        samples.push(sample(time, controller, world));
    }

    controller.shutdown(host);
    info!(frames, fixed_steps, events = events.len(), "session finished");

    Ok(Session { name: script.name().to_string(), samples, events, frames, fixed_steps })
}

/// Run a scenario against a fresh controller and a host with every signal
/// bound.
pub fn run_scenario(
    mut scenario: Scenario,
    controller_config: &ControllerConfig,
    config: &SessionConfig,
) -> Result<(Session, SimWorld), ControllerError> {
    let mut controller =
        WheelchairController::new(controller_config.clone(), scenario.vehicle).with_camera(scenario.camera);
    let mut host = MemoryHost::all_bound();
    let mut session = run_session(&mut controller, &mut scenario.world, &mut host, &mut scenario.script, config)?;
    session.name = scenario.name;
    Ok((session, scenario.world))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
