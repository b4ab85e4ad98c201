use nalgebra::Vector3;
use tracing::trace;

use crate::config::MovementConfig;
use crate::physics::{BodyDynamics, BodyHandle};
use super::input::WheelSide;

// ---------------------------------------------------------------------------
// Wheel activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelState {
    pub left_active: bool,
    pub right_active: bool,
}

impl WheelState {
    pub fn both(&self) -> bool {
        self.left_active && self.right_active
    }

    /// The single active wheel, if exactly one is held.
    pub fn single(&self) -> Option<WheelSide> {
        match (self.left_active, self.right_active) {
            (true, false) => Some(WheelSide::Left),
            (false, true) => Some(WheelSide::Right),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement pulse counter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseCounter {
    count: u32,
    threshold: u32,
}

impl PulseCounter {
    pub fn new(threshold: u32) -> Self {
        Self { count: 0, threshold: threshold.max(1) }
    }

    /// Saturates at the threshold until the next `check`.
    pub fn increment(&mut self) {
        self.count = (self.count + 1).min(self.threshold);
    }

    /// True (and reset to 0) once the threshold is reached.
    pub fn check(&mut self) -> bool {
        if self.count >= self.threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

// ---------------------------------------------------------------------------
// Push outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PushOutcome {
    /// Below the scroll deadzone; nothing counted.
    Ignored,
    /// Counted, but no wheel held.
    NoWheels,
    /// Counted, both wheels held but already above `max_speed`.
    SpeedCapped,
    /// Counted, but the world has no such body.
    NoBody,
    Forward { force: Vector3<f64>, pulse: bool },
    /// `torque` is `None` when the turn-speed cap suppressed it.
    Turn { side: WheelSide, torque: Option<Vector3<f64>>, pulse: bool },
}

impl PushOutcome {
    pub fn pulsed(&self) -> bool {
        matches!(
            self,
            PushOutcome::Forward { pulse: true, .. } | PushOutcome::Turn { pulse: true, .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Locomotion controller
// ---------------------------------------------------------------------------

/// Maps scroll pushes to forward force (both wheels) or differential torque
/// (one wheel). Forces are queued on the body and act on the next fixed step.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    pub config: MovementConfig,
    wheels: WheelState,
    pulses: PulseCounter,
}

impl LocomotionController {
    pub fn new(config: MovementConfig) -> Self {
        let pulses = PulseCounter::new(config.pulse_threshold);
        Self { config, wheels: WheelState::default(), pulses }
    }

    pub fn set_wheel(&mut self, side: WheelSide, active: bool) {
        match side {
            WheelSide::Left => self.wheels.left_active = active,
            WheelSide::Right => self.wheels.right_active = active,
        }
    }

    pub fn release_wheels(&mut self) {
        self.wheels = WheelState::default();
    }

    pub fn wheels(&self) -> WheelState {
        self.wheels
    }

    pub fn pulse_counter(&self) -> &PulseCounter {
        &self.pulses
    }

    pub fn on_scroll_push<W: BodyDynamics + ?Sized>(
        &mut self,
        scroll: f64,
        body: BodyHandle,
        world: &mut W,
    ) -> PushOutcome {
        if scroll.abs() < self.config.scroll_deadzone {
            return PushOutcome::Ignored;
        }
        self.pulses.increment();

        let speed = world.linear_velocity(body).map_or(0.0, |v| v.norm());
        if self.wheels.both() && speed > self.config.max_speed {
            trace!(speed, max = self.config.max_speed, "forward push capped");
            return PushOutcome::SpeedCapped;
        }

        if self.wheels.both() {
            let Some(pose) = world.pose(body) else {
                return PushOutcome::NoBody;
            };
            let force = pose.forward() * scroll * self.config.wheel_force;
            world.apply_force(body, force);
            let pulse = self.pulses.check();
            trace!(scroll, force = force.norm(), pulse, "forward push");
            return PushOutcome::Forward { force, pulse };
        }

        let Some(side) = self.wheels.single() else {
            return PushOutcome::NoWheels;
        };
        let sign = match side {
            WheelSide::Left => 1.0,
            WheelSide::Right => -1.0,
        };
        let yaw_rate = world.angular_velocity(body).map_or(0.0, |w| w.y);
        let torque = if yaw_rate.abs() < self.config.max_turn_speed {
            let t = Vector3::y() * (sign * scroll * self.config.turn_force);
            world.apply_torque(body, t);
            Some(t)
        } else {
            None
        };
        let pulse = self.pulses.check();
        trace!(scroll, ?side, yaw_rate, applied = torque.is_some(), pulse, "turn push");
        PushOutcome::Turn { side, torque, pulse }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
