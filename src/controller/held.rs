use nalgebra::Vector3;
use tracing::debug;

use crate::config::HoldConfig;
use crate::physics::{BodyDynamics, BodyHandle, Pose};
use super::events::ControllerEvent;

// ---------------------------------------------------------------------------
// Held object state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeldState {
    #[default]
    Free,
    Held(BodyHandle),
}

/// Carries at most one body: pickup (gravity off, velocities zeroed),
/// kinematic following on fixed ticks, drop/throw (gravity on, impulse).
#[derive(Debug, Clone)]
pub struct HeldObjectManager {
    pub config: HoldConfig,
    state: HeldState,
}

impl HeldObjectManager {
    pub fn new(config: HoldConfig) -> Self {
        Self { config, state: HeldState::Free }
    }

    pub fn state(&self) -> HeldState {
        self.state
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, HeldState::Held(_))
    }

    pub fn held_body(&self) -> Option<BodyHandle> {
        match self.state {
            HeldState::Held(b) => Some(b),
            HeldState::Free => None,
        }
    }

    /// Free → Held. Returns false (and changes nothing) when already holding.
    pub fn pick_up<W: BodyDynamics + ?Sized>(
        &mut self,
        body: BodyHandle,
        world: &mut W,
        events: &mut Vec<ControllerEvent>,
    ) -> bool {
        if self.is_holding() {
            return false;
        }
        world.set_gravity_enabled(body, false);
        world.set_linear_velocity(body, Vector3::zeros());
        world.set_angular_velocity(body, Vector3::zeros());
        self.state = HeldState::Held(body);
        debug!(?body, "picked up");
        events.push(ControllerEvent::PickedUp { body });
        true
    }

    /// Held → Free, throwing along `look_forward` when a camera is present.
    /// No-op when free.
    pub fn drop<W: BodyDynamics + ?Sized>(
        &mut self,
        look_forward: Option<Vector3<f64>>,
        world: &mut W,
        events: &mut Vec<ControllerEvent>,
    ) -> bool {
        let HeldState::Held(body) = self.state else {
            return false;
        };
        world.set_gravity_enabled(body, true);
        let impulse = look_forward
            .and_then(|f| f.try_normalize(1e-12))
            .map(|dir| dir * self.config.throw_force);
        if let Some(j) = impulse {
            world.apply_impulse(body, j);
        }
        self.state = HeldState::Free;
        debug!(?body, thrown = impulse.is_some(), "dropped");
        events.push(ControllerEvent::Dropped { body, impulse });
        true
    }

    /// Point `hold_distance` in front of the hold point.
    pub fn hold_target(&self, hold_point: &Pose) -> Vector3<f64> {
        hold_point.position + hold_point.forward() * self.config.hold_distance
    }

    /// Fixed-tick kinematic follow: position is set directly, not forced.
    pub fn tick_hold<W: BodyDynamics + ?Sized>(&mut self, dt: f64, hold_point: Option<Pose>, world: &mut W) {
        let (HeldState::Held(body), Some(anchor)) = (self.state, hold_point) else {
            return;
        };
        let Some(pose) = world.pose(body) else { return };
        let target = self.hold_target(&anchor);
        let t = (dt * self.config.follow_speed).clamp(0.0, 1.0);
        world.set_position(body, pose.position.lerp(&target, t));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ObjectBuilder, SimWorld};

    fn setup() -> (HeldObjectManager, SimWorld, BodyHandle) {
        let mut world = SimWorld::new();
        let id = world.spawn(ObjectBuilder::new("mug").sphere(0.1).at(Vector3::new(0.0, 1.0, 2.0)).dynamic(0.5));
        let body = world.object(id).unwrap().body.unwrap();
        world.set_linear_velocity(body, Vector3::new(1.0, -2.0, 0.5));
        world.set_angular_velocity(body, Vector3::new(0.0, 3.0, 0.0));
        (HeldObjectManager::new(HoldConfig::default()), world, body)
    }

    #[test]
    fn pickup_disables_gravity_and_zeroes_velocity() {
        let (mut held, mut world, body) = setup();
        let mut events = vec![];
        assert!(held.pick_up(body, &mut world, &mut events));
        assert_eq!(held.state(), HeldState::Held(body));
        assert_eq!(world.gravity_enabled(body), Some(false));
        assert_eq!(world.linear_velocity(body), Some(Vector3::zeros()));
        assert_eq!(world.angular_velocity(body), Some(Vector3::zeros()));
        assert_eq!(events, vec![ControllerEvent::PickedUp { body }]);
    }

    #[test]
    fn second_pickup_is_refused() {
        let (mut held, mut world, body) = setup();
        let other = world.spawn(ObjectBuilder::new("book").dynamic(1.0));
        let other = world.object(other).unwrap().body.unwrap();
        let mut events = vec![];
        held.pick_up(body, &mut world, &mut events);
        assert!(!held.pick_up(other, &mut world, &mut events));
        assert_eq!(held.held_body(), Some(body));
        assert_eq!(world.gravity_enabled(other), Some(true));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn drop_throws_along_look_with_throw_force() {
        let (mut held, mut world, body) = setup();
        let mut events = vec![];
        held.pick_up(body, &mut world, &mut events);
        let look = Vector3::new(0.0, 0.0, 4.0);
        assert!(held.drop(Some(look), &mut world, &mut events));
        assert_eq!(held.state(), HeldState::Free);
        assert_eq!(world.gravity_enabled(body), Some(true));

        let ControllerEvent::Dropped { impulse: Some(j), .. } = events[1] else {
            panic!("expected throw, got {:?}", events[1]);
        };
        assert!((j.norm() - 2.0).abs() < 1e-12);
        assert!((j.normalize() - Vector3::z()).norm() < 1e-12);
        // mass 0.5 → Δv = 4 m/s
        assert!((world.linear_velocity(body).unwrap().z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn drop_without_camera_releases_without_impulse() {
        let (mut held, mut world, body) = setup();
        let mut events = vec![];
        held.pick_up(body, &mut world, &mut events);
        assert!(held.drop(None, &mut world, &mut events));
        assert_eq!(events[1], ControllerEvent::Dropped { body, impulse: None });
        assert_eq!(world.linear_velocity(body), Some(Vector3::zeros()));
    }

    #[test]
    fn drop_when_free_is_noop() {
        let (mut held, mut world, _) = setup();
        let mut events = vec![];
        assert!(!held.drop(Some(Vector3::z()), &mut world, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn tick_hold_lerps_toward_target() {
        let (mut held, mut world, body) = setup();
        let mut events = vec![];
        held.pick_up(body, &mut world, &mut events);
        let anchor = Pose::at(Vector3::new(0.0, 1.0, 0.0));
        let target = held.hold_target(&anchor);
        assert_eq!(target, Vector3::new(0.0, 1.0, 2.0));

        world.set_position(body, Vector3::new(1.0, 1.0, 2.0));
        held.tick_hold(0.02, Some(anchor), &mut world);
        // factor 0.02 * 10 = 0.2
        let p = world.pose(body).unwrap().position;
        assert!((p.x - 0.8).abs() < 1e-12);

        for _ in 0..100 {
            held.tick_hold(0.02, Some(anchor), &mut world);
        }
        assert!((world.pose(body).unwrap().position - target).norm() < 1e-6);
    }

    #[test]
    fn tick_hold_needs_hold_point_and_held_body() {
        let (mut held, mut world, body) = setup();
        let start = world.pose(body).unwrap().position;
        held.tick_hold(0.02, Some(Pose::at(Vector3::zeros())), &mut world);
        assert_eq!(world.pose(body).unwrap().position, start, "free: nothing moves");

        let mut events = vec![];
        held.pick_up(body, &mut world, &mut events);
        held.tick_hold(0.02, None, &mut world);
        assert_eq!(world.pose(body).unwrap().position, start, "no hold point: skipped");
    }
}
