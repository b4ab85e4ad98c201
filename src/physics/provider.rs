use nalgebra::{UnitQuaternion, Vector3};

use super::body::BodyHandle;
use super::capability::{CapabilitySet, ObjectId};

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Position and orientation of a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vector3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Local +Z in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Heading about +Y in degrees, 0 along +Z, positive toward +X.
    pub fn yaw_deg(&self) -> f64 {
        let f = self.forward();
        f.x.atan2(f.z).to_degrees()
    }

    /// Transform a point from this pose's local frame to world.
    pub fn transform_point(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.rotation * local
    }
}

/// Nearest object hit by a ray cast.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    pub point: Vector3<f64>,
    pub distance: f64,
    pub capabilities: CapabilitySet,
    /// Physical body of the hit object, if it has one.
    pub body: Option<BodyHandle>,
}

// ---------------------------------------------------------------------------
// Capability provider traits
// ---------------------------------------------------------------------------

/// Force, velocity and position access on rigid bodies.
///
/// Forces and torques are queued and take effect on the next integration
/// step. Impulses and direct writes take effect immediately. Calls with an
/// unknown handle are ignored and reads return `None`.
pub trait BodyDynamics {
    fn apply_force(&mut self, body: BodyHandle, force: Vector3<f64>);
    fn apply_torque(&mut self, body: BodyHandle, torque: Vector3<f64>);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vector3<f64>);

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vector3<f64>>;
    fn angular_velocity(&self, body: BodyHandle) -> Option<Vector3<f64>>;
    fn set_linear_velocity(&mut self, body: BodyHandle, vel: Vector3<f64>);
    fn set_angular_velocity(&mut self, body: BodyHandle, omega: Vector3<f64>);

    fn pose(&self, body: BodyHandle) -> Option<Pose>;
    fn set_position(&mut self, body: BodyHandle, pos: Vector3<f64>);

    fn gravity_enabled(&self, body: BodyHandle) -> Option<bool>;
    fn set_gravity_enabled(&mut self, body: BodyHandle, enabled: bool);

    /// Linear and angular damping plus the X/Z rotation lock.
    fn configure_body(&mut self, body: BodyHandle, linear_damping: f64, angular_damping: f64, lock_tilt: bool);
}

/// Scene queries and dispatch to the behaviours attached to scene objects.
pub trait SceneQuery {
    /// Nearest hit within `max_distance` along `dir` (need not be normalized).
    /// `exclude` skips colliders attached to that body.
    fn ray_cast(
        &self,
        origin: Vector3<f64>,
        dir: Vector3<f64>,
        max_distance: f64,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit>;

    /// Invoke the activation target of `object`. Returns false if it has none.
    fn interact(&mut self, object: ObjectId) -> bool;

    /// Invoke the gaze target of `object`. Returns false if it has none.
    fn looked_at(&mut self, object: ObjectId) -> bool;
}

/// Everything the controller needs from the host world.
pub trait World: BodyDynamics + SceneQuery {}

impl<T: BodyDynamics + SceneQuery> World for T {}
