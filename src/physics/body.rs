use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Index of a rigid body inside a [`SimWorld`](super::SimWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

// ---------------------------------------------------------------------------
// Collision shape
// ---------------------------------------------------------------------------

/// Collider attached to a scene object. Boxes stay axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f64 },
    Cuboid { half_extents: Vector3<f64> },
}

impl Shape {
    /// Distance from the centre to the lowest point of the shape.
    pub fn bottom_offset(&self) -> f64 {
        match self {
            Shape::Sphere { radius } => *radius,
            Shape::Cuboid { half_extents } => half_extents.y,
        }
    }
}

// ---------------------------------------------------------------------------
// Rigid body state
// ---------------------------------------------------------------------------

/// Dynamic state plus mass properties of one body.
/// Frame: +Y up, +Z forward. Positive yaw turns +Z toward +X.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub pos: Vector3<f64>,              // m, world
    pub vel: Vector3<f64>,              // m/s, world
    pub rot: UnitQuaternion<f64>,       // body→world rotation
    pub omega: Vector3<f64>,            // rad/s, world frame angular velocity
    pub mass: f64,                      // kg
    pub inertia: Vector3<f64>,          // principal moments, kg·m^2
    pub linear_damping: f64,            // 1/s
    pub angular_damping: f64,           // 1/s
    pub use_gravity: bool,
    pub lock_tilt: bool,                // freeze rotation about X and Z
    pub ground_offset: f64,             // centre height above the lowest point, m
    pub(crate) force: Vector3<f64>,     // accumulated until next step, N
    pub(crate) torque: Vector3<f64>,    // accumulated until next step, N·m
}

impl RigidBody {
    pub fn new(pos: Vector3<f64>, mass: f64) -> Self {
        Self {
            pos,
            vel: Vector3::zeros(),
            rot: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            mass,
            inertia: Vector3::repeat(mass * 0.4),
            linear_damping: 0.0,
            angular_damping: 0.05,
            use_gravity: true,
            lock_tilt: false,
            ground_offset: 0.0,
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }

    /// Body +Z axis in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.rot * Vector3::z()
    }

    /// Heading about the up axis, degrees. Zero faces +Z.
    pub fn yaw_deg(&self) -> f64 {
        let f = self.forward();
        f.x.atan2(f.z).to_degrees()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Queued force and torque, cleared by the integrator.
    pub fn pending(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.force, self.torque)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
