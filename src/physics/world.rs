use nalgebra::{UnitQuaternion, Vector3};

use super::body::{BodyHandle, RigidBody, Shape};
use super::capability::{ActivationTarget, CapabilitySet, GazeTarget, ObjectId, Tag};
use super::gravity::{damping_factor, gravity_accel};
use super::provider::{BodyDynamics, Pose, RayHit, SceneQuery};
use super::ray;

// ---------------------------------------------------------------------------
// Scene objects
// ---------------------------------------------------------------------------

/// Collider with optional body, tags and attached behaviours.
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: Shape,
    pub body: Option<BodyHandle>,
    /// World position for static objects; bodies carry their own.
    pub position: Vector3<f64>,
    pub tags: Vec<Tag>,
    activation: Option<Box<dyn ActivationTarget>>,
    gaze: Option<Box<dyn GazeTarget>>,
}

impl SceneObject {
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::classify(self.activation.is_some(), self.gaze.is_some(), &self.tags)
    }
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("body", &self.body)
            .field("tags", &self.tags)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Object builder
// ---------------------------------------------------------------------------

pub struct ObjectBuilder {
    name: String,
    shape: Shape,
    position: Vector3<f64>,
    mass: Option<f64>,
    tags: Vec<Tag>,
    activation: Option<Box<dyn ActivationTarget>>,
    gaze: Option<Box<dyn GazeTarget>>,
}

impl ObjectBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Sphere { radius: 0.5 },
            position: Vector3::zeros(),
            mass: None,
            tags: vec![],
            activation: None,
            gaze: None,
        }
    }

    pub fn sphere(mut self, radius: f64) -> Self {
        self.shape = Shape::Sphere { radius };
        self
    }

    pub fn cuboid(mut self, half_extents: Vector3<f64>) -> Self {
        self.shape = Shape::Cuboid { half_extents };
        self
    }

    pub fn at(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Give the object a dynamic body of this mass.
    pub fn dynamic(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn on_interact(mut self, target: impl ActivationTarget + 'static) -> Self {
        self.activation = Some(Box::new(target));
        self
    }

    pub fn on_looked_at(mut self, target: impl GazeTarget + 'static) -> Self {
        self.gaze = Some(Box::new(target));
        self
    }
}

// ---------------------------------------------------------------------------
// Reference world
// ---------------------------------------------------------------------------

/// Minimal deterministic physics world: rigid bodies, uniform gravity,
/// damping, ground plane at y = 0 and ray casts against object colliders.
/// Bodies do not collide with each other.
pub struct SimWorld {
    pub time: f64,
    pub ground: bool,
    bodies: Vec<RigidBody>,
    objects: Vec<SceneObject>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        Self { time: 0.0, ground: true, bodies: vec![], objects: vec![] }
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    /// Insert an object, creating its body when the builder is dynamic.
    pub fn spawn(&mut self, builder: ObjectBuilder) -> ObjectId {
        let body = builder.mass.map(|mass| {
            let mut rb = RigidBody::new(builder.position, mass);
            rb.ground_offset = builder.shape.bottom_offset();
            if let Shape::Sphere { radius } = builder.shape {
                rb.inertia = Vector3::repeat(0.4 * mass * radius * radius);
            }
            self.add_body(rb)
        });
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            name: builder.name,
            shape: builder.shape,
            body,
            position: builder.position,
            tags: builder.tags,
            activation: builder.activation,
            gaze: builder.gaze,
        });
        id
    }

    /// Attach a collider to an existing body (e.g. the vehicle).
    pub fn attach(&mut self, name: impl Into<String>, shape: Shape, body: BodyHandle) -> ObjectId {
        let position = self.body(body).map_or_else(Vector3::zeros, |b| b.pos);
        if let Some(rb) = self.body_mut(body) {
            rb.ground_offset = shape.bottom_offset();
        }
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            shape,
            body: Some(body),
            position,
            tags: vec![],
            activation: None,
            gaze: None,
        });
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Current world position of an object's collider.
    pub fn object_position(&self, id: ObjectId) -> Option<Vector3<f64>> {
        let obj = self.object(id)?;
        match obj.body {
            Some(h) => self.body(h).map(|b| b.pos),
            None => Some(obj.position),
        }
    }

    /// Advance all bodies by `dt` (semi-implicit Euler), consuming queued
    /// forces and torques.
    pub fn step(&mut self, dt: f64) {
        for b in &mut self.bodies {
            let mut accel = b.force / b.mass;
            if b.use_gravity {
                accel += gravity_accel();
            }
            b.vel = (b.vel + accel * dt) * damping_factor(b.linear_damping, dt);

            let alpha = b.torque.component_div(&b.inertia);
            b.omega = (b.omega + alpha * dt) * damping_factor(b.angular_damping, dt);
            if b.lock_tilt {
                b.omega.x = 0.0;
                b.omega.z = 0.0;
            }

            b.pos += b.vel * dt;
            b.rot = UnitQuaternion::from_scaled_axis(b.omega * dt) * b.rot;

            // Ground contact: no penetration, no bounce
            if self.ground && b.pos.y < b.ground_offset {
                b.pos.y = b.ground_offset;
                if b.vel.y < 0.0 {
                    b.vel.y = 0.0;
                }
            }

            b.force = Vector3::zeros();
            b.torque = Vector3::zeros();
        }
        self.time += dt;
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0 as usize)
    }
}

// ---------------------------------------------------------------------------
// Capability provider impls
// ---------------------------------------------------------------------------

impl BodyDynamics for SimWorld {
    fn apply_force(&mut self, body: BodyHandle, force: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.force += force;
        }
    }

    fn apply_torque(&mut self, body: BodyHandle, torque: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.torque += torque;
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.vel += impulse / b.mass;
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vector3<f64>> {
        self.body(body).map(|b| b.vel)
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<Vector3<f64>> {
        self.body(body).map(|b| b.omega)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, vel: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.vel = vel;
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.omega = omega;
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.body(body).map(|b| Pose::new(b.pos, b.rot))
    }

    fn set_position(&mut self, body: BodyHandle, pos: Vector3<f64>) {
        if let Some(b) = self.body_mut(body) {
            b.pos = pos;
        }
    }

    fn gravity_enabled(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(|b| b.use_gravity)
    }

    fn set_gravity_enabled(&mut self, body: BodyHandle, enabled: bool) {
        if let Some(b) = self.body_mut(body) {
            b.use_gravity = enabled;
        }
    }

    fn configure_body(&mut self, body: BodyHandle, linear_damping: f64, angular_damping: f64, lock_tilt: bool) {
        if let Some(b) = self.body_mut(body) {
            b.linear_damping = linear_damping;
            b.angular_damping = angular_damping;
            b.lock_tilt = lock_tilt;
        }
    }
}

impl SceneQuery for SimWorld {
    fn ray_cast(
        &self,
        origin: Vector3<f64>,
        dir: Vector3<f64>,
        max_distance: f64,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        if max_distance <= 0.0 {
            return None;
        }
        let dir = dir.try_normalize(1e-12)?;

        let mut best: Option<(f64, &SceneObject)> = None;
        for obj in &self.objects {
            if obj.body.is_some() && obj.body == exclude {
                continue;
            }
            let Some(center) = self.object_position(obj.id) else { continue };
            let Some(t) = ray::intersect(&origin, &dir, &obj.shape, &center) else { continue };
            if t > max_distance {
                continue;
            }
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, obj));
            }
        }

        best.map(|(t, obj)| RayHit {
            object: obj.id,
            point: origin + dir * t,
            distance: t,
            capabilities: obj.capabilities(),
            body: obj.body,
        })
    }

    fn interact(&mut self, object: ObjectId) -> bool {
        match self.object_mut(object).and_then(|o| o.activation.as_mut()) {
            Some(target) => {
                target.interact();
                true
            }
            None => false,
        }
    }

    fn looked_at(&mut self, object: ObjectId) -> bool {
        match self.object_mut(object).and_then(|o| o.gaze.as_mut()) {
            Some(target) => {
                target.looked_at();
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
