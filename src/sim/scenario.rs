use nalgebra::Vector3;

use crate::physics::{BodyHandle, Pose, RigidBody, Shape, SimWorld};
use super::script::TimedScript;

// ---------------------------------------------------------------------------
// Scenario: world + vehicle + scripted input
// ---------------------------------------------------------------------------

pub struct Scenario {
    pub name: String,
    pub world: SimWorld,
    pub vehicle: BodyHandle,
    pub camera: Pose,
    pub script: TimedScript,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("objects", &self.world.objects().len())
            .field("vehicle", &self.vehicle)
            .field("script_events", &self.script.len())
            .finish()
    }
}

impl Scenario {
    /// Empty room with the chair at the origin and the camera at its eye
    /// height. The vehicle collider is a sphere resting on the floor.
    pub fn empty(name: impl Into<String>, eye_height: f64) -> Self {
        let mut world = SimWorld::new();
        let radius = 0.5;
        let vehicle = world.add_body(RigidBody::new(Vector3::new(0.0, radius, 0.0), 20.0));
        world.attach("wheelchair", Shape::Sphere { radius }, vehicle);
        let name = name.into();
        Self {
            script: TimedScript::new(name.clone()),
            name,
            world,
            vehicle,
            camera: Pose::at(Vector3::new(0.0, radius + eye_height, 0.0)),
        }
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::controller::Signal;
    use crate::physics::{BodyDynamics, ObjectBuilder, OnLookedAt, Tag};
    use nalgebra::Vector2;

    /// Ward corridor: pull a lever, look at a portrait, pick a mug off a
    /// shelf and throw it, then roll forward and turn left.
    pub fn ward() -> Scenario {
        let mut s = Scenario::empty("Ward", 1.5);
        let eye = s.camera.position.y;
        let w = &mut s.world;

        // Straight ahead
        w.spawn(
            ObjectBuilder::new("lever")
                .sphere(0.25)
                .at(Vector3::new(0.0, eye, 2.0))
                .on_interact(|| {}),
        );
        // 45° right
        let d = 2.5 * std::f64::consts::FRAC_1_SQRT_2;
        w.spawn(
            ObjectBuilder::new("portrait")
                .cuboid(Vector3::new(0.4, 0.4, 0.4))
                .at(Vector3::new(d, eye, d))
                .tag(Tag::LookAt)
                .on_looked_at(OnLookedAt(|| {})),
        );
        // 45° left, on a shelf until picked up
        let d = 2.0 * std::f64::consts::FRAC_1_SQRT_2;
        let mug = w.spawn(
            ObjectBuilder::new("mug")
                .sphere(0.25)
                .at(Vector3::new(-d, eye, d))
                .dynamic(0.3)
                .tag(Tag::PickUp),
        );
        if let Some(body) = w.object(mug).and_then(|o| o.body) {
            w.set_gravity_enabled(body, false);
        }

        let sweep = Vector2::new(4.5, 0.0); // 45°/s at sensitivity 10
        s.script = TimedScript::new("ward")
            .tap(0.3, Signal::Interact)
            .look(0.5, 1.5, sweep)
            .look(2.0, 3.0, -sweep * 2.0)
            .tap(3.3, Signal::Pickup)
            .look(3.5, 4.0, sweep * 2.0)
            .tap(4.5, Signal::Pickup)
            .press(5.0, Signal::LeftWheel)
            .press(5.0, Signal::RightWheel)
            .pushes(5.1, 19, 0.1, 1.0)
            .release(7.0, Signal::RightWheel)
            .release(7.0, Signal::LeftWheel)
            .press(7.5, Signal::LeftWheel)
            .pushes(7.6, 10, 0.1, 1.0)
            .release(8.6, Signal::LeftWheel)
            .tap(9.0, Signal::Jumpscare);
        s
    }

    /// Straight push down an empty corridor.
    pub fn corridor() -> Scenario {
        let mut s = Scenario::empty("Corridor", 1.5);
        s.script = TimedScript::new("corridor")
            .press(0.1, Signal::LeftWheel)
            .press(0.1, Signal::RightWheel)
            .pushes(0.2, 40, 0.1, 1.0)
            .release(4.3, Signal::LeftWheel)
            .release(4.3, Signal::RightWheel);
        s
    }

    pub fn by_name(name: &str) -> Option<Scenario> {
        match name.to_ascii_lowercase().as_str() {
            "ward" => Some(ward()),
            "corridor" => Some(corridor()),
            _ => None,
        }
    }

    pub const NAMES: [&str; 2] = ["ward", "corridor"];
}
