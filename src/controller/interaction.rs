use tracing::debug;

use crate::config::InteractionConfig;
use crate::physics::{BodyHandle, Capability, ObjectId, Pose, RayHit, World};
use super::events::{ControllerEvent, PromptSink};
use super::held::HeldObjectManager;

/// Momentary actions sampled for the current variable tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionEdges {
    pub interact: bool,
    pub pickup: bool,
}

/// What one scan did.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Pickup pressed while holding: dropped without casting.
    Dropped,
    /// No camera attached; nothing cast.
    NoCamera,
    Miss,
    Hit(RayHit),
}

/// Per-frame forward ray from the camera, dispatching on the capabilities of
/// whatever it hits.
pub struct InteractionScanner {
    pub config: InteractionConfig,
    prompt: String,
    sink: Option<Box<dyn PromptSink>>,
    last_gazed: Option<ObjectId>,
}

impl std::fmt::Debug for InteractionScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionScanner")
            .field("config", &self.config)
            .field("prompt", &self.prompt)
            .field("has_sink", &self.sink.is_some())
            .field("last_gazed", &self.last_gazed)
            .finish()
    }
}

impl InteractionScanner {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config, prompt: String::new(), sink: None, last_gazed: None }
    }

    pub fn set_prompt_sink(&mut self, sink: Box<dyn PromptSink>) {
        self.sink = Some(sink);
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn last_gazed(&self) -> Option<ObjectId> {
        self.last_gazed
    }

    /// Clear the prompt, pushing the empty text to the sink unconditionally.
    pub fn reset_prompt(&mut self) {
        self.prompt.clear();
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text("");
        }
    }

    fn set_prompt(&mut self, show: bool) {
        let text = if show { self.config.prompt.as_str() } else { "" };
        if self.prompt == text {
            return;
        }
        self.prompt = text.to_string();
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(text);
        }
    }

    /// Run one scan. `exclude` is the vehicle body so the ray starts clear of it.
    pub fn scan<W: World + ?Sized>(
        &mut self,
        camera: Option<Pose>,
        actions: ActionEdges,
        exclude: Option<BodyHandle>,
        held: &mut HeldObjectManager,
        world: &mut W,
        events: &mut Vec<ControllerEvent>,
    ) -> ScanOutcome {
        if actions.pickup && held.is_holding() {
            held.drop(camera.map(|c| c.forward()), world, events);
            return ScanOutcome::Dropped;
        }

        let Some(camera) = camera else {
            return ScanOutcome::NoCamera;
        };

        let Some(hit) = world.ray_cast(camera.position, camera.forward(), self.config.detection_range, exclude) else {
            self.last_gazed = None;
            self.set_prompt(false);
            return ScanOutcome::Miss;
        };

        let caps = hit.capabilities;
        self.set_prompt(caps.contains(Capability::Activatable));

        if caps.contains(Capability::Activatable) && actions.interact {
            debug!(object = %hit.object, distance = hit.distance, "interacting");
            if world.interact(hit.object) {
                events.push(ControllerEvent::Interacted { object: hit.object });
            }
        }

        if caps.contains(Capability::Gazeable) {
            if self.last_gazed != Some(hit.object) {
                world.looked_at(hit.object);
                self.last_gazed = Some(hit.object);
                debug!(object = %hit.object, "gaze started");
                events.push(ControllerEvent::GazeStarted { object: hit.object });
            }
        } else {
            self.last_gazed = None;
        }

        if actions.pickup && !held.is_holding() && caps.contains(Capability::Pickupable) {
            if let Some(body) = hit.body {
                held.pick_up(body, world, events);
            }
        }

        ScanOutcome::Hit(hit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HoldConfig;
    use crate::controller::held::HeldState;
    use crate::physics::{BodyDynamics, ObjectBuilder, OnLookedAt, SimWorld, Tag};
    use nalgebra::Vector3;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const PRESS_PICKUP: ActionEdges = ActionEdges { interact: false, pickup: true };
    const PRESS_INTERACT: ActionEdges = ActionEdges { interact: true, pickup: false };
    const IDLE: ActionEdges = ActionEdges { interact: false, pickup: false };

    struct Fixture {
        world: SimWorld,
        scanner: InteractionScanner,
        held: HeldObjectManager,
        events: Vec<ControllerEvent>,
        camera: Pose,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: SimWorld::new(),
                scanner: InteractionScanner::new(InteractionConfig::default()),
                held: HeldObjectManager::new(HoldConfig::default()),
                events: vec![],
                camera: Pose::at(Vector3::new(0.0, 1.5, 0.0)),
            }
        }

        fn scan(&mut self, actions: ActionEdges) -> ScanOutcome {
            self.scanner.scan(Some(self.camera), actions, None, &mut self.held, &mut self.world, &mut self.events)
        }

        fn look_away(&mut self) {
            self.camera.rotation = crate::controller::camera::euler_rotation(0.0, 180.0);
        }

        fn look_ahead(&mut self) {
            self.camera.rotation = crate::controller::camera::euler_rotation(0.0, 0.0);
        }
    }

    #[test]
    fn miss_clears_prompt_and_gaze() {
        let mut f = Fixture::new();
        let gaze = f.world.spawn(
            ObjectBuilder::new("portrait")
                .at(Vector3::new(0.0, 1.5, 2.0))
                .tag(Tag::LookAt)
                .on_looked_at(OnLookedAt(|| {}))
                .on_interact(|| {}),
        );
        assert!(matches!(f.scan(IDLE), ScanOutcome::Hit(_)));
        assert_eq!(f.scanner.last_gazed(), Some(gaze));
        assert!(!f.scanner.prompt().is_empty());

        f.look_away();
        assert_eq!(f.scan(IDLE), ScanOutcome::Miss);
        assert_eq!(f.scanner.prompt(), "");
        assert_eq!(f.scanner.last_gazed(), None);
    }

    #[test]
    fn prompt_only_for_activatable_hits() {
        let mut f = Fixture::new();
        f.world.spawn(ObjectBuilder::new("crate").at(Vector3::new(0.0, 1.5, 2.0)));
        f.scan(IDLE);
        assert_eq!(f.scanner.prompt(), "");

        let mut g = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        g.scanner.set_prompt_sink(Box::new(log.clone()));
        g.world.spawn(ObjectBuilder::new("lever").at(Vector3::new(0.0, 1.5, 2.0)).on_interact(|| {}));
        g.scan(IDLE);
        g.scan(IDLE);
        assert_eq!(g.scanner.prompt(), "Interact\n   (E)");
        assert_eq!(log.borrow().len(), 1, "sink updated on change only");
    }

    #[test]
    fn interact_requires_press_and_capability() {
        let count = Rc::new(Cell::new(0));
        let mut f = Fixture::new();
        let c = count.clone();
        let lever = f.world.spawn(
            ObjectBuilder::new("lever").at(Vector3::new(0.0, 1.5, 2.0)).on_interact(move || c.set(c.get() + 1)),
        );
        f.scan(IDLE);
        assert_eq!(count.get(), 0);
        f.scan(PRESS_INTERACT);
        assert_eq!(count.get(), 1);
        assert_eq!(f.events, vec![ControllerEvent::Interacted { object: lever }]);
    }

    #[test]
    fn out_of_range_is_a_miss() {
        let count = Rc::new(Cell::new(0));
        let mut f = Fixture::new();
        let c = count.clone();
        f.world.spawn(
            ObjectBuilder::new("lever").at(Vector3::new(0.0, 1.5, 8.0)).on_interact(move || c.set(c.get() + 1)),
        );
        assert_eq!(f.scan(PRESS_INTERACT), ScanOutcome::Miss);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn gaze_fires_once_per_streak() {
        let count = Rc::new(Cell::new(0));
        let mut f = Fixture::new();
        let c = count.clone();
        f.world.spawn(
            ObjectBuilder::new("portrait")
                .at(Vector3::new(0.0, 1.5, 2.0))
                .tag(Tag::LookAt)
                .on_looked_at(OnLookedAt(move || c.set(c.get() + 1))),
        );
        for _ in 0..5 {
            f.scan(IDLE);
        }
        assert_eq!(count.get(), 1);

        f.look_away();
        f.scan(IDLE);
        f.look_ahead();
        f.scan(IDLE);
        f.scan(IDLE);
        assert_eq!(count.get(), 2, "re-fires after the streak broke");
    }

    #[test]
    fn gaze_refires_after_non_gaze_hit() {
        let count = Rc::new(Cell::new(0));
        let mut f = Fixture::new();
        let c = count.clone();
        f.world.spawn(
            ObjectBuilder::new("portrait")
                .at(Vector3::new(0.0, 1.5, 2.5))
                .tag(Tag::LookAt)
                .on_looked_at(OnLookedAt(move || c.set(c.get() + 1))),
        );
        f.scan(IDLE);
        // A plain object slides in front of the portrait...
        let blocker = f.world.spawn(ObjectBuilder::new("cart").sphere(0.2).at(Vector3::new(0.0, 1.5, 1.0)).dynamic(5.0));
        let h = f.world.object(blocker).unwrap().body.unwrap();
        f.scan(IDLE);
        assert_eq!(f.scanner.last_gazed(), None);
        // ...and away again.
        f.world.set_position(h, Vector3::new(5.0, 1.5, 1.0));
        f.scan(IDLE);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn tag_without_gaze_component_does_not_fire() {
        let mut f = Fixture::new();
        f.world.spawn(ObjectBuilder::new("poster").at(Vector3::new(0.0, 1.5, 2.0)).tag(Tag::LookAt));
        f.scan(IDLE);
        assert_eq!(f.scanner.last_gazed(), None);
        assert!(f.events.is_empty());
    }

    #[test]
    fn pickup_needs_tag_and_body() {
        let mut f = Fixture::new();
        // tagged but static: no body
        f.world.spawn(ObjectBuilder::new("statue").at(Vector3::new(0.0, 1.5, 2.0)).tag(Tag::PickUp));
        f.scan(PRESS_PICKUP);
        assert_eq!(f.held.state(), HeldState::Free);

        // body but untagged
        let mut g = Fixture::new();
        g.world.spawn(ObjectBuilder::new("boulder").at(Vector3::new(0.0, 1.5, 2.0)).dynamic(50.0));
        g.scan(PRESS_PICKUP);
        assert_eq!(g.held.state(), HeldState::Free);
    }

    #[test]
    fn pickup_then_drop_anywhere() {
        let mut f = Fixture::new();
        let id = f.world.spawn(
            ObjectBuilder::new("mug").sphere(0.2).at(Vector3::new(0.0, 1.5, 2.0)).dynamic(0.5).tag(Tag::PickUp),
        );
        let body = f.world.object(id).unwrap().body.unwrap();

        f.scan(PRESS_PICKUP);
        assert_eq!(f.held.state(), HeldState::Held(body));
        assert_eq!(f.world.gravity_enabled(body), Some(false));

        // Pressing pickup again while looking at nothing still drops.
        f.look_away();
        assert_eq!(f.scan(PRESS_PICKUP), ScanOutcome::Dropped);
        assert_eq!(f.held.state(), HeldState::Free);
        assert_eq!(f.world.gravity_enabled(body), Some(true));

        let Some(ControllerEvent::Dropped { impulse: Some(j), .. }) = f.events.last().cloned() else {
            panic!("expected throw event");
        };
        assert!((j.norm() - 2.0).abs() < 1e-12);
        assert!(j.z < 0.0, "thrown along the look direction");
    }

    #[test]
    fn drop_press_skips_ray_side_effects() {
        let count = Rc::new(Cell::new(0));
        let mut f = Fixture::new();
        let c = count.clone();
        let id = f.world.spawn(
            ObjectBuilder::new("mug")
                .at(Vector3::new(0.0, 1.5, 2.0))
                .dynamic(0.5)
                .tag(Tag::PickUp)
                .on_interact(move || c.set(c.get() + 1)),
        );
        f.scan(PRESS_PICKUP);
        assert!(f.held.is_holding());
        let both = ActionEdges { interact: true, pickup: true };
        assert_eq!(f.scan(both), ScanOutcome::Dropped);
        assert_eq!(count.get(), 0, "no interact on the drop tick");
        assert!(!f.held.is_holding());
        let body = f.world.object(id).unwrap().body.unwrap();
        assert_eq!(f.world.gravity_enabled(body), Some(true));
    }

    #[test]
    fn no_camera_still_allows_drop() {
        let mut f = Fixture::new();
        let id = f.world.spawn(ObjectBuilder::new("mug").at(Vector3::new(0.0, 1.5, 2.0)).dynamic(0.5).tag(Tag::PickUp));
        f.scan(PRESS_PICKUP);
        assert!(f.held.is_holding());

        let out = f.scanner.scan(None, IDLE, None, &mut f.held, &mut f.world, &mut f.events);
        assert_eq!(out, ScanOutcome::NoCamera);
        let out = f.scanner.scan(None, PRESS_PICKUP, None, &mut f.held, &mut f.world, &mut f.events);
        assert_eq!(out, ScanOutcome::Dropped);
        let body = f.world.object(id).unwrap().body.unwrap();
        assert_eq!(f.events.last(), Some(&ControllerEvent::Dropped { body, impulse: None }));
    }
}
