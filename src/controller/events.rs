use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;

use crate::physics::{BodyHandle, ObjectId};

// ---------------------------------------------------------------------------
// Controller events
// ---------------------------------------------------------------------------

/// Fire-and-forget notifications raised by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Every `pulse_threshold` accepted wheel pushes.
    MovementPulse,
    PickedUp { body: BodyHandle },
    /// `impulse` is `None` when no camera was available to aim the throw.
    Dropped { body: BodyHandle, impulse: Option<Vector3<f64>> },
    Interacted { object: ObjectId },
    GazeStarted { object: ObjectId },
    ScareCue,
}

impl ControllerEvent {
    pub fn label(&self) -> &'static str {
        match self {
            ControllerEvent::MovementPulse => "movement_pulse",
            ControllerEvent::PickedUp { .. } => "picked_up",
            ControllerEvent::Dropped { .. } => "dropped",
            ControllerEvent::Interacted { .. } => "interacted",
            ControllerEvent::GazeStarted { .. } => "gaze_started",
            ControllerEvent::ScareCue => "scare_cue",
        }
    }
}

/// A controller event stamped with simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub time: f64,
    pub event: ControllerEvent,
}

// ---------------------------------------------------------------------------
// Prompt text sink
// ---------------------------------------------------------------------------

/// Receives the on-screen interaction prompt. Empty text clears it.
pub trait PromptSink {
    fn set_text(&mut self, text: &str);
}

impl PromptSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Keeps every update, in order.
impl PromptSink for Vec<String> {
    fn set_text(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

impl<T: PromptSink> PromptSink for Rc<RefCell<T>> {
    fn set_text(&mut self, text: &str) {
        self.borrow_mut().set_text(text);
    }
}
