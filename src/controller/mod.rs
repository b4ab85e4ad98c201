pub mod camera;
pub mod events;
pub mod held;
pub mod input;
pub mod interaction;
pub mod locomotion;
pub mod wheelchair;

pub use camera::{CameraOrientation, CameraRig};
pub use events::{ControllerEvent, PromptSink, TimedEvent};
pub use held::{HeldObjectManager, HeldState};
pub use input::{BindingError, InputEvent, InputHost, MemoryHost, Signal, WheelSide};
pub use interaction::{ActionEdges, InteractionScanner, ScanOutcome};
pub use locomotion::{LocomotionController, PulseCounter, PushOutcome, WheelState};
pub use wheelchair::{ControllerError, TickReport, WheelchairController};
