pub mod config;
pub mod controller;
pub mod io;
pub mod physics;
pub mod sim;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{ControllerError, ControllerEvent, WheelchairController};
pub use physics::{BodyDynamics, SceneQuery, SimWorld, World};
