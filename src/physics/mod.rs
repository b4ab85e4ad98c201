pub mod body;
pub mod capability;
pub mod gravity;
pub mod provider;
pub mod ray;
pub mod world;

pub use body::{BodyHandle, RigidBody, Shape};
pub use capability::{ActivationTarget, Capability, CapabilitySet, GazeTarget, ObjectId, OnLookedAt, Tag};
pub use provider::{BodyDynamics, Pose, RayHit, SceneQuery, World};
pub use world::{ObjectBuilder, SceneObject, SimWorld};
