//! Rigid-body physics scene: fixed-step simulation, ray queries and
//! lifecycle events over a rapier3d world, plus a value-typed host boundary.

pub mod core;
pub mod engine;
pub mod host;
pub mod scene;

pub use engine::clock::Clock;
pub use engine::physics::PhysicsWorld;
pub use host::{HostError, HostScene};
pub use scene::{Body, BodyId, HitRecord, Scene, SceneBody, SceneConfig, SceneEvent, Trace};
