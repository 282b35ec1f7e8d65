// Physics system using rapier3d

pub mod body;
mod stepper;
mod world;

pub use body::{BodyBuilder, ColliderBuilder3D};
pub use stepper::{FixedStepper, StepPlan};
pub use world::{ColliderHandle, PhysicsWorld, RayHit, RigidBodyHandle};

// Re-export commonly used rapier types for convenience
pub use rapier3d::prelude::{Collider, Isometry, Real, RigidBody, RigidBodyType};
