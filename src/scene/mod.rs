// Scene layer: lifecycle, body registry, stepping, ray queries and events

pub mod body;
pub mod config;
pub mod events;
mod manager;
pub mod registry;
pub mod trace;

pub use body::Body;
pub use config::{SceneConfig, DEFAULT_GRAVITY, FIXED_TIMESTEP, MAX_SUBSTEPS};
pub use events::{EventEmitter, ListenerId, SceneEvent};
pub use manager::Scene;
pub use registry::{BodyId, BodyRegistry, SceneBody, SharedBody, WeakBody};
pub use trace::{HitRecord, Trace};
