// Scene configuration

use glam::Vec3;

/// Gravity a new scene starts with
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -10.0, 0.0);

/// Upper bound on solver steps per `step` call
pub const MAX_SUBSTEPS: u32 = 10;

/// Duration of one solver step (120 Hz)
pub const FIXED_TIMESTEP: f32 = 1.0 / 120.0;

/// Tunables for a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Initial gravity
    pub gravity: Vec3,

    /// Solver step budget per advance; 0 switches to one variable step
    pub max_substeps: u32,

    /// Fixed solver step in seconds
    pub fixed_timestep: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            max_substeps: MAX_SUBSTEPS,
            fixed_timestep: FIXED_TIMESTEP,
        }
    }
}
