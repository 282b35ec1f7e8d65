// Engine modules: timing and physics

pub mod clock;
pub mod physics;
