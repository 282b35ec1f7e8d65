// Core utilities shared by the engine and scene layers

pub mod math;
