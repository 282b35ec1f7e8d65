// Math conversions between the public glam types and rapier's nalgebra types

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

/// Convert a glam vector into a rapier vector
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// Convert a rapier vector into a glam vector
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a glam vector into a rapier point
pub fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

/// Convert a rapier point into a glam vector
pub fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Convert a rapier rotation into a glam quaternion
pub fn from_rotation(r: &Rotation<Real>) -> Quat {
    let c = r.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}
