use crate::core::math::to_vector;
use glam::Vec3;
use rapier3d::prelude::*;

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    translation: Vec3,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            translation: Vec3::ZERO,
        }
    }

    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic)
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed)
    }

    /// Set the initial position of the body
    pub fn position(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .translation(to_vector(self.translation))
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder3D {
    shape: SharedShape,
    friction: Real,
    restitution: Real,
}

impl ColliderBuilder3D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            friction: 0.5,
            restitution: 0.0,
        }
    }

    /// Create a box-shaped collider from its half extents
    pub fn box_shape(half_extents: Vec3) -> Self {
        Self::with_shape(SharedShape::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
        ))
    }

    /// Create a sphere-shaped collider
    pub fn sphere(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .friction(self.friction)
            .restitution(self.restitution)
            .build()
    }
}

/// Common body and collider configurations
pub mod presets {
    use super::*;

    /// A dynamic body that falls under gravity
    pub fn dynamic_body(position: Vec3) -> RigidBody {
        BodyBuilder::new_dynamic().position(position).build()
    }

    /// A fixed body for ground and walls
    pub fn fixed_body(position: Vec3) -> RigidBody {
        BodyBuilder::new_fixed().position(position).build()
    }

    /// A solid box collider with the given full size
    pub fn box_collider(size: Vec3) -> Collider {
        ColliderBuilder3D::box_shape(size * 0.5).build()
    }

    /// A solid sphere collider
    pub fn sphere_collider(radius: Real) -> Collider {
        ColliderBuilder3D::sphere(radius).restitution(0.2).build()
    }

    /// A wide, thin slab used as ground
    pub fn ground_collider(width: Real, depth: Real) -> Collider {
        ColliderBuilder3D::box_shape(Vec3::new(width * 0.5, 0.5, depth * 0.5))
            .friction(0.8)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic()
            .position(Vec3::new(10.0, 20.0, -5.0))
            .build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
        assert_eq!(body.translation().z, -5.0);
        assert_eq!(body.linvel().x, 0.0);
    }

    #[test]
    fn test_fixed_body_preset() {
        let body = presets::fixed_body(Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.translation().y, -0.5);
    }

    #[test]
    fn test_box_collider_preset_halves_size() {
        let collider = presets::box_collider(Vec3::new(2.0, 4.0, 6.0));

        assert_eq!(collider.friction(), 0.5);
        let cuboid = collider.shape().as_cuboid().map(|c| c.half_extents);
        assert_eq!(cuboid, Some(vector![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_ground_and_sphere_presets() {
        let ground = presets::ground_collider(10.0, 20.0);
        assert_eq!(ground.friction(), 0.8);
        let slab = ground.shape().as_cuboid().map(|c| c.half_extents);
        assert_eq!(slab, Some(vector![5.0, 0.5, 10.0]));

        let sphere = presets::sphere_collider(0.5);
        assert_eq!(sphere.restitution(), 0.2);
        assert_eq!(sphere.shape().as_ball().map(|b| b.radius), Some(0.5));
    }
}
