// Rigid body living in a scene

use crate::core::math::{from_rotation, from_vector, to_vector};
use crate::engine::physics::{Collider, PhysicsWorld, RigidBody, RigidBodyHandle};
use glam::{Quat, Vec3};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use super::registry::{BodyId, SceneBody, SharedBody, WeakBody};
use super::Scene;

/// A rigid body registered with a scene.
///
/// The caller owns the body through the returned [`SharedBody`]; the scene
/// only keeps a weak reference. Call [`Body::destroy`] before dropping it,
/// otherwise its rigid body stays in the world until the scene is destroyed.
#[derive(Debug)]
pub struct Body {
    id: BodyId,
    handle: Option<RigidBodyHandle>,

    // State cached after each scene step
    position: Vec3,
    rotation: Quat,
    linvel: Vec3,
    angvel: Vec3,

    /// Number of post-step synchronizations received
    sync_count: u64,
}

impl Body {
    /// Insert a body with one collider into the scene and register it.
    ///
    /// Returns `None` if the scene has been destroyed.
    pub fn spawn(scene: &mut Scene, body: RigidBody, collider: Collider) -> Option<SharedBody<Body>> {
        let id = scene.allocate_body_id()?;
        let world = scene.world_mut()?;
        let (handle, _) = world.insert_body(body, collider, id.as_user_data());

        let mut state = Body {
            id,
            handle: Some(handle),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            sync_count: 0,
        };
        state.read_state(world);

        let shared = Rc::new(RefCell::new(state));
        let weak = Rc::downgrade(&shared) as WeakBody;
        scene.register(id, weak);

        Some(shared)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    pub fn is_destroyed(&self) -> bool {
        self.handle.is_none()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn linvel(&self) -> Vec3 {
        self.linvel
    }

    pub fn angvel(&self) -> Vec3 {
        self.angvel
    }

    pub fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Teleport the body
    pub fn set_position(&mut self, scene: &mut Scene, position: Vec3) {
        let Some(rb) = self.rigid_body_mut(scene) else {
            return;
        };
        rb.set_translation(to_vector(position), true);
        self.position = position;
    }

    /// Overwrite the linear velocity
    pub fn set_linvel(&mut self, scene: &mut Scene, linvel: Vec3) {
        let Some(rb) = self.rigid_body_mut(scene) else {
            return;
        };
        rb.set_linvel(to_vector(linvel), true);
        self.linvel = linvel;
    }

    /// Remove the body from the world and from the scene. Idempotent.
    pub fn destroy(&mut self, scene: &mut Scene) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Some(world) = scene.world_mut() {
            world.remove_body(handle);
        }
        scene.deregister(self.id);
        debug!("Body {} destroyed", self.id.as_u64());
    }

    fn rigid_body_mut<'a>(&self, scene: &'a mut Scene) -> Option<&'a mut RigidBody> {
        let handle = self.handle?;
        scene.world_mut()?.rigid_body_mut(handle)
    }

    fn read_state(&mut self, world: &PhysicsWorld) {
        let Some(handle) = self.handle else {
            return;
        };
        if let Some(pose) = world.interpolated_pose(handle) {
            self.position = from_vector(&pose.translation.vector);
            self.rotation = from_rotation(&pose.rotation);
        }
        if let Some(rb) = world.rigid_body(handle) {
            self.linvel = from_vector(rb.linvel());
            self.angvel = from_vector(rb.angvel());
        }
    }
}

impl SceneBody for Body {
    fn post_step(&mut self, world: &PhysicsWorld) {
        self.read_state(world);
        self.sync_count += 1;
    }

    fn teardown(&mut self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.handle.take() {
            world.remove_body(handle);
            debug!("Body {} torn down with its scene", self.id.as_u64());
        }
    }
}
