// Scene: owns the physics world and orchestrates bodies, stepping and queries

use crate::engine::clock::Clock;
use crate::engine::physics::{PhysicsWorld, RayHit};
use glam::Vec3;
use log::{debug, info, trace, warn};
use std::cell::RefCell;
use std::rc::Rc;

use super::config::SceneConfig;
use super::events::{EventEmitter, ListenerId, SceneEvent};
use super::registry::{BodyId, BodyRegistry, SceneBody, WeakBody};
use super::trace::{HitRecord, Trace};

/// A physics scene.
///
/// Once destroyed the scene is inert: every operation returns immediately
/// and getters return `None`. Dropping a live scene tears it down without
/// emitting [`SceneEvent::Destroy`].
pub struct Scene {
    config: SceneConfig,

    /// Time since the last automatic step
    clock: Clock,

    /// Last gravity pushed into the world
    gravity: Vec3,

    bodies: BodyRegistry,
    events: EventEmitter<SceneEvent>,
    next_body_id: u64,

    /// `None` once the scene is destroyed
    world: Option<PhysicsWorld>,
}

impl Scene {
    /// Create an empty scene with the default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with custom gravity and step settings
    pub fn with_config(config: SceneConfig) -> Self {
        let world = PhysicsWorld::with_gravity(config.gravity);
        info!(
            "Scene created: gravity {:?}, {} sub-steps of {}s",
            config.gravity, config.max_substeps, config.fixed_timestep
        );

        Self {
            config,
            clock: Clock::new(),
            gravity: config.gravity,
            bodies: BodyRegistry::new(),
            events: EventEmitter::new(),
            next_body_id: 1,
            world: Some(world),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.world.is_none()
    }

    // -- Gravity --

    /// Current gravity, read from the cache
    pub fn gravity(&self) -> Option<Vec3> {
        self.world.as_ref().map(|_| self.gravity)
    }

    /// Change gravity and notify listeners.
    ///
    /// Returns false without notifying if the value is unchanged or the
    /// scene is destroyed.
    pub fn set_gravity(&mut self, gravity: Vec3) -> bool {
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        if gravity == self.gravity {
            return false;
        }

        self.gravity = gravity;
        world.set_gravity(gravity);
        debug!("Gravity set to {gravity:?}");

        self.events.emit(&SceneEvent::Gravity(gravity));
        true
    }

    // -- Stepping --

    /// Advance by `dt` if it is positive, otherwise by the time since the
    /// last automatic step. Returns the time advanced.
    pub fn update(&mut self, dt: Option<f32>) -> f32 {
        if self.is_destroyed() {
            return 0.0;
        }
        match dt {
            Some(dt) if dt > 0.0 => {
                self.step(dt);
                dt
            }
            _ => self.step_auto(),
        }
    }

    /// Advance the world by `dt` seconds, then synchronize every body.
    ///
    /// `dt` must be positive. Returns the number of solver steps that were
    /// due; at most `max_substeps` of them run.
    pub fn step(&mut self, dt: f32) -> u32 {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };

        let due = world.step_simulation(dt, self.config.max_substeps, self.config.fixed_timestep);
        self.bodies.post_step_all(world);
        due
    }

    /// Advance by the wall time elapsed since the previous automatic step
    /// (or since construction). Returns that time in seconds.
    pub fn step_auto(&mut self) -> f32 {
        if self.is_destroyed() {
            return 0.0;
        }
        let dt = self.clock.lap();
        self.step(dt);
        dt
    }

    // -- Ray queries --

    /// Every registered body crossed by the segment `from -> to`, in the
    /// order the physics engine reports them
    pub fn trace(&mut self, from: Vec3, to: Vec3) -> Vec<Trace> {
        let Some(world) = self.world.as_mut() else {
            return Vec::new();
        };

        world
            .ray_test_all(from, to)
            .iter()
            .filter_map(|hit| self.resolve_hit(hit))
            .map(|record| Trace::from_hit(true, record))
            .collect()
    }

    /// Single query for the nearest body crossed by `from -> to`
    pub fn hit(&mut self, from: Vec3, to: Vec3) -> Trace {
        Trace::cast(self, from, to)
    }

    /// Nearest hit on the segment, if it belongs to a registered body
    pub fn closest_hit(&mut self, from: Vec3, to: Vec3) -> Option<HitRecord> {
        let hit = self.world.as_mut()?.ray_test_closest(from, to)?;
        self.resolve_hit(&hit)
    }

    fn resolve_hit(&self, hit: &RayHit) -> Option<HitRecord> {
        let target = BodyId::from_user_data(hit.user_data).filter(|id| self.bodies.contains(*id));
        if target.is_none() {
            trace!("Ray hit collider {:?} with no registered body", hit.collider);
        }

        Some(HitRecord {
            target: target?,
            point: hit.point,
            normal: hit.normal,
        })
    }

    // -- Bodies --

    /// Reserve a fresh body id. `None` once destroyed.
    pub fn allocate_body_id(&mut self) -> Option<BodyId> {
        if self.is_destroyed() {
            return None;
        }
        let id = BodyId(self.next_body_id);
        self.next_body_id += 1;
        Some(id)
    }

    /// Register a body for per-step synchronization and teardown.
    ///
    /// Each body must register exactly once and deregister before it is
    /// dropped.
    pub fn register(&mut self, id: BodyId, body: WeakBody) {
        if self.is_destroyed() {
            return;
        }
        self.bodies.push(id, body);
    }

    /// Forget a body. Returns false if it was not registered.
    pub fn deregister(&mut self, id: BodyId) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.bodies.remove(id)
    }

    /// Resolve an id to a live registered body
    pub fn body(&self, id: BodyId) -> Option<Rc<RefCell<dyn SceneBody>>> {
        self.bodies.get(id)
    }

    /// Registered body ids in registration order
    pub fn body_ids(&self) -> Vec<BodyId> {
        self.bodies.ids().collect()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.world.as_mut()
    }

    // -- Events --

    /// Listen for scene notifications; ignored once destroyed
    pub fn on_event(&mut self, listener: impl FnMut(&SceneEvent) + 'static) -> Option<ListenerId> {
        if self.is_destroyed() {
            return None;
        }
        Some(self.events.on(listener))
    }

    pub fn off_event(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    // -- Lifecycle --

    /// Notify listeners, then tear down every body (newest first) and
    /// release the world. Idempotent.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.events.emit(&SceneEvent::Destroy);
        self.teardown();
        self.events.clear();
    }

    fn teardown(&mut self) {
        let Some(mut world) = self.world.take() else {
            return;
        };

        let mut released = 0;
        while let Some((id, body)) = self.bodies.pop() {
            let Some(body) = body.upgrade() else {
                warn!("Body {} was dropped without deregistering", id.as_u64());
                continue;
            };
            match body.try_borrow_mut() {
                Ok(mut body) => {
                    body.teardown(&mut world);
                    released += 1;
                }
                Err(_) => warn!("Body {} is borrowed during teardown, skipping", id.as_u64()),
            };
        }
        self.bodies.clear();

        // Releases the world's parts in field order
        drop(world);
        info!("Scene destroyed, {released} bodies torn down");
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}
