use crate::core::math::{from_point, from_vector, to_point, to_vector};
use glam::Vec3;
use log::trace;
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use super::stepper::FixedStepper;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier3d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier3d::prelude::ColliderHandle;

/// One intersection reported by a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Collider that was struck
    pub collider: ColliderHandle,

    /// User data stored on the struck collider
    pub user_data: u128,

    /// Fraction along the ray (0 at the start point, 1 at the end point)
    pub fraction: Real,

    /// World-space intersection point
    pub point: Vec3,

    /// World-space surface normal at the intersection
    pub normal: Vec3,
}

/// Physics world that manages all physics simulation
///
/// Fields drop in declaration order, which is the release order: bodies and
/// pipelines first, then solver state, broad phase, narrow phase, and the
/// integration parameters last.
pub struct PhysicsWorld {
    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection and contact dispatch
    narrow_phase: NarrowPhase,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Gravity vector
    gravity: Vector<Real>,

    /// Fixed sub-step accumulator
    stepper: FixedStepper,

    /// Set when bodies were added, removed or moved since the query pipeline last saw them
    queries_dirty: bool,
}

impl PhysicsWorld {
    /// Create a new physics world with zero gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::ZERO)
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        // Each stage only depends on the ones built before it
        let integration_parameters = IntegrationParameters::default();
        let narrow_phase = NarrowPhase::new();
        let broad_phase = DefaultBroadPhase::new();
        let island_manager = IslandManager::new();
        let impulse_joint_set = ImpulseJointSet::new();
        let multibody_joint_set = MultibodyJointSet::new();
        let ccd_solver = CCDSolver::new();

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            physics_pipeline: PhysicsPipeline::new(),
            query_pipeline: QueryPipeline::new(),
            island_manager,
            impulse_joint_set,
            multibody_joint_set,
            ccd_solver,
            broad_phase,
            narrow_phase,
            integration_parameters,
            gravity: to_vector(gravity),
            stepper: FixedStepper::new(),
            queries_dirty: false,
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `dt` is split into steps of `fixed_timestep`, running at most
    /// `max_substeps` of them; time past that budget is dropped. With
    /// `max_substeps == 0` a single variable step of `dt` is taken.
    /// Returns the number of steps that were due before clamping.
    pub fn step_simulation(&mut self, dt: Real, max_substeps: u32, fixed_timestep: Real) -> u32 {
        let plan = self.stepper.advance(dt, max_substeps, fixed_timestep);

        if plan.run > 0 {
            self.integration_parameters.dt = plan.step_size;
            for _ in 0..plan.run {
                self.single_step();
            }
            self.queries_dirty = false;
        }

        trace!(
            "step_simulation dt={dt} due={} run={} carry={}",
            plan.due,
            plan.run,
            self.stepper.local_time()
        );

        plan.due
    }

    fn single_step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Time accumulated but not yet simulated, in seconds
    pub fn interpolation_time(&self) -> Real {
        self.stepper.local_time()
    }

    /// Add a rigid body with one attached collider, tagging both with `user_data`
    pub fn insert_body(
        &mut self,
        mut body: RigidBody,
        mut collider: Collider,
        user_data: u128,
    ) -> (RigidBodyHandle, ColliderHandle) {
        body.user_data = user_data;
        collider.user_data = user_data;

        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        self.queries_dirty = true;

        (body_handle, collider_handle)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        let removed = self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        if removed.is_some() {
            self.queries_dirty = true;
        }
        removed
    }

    /// Get a reference to a rigid body
    pub fn rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body.
    ///
    /// The body may be moved through this reference, so ray queries refresh
    /// their acceleration structure before the next cast.
    pub fn rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.queries_dirty = true;
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Number of rigid bodies in the world
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Pose of a body extrapolated by the unconsumed step time.
    ///
    /// Bodies are only simulated in whole fixed steps, so the leftover
    /// accumulator time is covered by integrating the current velocities.
    pub fn interpolated_pose(&self, handle: RigidBodyHandle) -> Option<Isometry<Real>> {
        let body = self.rigid_body_set.get(handle)?;
        let t = self.stepper.local_time();
        let pose = body.position();

        if t == 0.0 || !body.is_dynamic() {
            return Some(*pose);
        }

        let translation = pose.translation.vector + body.linvel() * t;
        let rotation = UnitQuaternion::new(body.angvel() * t) * pose.rotation;
        Some(Isometry::from_parts(Translation3::from(translation), rotation))
    }

    /// Cast a ray from `from` to `to` and report every collider it crosses.
    ///
    /// Hits come back in the order the query pipeline visits them, which is
    /// not sorted by distance.
    pub fn ray_test_all(&mut self, from: Vec3, to: Vec3) -> Vec<RayHit> {
        let mut hits = Vec::new();
        let Some(ray) = segment_ray(from, to) else {
            return hits;
        };
        self.refresh_queries();

        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                hits.push(make_hit(&self.collider_set, &ray, handle, intersection));
                true // keep searching
            },
        );

        hits
    }

    /// Cast a ray from `from` to `to` and report the closest hit
    pub fn ray_test_closest(&mut self, from: Vec3, to: Vec3) -> Option<RayHit> {
        let ray = segment_ray(from, to)?;
        self.refresh_queries();

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                1.0,
                true,
                QueryFilter::default(),
            )
            .map(|(handle, intersection)| make_hit(&self.collider_set, &ray, handle, intersection))
    }

    /// Bring collider positions and the query acceleration structure up to date
    fn refresh_queries(&mut self) {
        if !self.queries_dirty {
            return;
        }
        self.rigid_body_set
            .propagate_modified_body_positions_to_colliders(&mut self.collider_set);
        self.query_pipeline.update(&self.collider_set);
        self.queries_dirty = false;
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Ray parameterised so that `t = 1` lands on the end point
fn segment_ray(from: Vec3, to: Vec3) -> Option<Ray> {
    let dir = to - from;
    if dir.length_squared() == 0.0 {
        return None;
    }
    Some(Ray::new(to_point(from), to_vector(dir)))
}

fn make_hit(
    colliders: &ColliderSet,
    ray: &Ray,
    handle: ColliderHandle,
    intersection: RayIntersection,
) -> RayHit {
    RayHit {
        collider: handle,
        user_data: colliders.get(handle).map_or(0, |c| c.user_data),
        fraction: intersection.time_of_impact,
        point: from_point(&ray.point_at(intersection.time_of_impact)),
        normal: from_vector(&intersection.normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use approx::assert_relative_eq;

    const FIXED: Real = 1.0 / 120.0;

    fn world_with_boxes(positions: &[Vec3]) -> (PhysicsWorld, Vec<RigidBodyHandle>) {
        let mut world = PhysicsWorld::with_gravity(Vec3::ZERO);
        let handles = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let (body, _) = world.insert_body(
                    presets::fixed_body(*p),
                    presets::box_collider(Vec3::ONE),
                    i as u128 + 1,
                );
                body
            })
            .collect();
        (world, handles)
    }

    #[test]
    fn test_gravity_round_trip() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.gravity(), Vec3::ZERO);

        world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        assert_eq!(world.gravity(), Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn test_body_falls_under_gravity() {
        let mut world = PhysicsWorld::with_gravity(Vec3::new(0.0, -10.0, 0.0));
        let (handle, _) = world.insert_body(
            presets::dynamic_body(Vec3::new(0.0, 10.0, 0.0)),
            presets::sphere_collider(0.5),
            1,
        );

        let due = world.step_simulation(0.5, 120, FIXED);
        assert!(due >= 59);

        let body = world.rigid_body(handle).expect("body exists");
        assert!(body.translation().y < 10.0);
        assert!(body.linvel().y < 0.0);
    }

    #[test]
    fn test_substep_budget_limits_simulated_time() {
        let mut world = PhysicsWorld::with_gravity(Vec3::new(0.0, -10.0, 0.0));
        let (handle, _) = world.insert_body(
            presets::dynamic_body(Vec3::ZERO),
            presets::sphere_collider(0.5),
            1,
        );

        // A full second owes 120 steps; only 10 run, so the body only sees 1/12s
        world.step_simulation(1.0, 10, FIXED);
        let vy = world.rigid_body(handle).expect("body exists").linvel().y;
        assert_relative_eq!(vy, -10.0 / 12.0, epsilon = 1e-3);
    }

    #[test]
    fn test_insert_and_remove_body() {
        let (mut world, handles) = world_with_boxes(&[Vec3::ZERO]);
        assert_eq!(world.body_count(), 1);

        assert!(world.remove_body(handles[0]).is_some());
        assert_eq!(world.body_count(), 0);
        assert!(world.remove_body(handles[0]).is_none());
    }

    #[test]
    fn test_user_data_tags_body_and_collider() {
        let mut world = PhysicsWorld::new();
        let (body, collider) = world.insert_body(
            presets::fixed_body(Vec3::ZERO),
            presets::box_collider(Vec3::ONE),
            42,
        );

        assert_eq!(world.rigid_body(body).map(|b| b.user_data), Some(42));
        assert_eq!(world.collider(collider).map(|c| c.user_data), Some(42));
    }

    #[test]
    fn test_ray_test_all_reports_every_crossed_body() {
        let (mut world, _) = world_with_boxes(&[
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(0.0, 0.0, -6.0),
            Vec3::new(5.0, 0.0, -6.0),
        ]);

        let hits = world.ray_test_all(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(hits.len(), 2);

        let mut tags: Vec<u128> = hits.iter().map(|h| h.user_data).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec![1, 2]);

        for hit in &hits {
            assert!(hit.point.is_finite());
            assert_relative_eq!(hit.normal.z, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_ray_test_all_misses() {
        let (mut world, _) = world_with_boxes(&[Vec3::new(5.0, 0.0, -3.0)]);
        let hits = world.ray_test_all(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_ray_stops_at_end_point() {
        let (mut world, _) = world_with_boxes(&[Vec3::new(0.0, 0.0, -6.0)]);
        let hits = world.ray_test_all(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_degenerate_ray_hits_nothing() {
        let (mut world, _) = world_with_boxes(&[Vec3::ZERO]);
        assert!(world.ray_test_all(Vec3::ONE, Vec3::ONE).is_empty());
        assert!(world.ray_test_closest(Vec3::ONE, Vec3::ONE).is_none());
    }

    #[test]
    fn test_ray_test_closest() {
        let (mut world, _) = world_with_boxes(&[
            Vec3::new(0.0, 0.0, -6.0),
            Vec3::new(0.0, 0.0, -3.0),
        ]);

        let hit = world
            .ray_test_closest(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0))
            .expect("ray should hit");
        assert_eq!(hit.user_data, 2);
        assert_relative_eq!(hit.point.z, -2.5, epsilon = 1e-4);
        assert_relative_eq!(hit.fraction, 0.25, epsilon = 1e-4);
    }

    #[test]
    fn test_removed_body_is_not_hit() {
        let (mut world, handles) = world_with_boxes(&[Vec3::new(0.0, 0.0, -3.0)]);
        world.remove_body(handles[0]);
        assert!(world
            .ray_test_closest(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0))
            .is_none());
    }

    #[test]
    fn test_interpolated_pose_uses_carry() {
        let mut world = PhysicsWorld::with_gravity(Vec3::ZERO);
        let (handle, _) = world.insert_body(
            presets::dynamic_body(Vec3::ZERO),
            presets::sphere_collider(0.5),
            1,
        );
        world
            .rigid_body_mut(handle)
            .expect("body exists")
            .set_linvel(vector![1.0, 0.0, 0.0], true);

        // One and a half steps: half a step stays in the accumulator
        world.step_simulation(FIXED * 1.5, 10, FIXED);
        assert_relative_eq!(world.interpolation_time(), FIXED * 0.5, epsilon = 1e-6);

        let simulated = world.rigid_body(handle).expect("body exists").translation().x;
        let pose = world.interpolated_pose(handle).expect("body exists");
        assert_relative_eq!(pose.translation.vector.x, simulated + FIXED * 0.5, epsilon = 1e-5);
    }
}
