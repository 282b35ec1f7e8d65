// Ray query results

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

use super::registry::{BodyId, SceneBody};
use super::Scene;

/// One body struck by a ray.
///
/// Holds the body by id only; resolve it through the scene while it is live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Body that was struck
    pub target: BodyId,

    /// World-space intersection point
    pub point: Vec3,

    /// World-space surface normal at the intersection
    pub normal: Vec3,
}

/// Result handle of a ray query
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Produced by an all-hits query
    multi: bool,

    /// The hit, if the ray struck anything
    hit: Option<HitRecord>,
}

impl Trace {
    /// Wrap one hit of an all-hits query (or a known single hit)
    pub fn from_hit(multi: bool, record: HitRecord) -> Self {
        Self {
            multi,
            hit: Some(record),
        }
    }

    /// Cast a single ray against the scene and keep the closest hit.
    ///
    /// The hit is resolved immediately; later changes to the scene do not
    /// affect it.
    pub fn cast(scene: &mut Scene, from: Vec3, to: Vec3) -> Self {
        Self {
            multi: false,
            hit: scene.closest_hit(from, to),
        }
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn has_hit(&self) -> bool {
        self.hit.is_some()
    }

    pub fn record(&self) -> Option<&HitRecord> {
        self.hit.as_ref()
    }

    pub fn target(&self) -> Option<BodyId> {
        self.hit.map(|h| h.target)
    }

    pub fn point(&self) -> Option<Vec3> {
        self.hit.map(|h| h.point)
    }

    pub fn normal(&self) -> Option<Vec3> {
        self.hit.map(|h| h.normal)
    }

    /// Resolve the struck body, if it is still registered with `scene`
    pub fn body(&self, scene: &Scene) -> Option<Rc<RefCell<dyn SceneBody>>> {
        self.target().and_then(|id| scene.body(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hit_accessors() {
        let record = HitRecord {
            target: BodyId(3),
            point: Vec3::new(0.0, 0.0, -2.5),
            normal: Vec3::Z,
        };
        let trace = Trace::from_hit(true, record);

        assert!(trace.is_multi());
        assert!(trace.has_hit());
        assert_eq!(trace.target(), Some(BodyId(3)));
        assert_eq!(trace.point(), Some(Vec3::new(0.0, 0.0, -2.5)));
        assert_eq!(trace.normal(), Some(Vec3::Z));
        assert_eq!(trace.record(), Some(&record));
    }

    #[test]
    fn test_cast_into_empty_scene_misses() {
        let mut scene = Scene::new();
        let trace = Trace::cast(&mut scene, Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));

        assert!(!trace.is_multi());
        assert!(!trace.has_hit());
        assert_eq!(trace.target(), None);
        assert!(trace.body(&scene).is_none());
    }
}
