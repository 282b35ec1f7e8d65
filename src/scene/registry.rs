// Insertion-ordered registry of bodies living in a scene

use crate::engine::physics::PhysicsWorld;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Stable identifier of a body within its scene.
///
/// Stored in the user data of the body's colliders so ray hits can be mapped
/// back to the body. Zero is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    /// Recover an id from collider user data; zero means "no body"
    pub fn from_user_data(data: u128) -> Option<Self> {
        if data == 0 || data > u64::MAX as u128 {
            None
        } else {
            Some(Self(data as u64))
        }
    }

    /// Value stored in collider user data
    pub fn as_user_data(&self) -> u128 {
        self.0 as u128
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Hooks a scene invokes on its registered bodies
pub trait SceneBody {
    /// Pull post-step state out of the world. Runs once per scene step.
    fn post_step(&mut self, world: &PhysicsWorld);

    /// Release everything the body holds in the world. Runs when the
    /// scene is torn down; the registry has already forgotten the body.
    fn teardown(&mut self, world: &mut PhysicsWorld);
}

/// Strong reference to a body as handed out to its owner
pub type SharedBody<B> = Rc<RefCell<B>>;

/// Non-owning reference the scene keeps
pub type WeakBody = Weak<RefCell<dyn SceneBody>>;

struct BodyEntry {
    id: BodyId,
    body: WeakBody,
}

/// Ordered set of weak body references.
///
/// Callers register each body exactly once; duplicates are logged but kept.
#[derive(Default)]
pub struct BodyRegistry {
    entries: Vec<BodyEntry>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body at the end of the iteration order.
    ///
    /// A second registration of the same id is kept as a separate entry.
    pub fn push(&mut self, id: BodyId, body: WeakBody) {
        if self.contains(id) {
            warn!("Body {} registered twice", id.0);
        }
        self.entries.push(BodyEntry { id, body });
        debug!("Registered body {} ({} total)", id.0, self.entries.len());
    }

    /// Remove the first entry with this id, keeping the order of the rest
    pub fn remove(&mut self, id: BodyId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                debug!("Deregistered body {} ({} left)", id.0, self.entries.len());
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Resolve an id to a live body
    pub fn get(&self, id: BodyId) -> Option<Rc<RefCell<dyn SceneBody>>> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.body.upgrade())
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every body's post-step hook, newest first.
    ///
    /// Entries whose body was dropped without deregistering are pruned.
    /// Returns the number of bodies synchronized.
    pub fn post_step_all(&mut self, world: &PhysicsWorld) -> usize {
        let mut synced = 0;
        for index in (0..self.entries.len()).rev() {
            let Some(body) = self.entries[index].body.upgrade() else {
                let id = self.entries.remove(index).id;
                warn!("Body {} was dropped without deregistering", id.0);
                continue;
            };
            match body.try_borrow_mut() {
                Ok(mut body) => {
                    body.post_step(world);
                    synced += 1;
                }
                Err(_) => warn!(
                    "Body {} is borrowed during step, skipping sync",
                    self.entries[index].id.0
                ),
            };
        }
        synced
    }

    /// Take the most recently registered entry
    pub fn pop(&mut self) -> Option<(BodyId, WeakBody)> {
        self.entries.pop().map(|e| (e.id, e.body))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
