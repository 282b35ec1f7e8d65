// Synchronous scene notifications

use glam::Vec3;

/// Notification emitted by a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// Gravity changed to the carried value
    Gravity(Vec3),

    /// The scene is about to tear down; internals are still intact
    Destroy,
}

impl SceneEvent {
    /// Event name as seen by hosts
    pub fn name(&self) -> &'static str {
        match self {
            SceneEvent::Gravity(_) => "gravity",
            SceneEvent::Destroy => "destroy",
        }
    }
}

/// Identifies a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered list of listeners invoked synchronously
pub struct EventEmitter<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener; it runs after every listener registered before it
    pub fn on(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|(lid, _)| *lid == id) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver an event to every listener in registration order
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names() {
        assert_eq!(SceneEvent::Gravity(Vec3::ZERO).name(), "gravity");
        assert_eq!(SceneEvent::Destroy.name(), "destroy");
    }

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::<u32>::new();

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            emitter.on(move |value: &u32| log.borrow_mut().push((tag, *value)));
        }

        emitter.emit(&7);
        assert_eq!(
            *log.borrow(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn test_off_removes_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::<()>::new();

        let counter = Rc::clone(&count);
        let id = emitter.on(move |_| *counter.borrow_mut() += 1);
        emitter.emit(&());

        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&());

        assert_eq!(*count.borrow(), 1);
    }
}
