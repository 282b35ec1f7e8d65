// Scene as seen by a host caller

use crate::scene::{ListenerId, Scene, SceneConfig, SceneEvent, Trace};
use log::debug;
use serde_json::{json, Value};

use super::exports::{exports, SCENE_CLASS};
use super::marshal::{number_from_value, vec3_from_value, vec3_to_value};
use super::HostError;

/// Event names a host may listen for
const EVENT_NAMES: [&str; 2] = ["gravity", "destroy"];

/// Wraps a [`Scene`] behind value-typed arguments and results.
///
/// Once the scene is destroyed, arguments are no longer validated: every
/// operation is a no-op returning `false`, `0` or `null`.
#[derive(Default)]
pub struct HostScene {
    scene: Scene,
}

impl HostScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            scene: Scene::with_config(config),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn is_destroyed(&self) -> bool {
        self.scene.is_destroyed()
    }

    /// Gravity in both indexed and named form; `null` once destroyed
    pub fn gravity(&self) -> Value {
        self.scene.gravity().map_or(Value::Null, vec3_to_value)
    }

    pub fn set_gravity(&mut self, value: &Value) -> Result<bool, HostError> {
        if self.is_destroyed() {
            return Ok(false);
        }
        let gravity = vec3_from_value(value)?;
        Ok(self.scene.set_gravity(gravity))
    }

    /// Advance by `dt`, or automatically when it is missing, `null` or not positive
    pub fn update(&mut self, dt: Option<&Value>) -> Result<f32, HostError> {
        if self.is_destroyed() {
            return Ok(0.0);
        }
        let dt = match dt {
            None | Some(Value::Null) => None,
            Some(value) => Some(number_from_value(value)?),
        };
        Ok(self.scene.update(dt))
    }

    pub fn hit(&mut self, from: &Value, to: &Value) -> Result<Value, HostError> {
        if self.is_destroyed() {
            return Ok(Value::Null);
        }
        let (from, to) = (vec3_from_value(from)?, vec3_from_value(to)?);
        Ok(trace_to_value(&self.scene.hit(from, to)))
    }

    pub fn trace(&mut self, from: &Value, to: &Value) -> Result<Value, HostError> {
        if self.is_destroyed() {
            return Ok(Value::Null);
        }
        let (from, to) = (vec3_from_value(from)?, vec3_from_value(to)?);
        let traces = self.scene.trace(from, to);
        Ok(Value::Array(traces.iter().map(trace_to_value).collect()))
    }

    pub fn destroy(&mut self) {
        self.scene.destroy();
    }

    /// Listen for a named event. Listeners receive the event payload as a
    /// list of values. Returns `Ok(None)` once the scene is destroyed.
    pub fn on(
        &mut self,
        event: &str,
        mut listener: impl FnMut(&[Value]) + 'static,
    ) -> Result<Option<ListenerId>, HostError> {
        let Some(name) = EVENT_NAMES.iter().copied().find(|n| *n == event) else {
            return Err(HostError::UnknownEvent(event.to_string()));
        };
        debug!("Host listening for '{name}'");

        Ok(self.scene.on_event(move |e| {
            if e.name() == name {
                listener(&event_payload(e));
            }
        }))
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.scene.off_event(id)
    }

    /// Invoke an exported method by name
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, HostError> {
        let export = exports()
            .class(SCENE_CLASS)
            .and_then(|class| class.method(method))
            .ok_or_else(|| HostError::UnknownMethod(method.to_string()))?;
        (export.call)(self, args)
    }

    /// Read an exported property by name
    pub fn get(&self, property: &str) -> Result<Value, HostError> {
        let accessor = exports()
            .class(SCENE_CLASS)
            .and_then(|class| class.accessor(property))
            .ok_or_else(|| HostError::UnknownProperty(property.to_string()))?;
        Ok((accessor.get)(self))
    }

    /// Write an exported property by name
    pub fn set(&mut self, property: &str, value: &Value) -> Result<(), HostError> {
        let accessor = exports()
            .class(SCENE_CLASS)
            .and_then(|class| class.accessor(property))
            .ok_or_else(|| HostError::UnknownProperty(property.to_string()))?;
        let setter = accessor
            .set
            .ok_or_else(|| HostError::ReadOnly(property.to_string()))?;
        setter(self, value)
    }
}

fn event_payload(event: &SceneEvent) -> Vec<Value> {
    match event {
        SceneEvent::Gravity(g) => vec![vec3_to_value(*g)],
        SceneEvent::Destroy => Vec::new(),
    }
}

/// Trace result with `target`, `point` and `normal` (all `null` on a miss)
fn trace_to_value(trace: &Trace) -> Value {
    json!({
        "multi": trace.is_multi(),
        "target": trace.target().map(|id| id.as_u64()),
        "point": trace.point().map(vec3_to_value),
        "normal": trace.normal().map(vec3_to_value),
    })
}
