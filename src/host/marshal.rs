// Conversions between host values and the scene's math types

use glam::{Quat, Vec3};
use serde_json::{json, Map, Value};

/// Invalid argument at the host boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarshalError {
    #[error("Expected an array or object, got {0}")]
    NotAnObject(&'static str),

    #[error("Missing component: {0}")]
    MissingField(String),

    #[error("Component {0} is not a number")]
    NotANumber(String),
}

/// Read a vector from `[x, y, z]`, `{"0": x, "1": y, "2": z}` or `{x, y, z}`
pub fn vec3_from_value(value: &Value) -> Result<Vec3, MarshalError> {
    let [x, y, z] = components(value, ["x", "y", "z"])?;
    Ok(Vec3::new(x, y, z))
}

/// Vector readable both by index and by name
pub fn vec3_to_value(v: Vec3) -> Value {
    json!({
        "0": v.x, "1": v.y, "2": v.z,
        "x": v.x, "y": v.y, "z": v.z,
    })
}

/// Read a quaternion from `[x, y, z, w]` or `{x, y, z, w}`. Components are
/// taken as given.
pub fn quat_from_value(value: &Value) -> Result<Quat, MarshalError> {
    let [x, y, z, w] = components(value, ["x", "y", "z", "w"])?;
    Ok(Quat::from_xyzw(x, y, z, w))
}

/// Quaternion readable both by index and by name
pub fn quat_to_value(q: Quat) -> Value {
    json!({
        "0": q.x, "1": q.y, "2": q.z, "3": q.w,
        "x": q.x, "y": q.y, "z": q.z, "w": q.w,
    })
}

pub fn number_from_value(value: &Value) -> Result<f32, MarshalError> {
    number(value, "value")
}

fn components<const N: usize>(value: &Value, names: [&str; N]) -> Result<[f32; N], MarshalError> {
    let mut out = [0.0; N];
    match value {
        Value::Array(items) => {
            for (i, slot) in out.iter_mut().enumerate() {
                let key = i.to_string();
                let item = items.get(i).ok_or_else(|| MarshalError::MissingField(key.clone()))?;
                *slot = number(item, &key)?;
            }
        }
        // Named fields win whenever an "x" key is present
        Value::Object(map) if map.contains_key(names[0]) => {
            for (slot, name) in out.iter_mut().zip(names) {
                *slot = field(map, name)?;
            }
        }
        Value::Object(map) => {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = field(map, &i.to_string())?;
            }
        }
        other => return Err(MarshalError::NotAnObject(kind(other))),
    }
    Ok(out)
}

fn field(map: &Map<String, Value>, key: &str) -> Result<f32, MarshalError> {
    let item = map
        .get(key)
        .ok_or_else(|| MarshalError::MissingField(key.to_string()))?;
    number(item, key)
}

fn number(value: &Value, key: &str) -> Result<f32, MarshalError> {
    value
        .as_f64()
        .map(|n| n as f32)
        .ok_or_else(|| MarshalError::NotANumber(key.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
