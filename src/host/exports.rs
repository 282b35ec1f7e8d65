// Process-wide table of what a host may call on a scene

use log::info;
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::{HostError, HostScene};

/// Name the scene class is exported under
pub const SCENE_CLASS: &str = "Scene";

/// Class the exported scene extends
pub const SCENE_PARENT: &str = "EventEmitter";

pub type GetterFn = fn(&HostScene) -> Value;
pub type SetterFn = fn(&mut HostScene, &Value) -> Result<(), HostError>;
pub type MethodFn = fn(&mut HostScene, &[Value]) -> Result<Value, HostError>;

/// Exported property; read-only when `set` is `None`
pub struct AccessorExport {
    pub name: &'static str,
    pub get: GetterFn,
    pub set: Option<SetterFn>,
}

pub struct MethodExport {
    pub name: &'static str,
    pub call: MethodFn,
}

pub struct ClassExport {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub accessors: Vec<AccessorExport>,
    pub methods: Vec<MethodExport>,
}

impl ClassExport {
    pub fn accessor(&self, name: &str) -> Option<&AccessorExport> {
        self.accessors.iter().find(|a| a.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodExport> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Every class exported to hosts
pub struct ExportTable {
    classes: Vec<ClassExport>,
}

impl ExportTable {
    pub fn class(&self, name: &str) -> Option<&ClassExport> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn classes(&self) -> &[ClassExport] {
        &self.classes
    }
}

static EXPORTS: OnceLock<ExportTable> = OnceLock::new();

/// The export table, built on first use. Every call returns the same table.
pub fn exports() -> &'static ExportTable {
    EXPORTS.get_or_init(|| {
        let table = ExportTable {
            classes: vec![scene_class()],
        };
        info!("Registered {} host export class(es)", table.classes.len());
        table
    })
}

fn scene_class() -> ClassExport {
    ClassExport {
        name: SCENE_CLASS,
        parent: Some(SCENE_PARENT),
        accessors: vec![
            AccessorExport {
                name: "isDestroyed",
                get: is_destroyed,
                set: None,
            },
            AccessorExport {
                name: "gravity",
                get: gravity,
                set: Some(set_gravity),
            },
        ],
        methods: vec![
            MethodExport {
                name: "destroy",
                call: destroy,
            },
            MethodExport {
                name: "update",
                call: update,
            },
            MethodExport {
                name: "trace",
                call: trace,
            },
            MethodExport {
                name: "hit",
                call: hit,
            },
        ],
    }
}

fn is_destroyed(scene: &HostScene) -> Value {
    Value::Bool(scene.is_destroyed())
}

fn gravity(scene: &HostScene) -> Value {
    scene.gravity()
}

fn set_gravity(scene: &mut HostScene, value: &Value) -> Result<(), HostError> {
    scene.set_gravity(value).map(|_| ())
}

fn destroy(scene: &mut HostScene, _args: &[Value]) -> Result<Value, HostError> {
    scene.destroy();
    Ok(Value::Null)
}

fn update(scene: &mut HostScene, args: &[Value]) -> Result<Value, HostError> {
    let dt = scene.update(args.first())?;
    Ok(json!(dt))
}

fn trace(scene: &mut HostScene, args: &[Value]) -> Result<Value, HostError> {
    if scene.is_destroyed() {
        return Ok(Value::Null);
    }
    let (from, to) = endpoints(args)?;
    scene.trace(from, to)
}

fn hit(scene: &mut HostScene, args: &[Value]) -> Result<Value, HostError> {
    if scene.is_destroyed() {
        return Ok(Value::Null);
    }
    let (from, to) = endpoints(args)?;
    scene.hit(from, to)
}

fn endpoints(args: &[Value]) -> Result<(&Value, &Value), HostError> {
    let from = args.first().ok_or(HostError::MissingArgument("from"))?;
    let to = args.get(1).ok_or(HostError::MissingArgument("to"))?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports_are_built_once() {
        let first = exports() as *const ExportTable;
        let second = exports() as *const ExportTable;
        assert_eq!(first, second);
    }

    #[test]
    fn test_scene_class_shape() {
        let class = exports().class(SCENE_CLASS).expect("scene class exported");
        assert_eq!(class.parent, Some("EventEmitter"));

        let methods: Vec<_> = class.methods.iter().map(|m| m.name).collect();
        assert_eq!(methods, vec!["destroy", "update", "trace", "hit"]);

        assert!(class.accessor("isDestroyed").is_some_and(|a| a.set.is_none()));
        assert!(class.accessor("gravity").is_some_and(|a| a.set.is_some()));
        assert!(class.accessor("mass").is_none());
        assert!(exports().class("Body").is_none());
    }

    #[test]
    fn test_accessors_through_table() {
        let mut host = HostScene::new();
        let class = exports().class(SCENE_CLASS).expect("scene class exported");

        let gravity = class.accessor("gravity").expect("gravity exported");
        let set = gravity.set.expect("gravity is writable");
        set(&mut host, &json!([0, -3, 0])).unwrap();
        assert_eq!((gravity.get)(&host)["y"], json!(-3.0));

        let destroyed = class.accessor("isDestroyed").expect("isDestroyed exported");
        assert_eq!((destroyed.get)(&host), json!(false));
    }

    #[test]
    fn test_endpoints_require_both_points() {
        assert_eq!(
            endpoints(&[]).unwrap_err(),
            HostError::MissingArgument("from")
        );
        assert!(endpoints(&[json!([0, 0, 0]), json!([1, 0, 0])]).is_ok());
    }
}
