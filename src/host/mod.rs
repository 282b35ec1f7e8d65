// Host boundary: exposes a scene to a dynamic caller through JSON-like values

pub mod exports;
pub mod marshal;
mod scene;

pub use exports::{exports, AccessorExport, ClassExport, ExportTable, MethodExport};
pub use marshal::MarshalError;
pub use scene::HostScene;

/// Errors reported to the host caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("Invalid argument: {0}")]
    Marshal(#[from] MarshalError),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Property is read-only: {0}")]
    ReadOnly(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}
