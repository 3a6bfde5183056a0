pub mod camera;
pub mod detection;
pub mod object;

// Re-export commonly used types
pub use camera::{Camera, Coordinate};
pub use detection::Detection;
pub use object::{ObjectKind, TrackedObject};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Snapshot format version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Everything the ingestion boundary hands over for one tracked-object view.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq, Default)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub objects: Vec<TrackedObject>,
}
