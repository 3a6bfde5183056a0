use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Person,
    Vehicle,
    Object,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Person => "person",
            ObjectKind::Vehicle => "vehicle",
            ObjectKind::Object => "object",
        }
    }
}

/// The identity being followed. Referenced by detections through `objectId`.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reference_images: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
}
