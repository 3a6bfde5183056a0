use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Detection;

/// A latitude/longitude pair, serialized as `[lat, lon]`.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq)]
pub struct Coordinate(pub f64, pub f64);

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self(lat, lon)
    }
}

/// A fixed sensor and every detection it has reported.
///
/// The detection list may mix several tracked objects; scoping by
/// `objectId` happens during reconstruction.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq)]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl Camera {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            detections: Vec::new(),
        }
    }

    pub fn with_detection(mut self, detection: Detection) -> Self {
        self.detections.push(detection);
        self
    }

    /// True when any detection from this camera is contested
    pub fn has_dispute(&self) -> bool {
        self.detections.iter().any(|d| d.disputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(51.505, -0.09)).unwrap();
        assert_eq!(json, "[51.505,-0.09]");

        let parsed: Coordinate = serde_json::from_str("[51.51, -0.1]").unwrap();
        assert_eq!(parsed.lat(), 51.51);
        assert_eq!(parsed.lon(), -0.1);
    }

    #[test]
    fn camera_without_detections_field() {
        let json = r#"{"id": "cam9", "name": "Dock", "location": [0.0, 0.0]}"#;
        let camera: Camera = serde_json::from_str(json).unwrap();
        assert!(camera.detections.is_empty());
        assert!(!camera.has_dispute());
    }
}
