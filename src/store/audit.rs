//! Data-quality report for the ingestion boundary.
//!
//! Nothing here rejects or rewrites records. Reconstruction runs on the
//! data exactly as loaded; the audit only tells the caller what looks off.

use std::collections::HashSet;

use serde::Serialize;

use super::DetectionStore;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataAnomaly {
    /// `endTime` precedes `startTime`
    InvertedInterval { detection_id: String },
    /// Confidence outside `[0, 1]` or not a number
    ConfidenceOutOfRange {
        detection_id: String,
        confidence: f64,
    },
    /// `cameraId` names no camera in the registry
    UnknownCamera {
        detection_id: String,
        camera_id: String,
    },
    /// Listed under one camera but attributed to another
    CameraMismatch {
        detection_id: String,
        listed_under: String,
        camera_id: String,
    },
    UnknownObject {
        detection_id: String,
        object_id: String,
    },
}

impl DataAnomaly {
    pub fn detection_id(&self) -> &str {
        match self {
            DataAnomaly::InvertedInterval { detection_id }
            | DataAnomaly::ConfidenceOutOfRange { detection_id, .. }
            | DataAnomaly::UnknownCamera { detection_id, .. }
            | DataAnomaly::CameraMismatch { detection_id, .. }
            | DataAnomaly::UnknownObject { detection_id, .. } => detection_id,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataAnomaly::InvertedInterval { detection_id } => {
                format!("{}: end time precedes start time", detection_id)
            }
            DataAnomaly::ConfidenceOutOfRange {
                detection_id,
                confidence,
            } => format!("{}: confidence {} outside [0, 1]", detection_id, confidence),
            DataAnomaly::UnknownCamera {
                detection_id,
                camera_id,
            } => format!("{}: references unknown camera '{}'", detection_id, camera_id),
            DataAnomaly::CameraMismatch {
                detection_id,
                listed_under,
                camera_id,
            } => format!(
                "{}: listed under camera '{}' but attributed to '{}'",
                detection_id, listed_under, camera_id
            ),
            DataAnomaly::UnknownObject {
                detection_id,
                object_id,
            } => format!("{}: references unknown object '{}'", detection_id, object_id),
        }
    }
}

/// Collect every anomaly in camera order, then detection order.
///
/// Unknown objects are only reported when the store carries an object
/// registry at all.
pub fn audit(store: &DetectionStore) -> Vec<DataAnomaly> {
    let camera_ids: HashSet<&str> = store.list_cameras().iter().map(|c| c.id.as_str()).collect();
    let object_ids: HashSet<&str> = store.objects().iter().map(|o| o.id.as_str()).collect();

    let mut anomalies = Vec::new();
    for camera in store.list_cameras() {
        for detection in &camera.detections {
            if detection.is_inverted() {
                anomalies.push(DataAnomaly::InvertedInterval {
                    detection_id: detection.id.clone(),
                });
            }

            if !(0.0..=1.0).contains(&detection.confidence) {
                anomalies.push(DataAnomaly::ConfidenceOutOfRange {
                    detection_id: detection.id.clone(),
                    confidence: detection.confidence,
                });
            }

            if !camera_ids.contains(detection.camera_id.as_str()) {
                anomalies.push(DataAnomaly::UnknownCamera {
                    detection_id: detection.id.clone(),
                    camera_id: detection.camera_id.clone(),
                });
            } else if detection.camera_id != camera.id {
                anomalies.push(DataAnomaly::CameraMismatch {
                    detection_id: detection.id.clone(),
                    listed_under: camera.id.clone(),
                    camera_id: detection.camera_id.clone(),
                });
            }

            if !object_ids.is_empty() && !object_ids.contains(detection.object_id.as_str()) {
                anomalies.push(DataAnomaly::UnknownObject {
                    detection_id: detection.id.clone(),
                    object_id: detection.object_id.clone(),
                });
            }
        }
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use crate::model::{Camera, Coordinate, Detection};
    use chrono::{TimeZone, Utc};

    fn detection(id: &str, camera_id: &str) -> Detection {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        Detection::new(id, camera_id, "obj1", start, start)
    }

    #[test]
    fn demo_data_is_clean() {
        let store = DetectionStore::from(demo::snapshot());
        assert!(audit(&store).is_empty());
    }

    #[test]
    fn empty_store_is_clean() {
        assert!(audit(&DetectionStore::default()).is_empty());
    }

    #[test]
    fn reports_inverted_interval_and_bad_confidence() {
        let mut bad = detection("d1", "cam1").with_confidence(1.4);
        bad.end_time = bad.start_time - chrono::Duration::seconds(30);
        let nan = detection("d2", "cam1").with_confidence(f64::NAN);
        let camera = Camera::new("cam1", "Gate", Coordinate::new(0.0, 0.0))
            .with_detection(bad)
            .with_detection(nan);
        let store = DetectionStore::new(vec![camera], Vec::new());

        let anomalies = audit(&store);
        assert_eq!(anomalies.len(), 3);
        assert_eq!(
            anomalies[0],
            DataAnomaly::InvertedInterval {
                detection_id: "d1".into()
            }
        );
        assert!(matches!(
            anomalies[1],
            DataAnomaly::ConfidenceOutOfRange { confidence, .. } if confidence == 1.4
        ));
        assert_eq!(anomalies[2].detection_id(), "d2");
    }

    #[test]
    fn reports_unknown_and_mismatched_cameras() {
        let camera_a = Camera::new("a", "A", Coordinate::new(0.0, 0.0))
            .with_detection(detection("d1", "ghost"))
            .with_detection(detection("d2", "b"));
        let camera_b = Camera::new("b", "B", Coordinate::new(1.0, 1.0));
        let store = DetectionStore::new(vec![camera_a, camera_b], Vec::new());

        let anomalies = audit(&store);
        assert_eq!(
            anomalies,
            vec![
                DataAnomaly::UnknownCamera {
                    detection_id: "d1".into(),
                    camera_id: "ghost".into(),
                },
                DataAnomaly::CameraMismatch {
                    detection_id: "d2".into(),
                    listed_under: "a".into(),
                    camera_id: "b".into(),
                },
            ]
        );
    }

    #[test]
    fn unknown_object_only_checked_with_registry() {
        let camera = Camera::new("cam1", "Gate", Coordinate::new(0.0, 0.0))
            .with_detection(detection("d1", "cam1"));

        let without_registry = DetectionStore::new(vec![camera.clone()], Vec::new());
        assert!(audit(&without_registry).is_empty());

        let objects = demo::snapshot()
            .objects
            .into_iter()
            .filter(|o| o.id == "obj2")
            .collect();
        let with_registry = DetectionStore::new(vec![camera], objects);
        let anomalies = audit(&with_registry);
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].describe().contains("unknown object 'obj1'"));
    }

    #[test]
    fn audit_does_not_touch_data() {
        let mut bad = detection("d1", "cam1");
        bad.end_time = bad.start_time - chrono::Duration::seconds(1);
        let camera = Camera::new("cam1", "Gate", Coordinate::new(0.0, 0.0)).with_detection(bad);
        let store = DetectionStore::new(vec![camera], Vec::new());
        let before = store.clone();
        let _ = audit(&store);
        assert_eq!(store, before);
    }
}
