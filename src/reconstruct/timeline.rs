use serde::Serialize;

use crate::model::{Camera, Coordinate, Detection};

/// A detection carrying its owning camera's name and location.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDetection<'a> {
    #[serde(flatten)]
    pub detection: &'a Detection,
    pub camera_name: &'a str,
    pub camera_location: Coordinate,
}

impl<'a> AnnotatedDetection<'a> {
    pub fn new(camera: &'a Camera, detection: &'a Detection) -> Self {
        Self {
            detection,
            camera_name: &camera.name,
            camera_location: camera.location,
        }
    }
}

/// Flatten every detection of every camera and order by `start_time`.
///
/// The sort is stable: equal start times keep camera order, then list order.
/// Nothing is filtered, disputed detections included.
pub fn build_timeline(cameras: &[Camera]) -> Vec<AnnotatedDetection<'_>> {
    let mut timeline: Vec<AnnotatedDetection<'_>> = cameras
        .iter()
        .flat_map(|camera| {
            camera
                .detections
                .iter()
                .map(move |detection| AnnotatedDetection::new(camera, detection))
        })
        .collect();
    timeline.sort_by_key(|entry| entry.detection.start_time);
    timeline
}

/// Keep only entries attributed to `object_id`, preserving order.
pub fn scope_to_object<'a>(
    timeline: Vec<AnnotatedDetection<'a>>,
    object_id: &str,
) -> Vec<AnnotatedDetection<'a>> {
    timeline
        .into_iter()
        .filter(|entry| entry.detection.object_id == object_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_709_287_200 + secs, 0).unwrap()
    }

    fn camera(id: &str, lat: f64, detections: &[(&str, i64)]) -> Camera {
        detections.iter().fold(
            Camera::new(id, format!("{} camera", id), Coordinate::new(lat, 0.0)),
            |cam, (det_id, t)| {
                cam.with_detection(Detection::new(*det_id, id, "obj1", at(*t), at(*t + 30)))
            },
        )
    }

    fn ids<'a>(timeline: &'a [AnnotatedDetection<'_>]) -> Vec<&'a str> {
        timeline.iter().map(|e| e.detection.id.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_empty_timeline() {
        assert!(build_timeline(&[]).is_empty());
    }

    #[test]
    fn orders_across_cameras() {
        let cameras = vec![
            camera("a", 1.0, &[("a1", 300), ("a2", 10)]),
            camera("b", 2.0, &[("b1", 100)]),
        ];
        let timeline = build_timeline(&cameras);
        assert_eq!(ids(&timeline), vec!["a2", "b1", "a1"]);
        assert_eq!(timeline[1].camera_name, "b camera");
        assert_eq!(timeline[1].camera_location, Coordinate::new(2.0, 0.0));
    }

    #[test]
    fn ties_keep_camera_then_list_order() {
        let cameras = vec![
            camera("a", 1.0, &[("a1", 50), ("a2", 50)]),
            camera("b", 2.0, &[("b1", 50), ("b0", 0)]),
        ];
        let first = build_timeline(&cameras);
        assert_eq!(ids(&first), vec!["b0", "a1", "a2", "b1"]);

        for _ in 0..5 {
            assert_eq!(ids(&build_timeline(&cameras)), ids(&first));
        }
    }

    #[test]
    fn disputed_detections_stay_on_timeline() {
        let snapshot = demo::snapshot();
        let timeline = build_timeline(&snapshot.cameras);
        assert_eq!(timeline.len(), 4);
        assert_eq!(ids(&timeline), vec!["det1", "det2", "det3", "det4"]);
        assert!(timeline[3].detection.disputed);
    }

    #[test]
    fn inverted_intervals_sort_by_start() {
        let mut inverted = Detection::new("late", "a", "obj1", at(500), at(0));
        inverted.confidence = 7.0;
        let cameras = vec![camera("a", 1.0, &[("early", 100)]).with_detection(inverted)];
        let timeline = build_timeline(&cameras);
        assert_eq!(ids(&timeline), vec!["early", "late"]);
        assert_eq!(timeline[1].detection.confidence, 7.0);
    }

    #[test]
    fn scoping_filters_by_object() {
        let mut cameras = vec![camera("a", 1.0, &[("a1", 0), ("a2", 20)])];
        cameras[0].detections[1].object_id = "obj2".into();

        let scoped = scope_to_object(build_timeline(&cameras), "obj2");
        assert_eq!(ids(&scoped), vec!["a2"]);
        assert!(scope_to_object(build_timeline(&cameras), "nobody").is_empty());
    }

    #[test]
    fn serializes_flat_with_camera_fields() {
        let snapshot = demo::snapshot();
        let timeline = build_timeline(&snapshot.cameras);
        let value = serde_json::to_value(&timeline[0]).unwrap();
        assert_eq!(value["id"], "det1");
        assert_eq!(value["cameraId"], "cam1");
        assert_eq!(value["cameraName"], "Main Street Camera");
        assert_eq!(value["cameraLocation"], serde_json::json!([51.505, -0.09]));
    }
}
