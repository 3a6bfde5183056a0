//! Detection-to-trajectory reconstruction.
//!
//! Everything here is a pure function of the camera snapshot it is given:
//! no I/O, no hidden counters, same input gives the same output.

use chrono::Duration;
use serde::Serialize;
use tracing::debug;

use crate::model::{Camera, Coordinate};
use crate::store::CameraSource;

pub mod path;
pub mod timeline;

pub use path::{CONTINUITY_THRESHOLD, PathState, build_path, build_path_with};
pub use timeline::{AnnotatedDetection, build_timeline, scope_to_object};

/// Per-camera view of the detection set, in camera iteration order.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub location: Coordinate,
    pub detection_count: usize,
    pub disputed_count: usize,
    pub has_dispute: bool,
}

impl<'a> CameraSummary<'a> {
    fn from_camera(camera: &'a Camera, object_id: Option<&str>) -> Self {
        let detections: Vec<_> = camera
            .detections
            .iter()
            .filter(|d| object_id.is_none_or(|id| d.object_id == id))
            .collect();
        let disputed_count = detections.iter().filter(|d| d.disputed).count();
        Self {
            id: &camera.id,
            name: &camera.name,
            location: camera.location,
            detection_count: detections.len(),
            disputed_count,
            has_dispute: disputed_count > 0,
        }
    }
}

pub fn summarize_cameras(cameras: &[Camera]) -> Vec<CameraSummary<'_>> {
    cameras
        .iter()
        .map(|camera| CameraSummary::from_camera(camera, None))
        .collect()
}

/// Timeline, path and camera summaries derived from one snapshot.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Trajectory<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<&'a str>,
    pub timeline: Vec<AnnotatedDetection<'a>>,
    pub path: Vec<Coordinate>,
    pub cameras: Vec<CameraSummary<'a>>,
}

impl Trajectory<'_> {
    pub fn disputed_count(&self) -> usize {
        self.timeline.iter().filter(|e| e.detection.disputed).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstructor {
    threshold: Duration,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self {
            threshold: CONTINUITY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Build the full trajectory, optionally scoped to one tracked object.
    pub fn reconstruct<'a, S>(&self, source: &'a S, object_id: Option<&'a str>) -> Trajectory<'a>
    where
        S: CameraSource + ?Sized,
    {
        let cameras = source.cameras();
        let mut timeline = build_timeline(cameras);
        if let Some(id) = object_id {
            timeline = scope_to_object(timeline, id);
        }
        let path = build_path_with(&timeline, self.threshold);

        debug!(
            detections = timeline.len(),
            points = path.len(),
            object = object_id.unwrap_or("*"),
            "reconstructed trajectory"
        );

        Trajectory {
            object_id,
            cameras: cameras
                .iter()
                .map(|camera| CameraSummary::from_camera(camera, object_id))
                .collect(),
            timeline,
            path,
        }
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}
