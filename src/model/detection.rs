use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One observation of a tracked object by one camera.
///
/// Records are taken as delivered: an inverted interval or an out-of-range
/// confidence is carried through untouched (see [`crate::store::audit`]).
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: String,
    pub camera_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub confidence: f64,
    pub object_id: String,
    #[serde(default)]
    pub verified: bool,
    /// Authoritative for path inclusion regardless of `verified`
    #[serde(default)]
    pub disputed: bool,
    /// Offset in seconds into the camera footage matching `start_time`
    #[serde(default)]
    pub video_start_time: f64,
}

impl Detection {
    /// Create an undisputed, unverified detection with full confidence
    pub fn new(
        id: impl Into<String>,
        camera_id: impl Into<String>,
        object_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            camera_id: camera_id.into(),
            start_time,
            end_time,
            confidence: 1.0,
            object_id: object_id.into(),
            verified: false,
            disputed: false,
            video_start_time: 0.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn disputed(mut self) -> Self {
        self.disputed = true;
        self
    }

    pub fn with_video_start(mut self, seconds: f64) -> Self {
        self.video_start_time = seconds;
        self
    }

    /// Length of the observation; negative for an inverted interval
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_inverted(&self) -> bool {
        self.end_time < self.start_time
    }

    /// Footage offset as `m:ss`, e.g. `7:30` for 450 seconds
    pub fn seek_label(&self) -> String {
        let total = if self.video_start_time.is_finite() && self.video_start_time > 0.0 {
            self.video_start_time.trunc() as u64
        } else {
            0
        };
        format!("{}:{:02}", total / 60, total % 60)
    }
}
