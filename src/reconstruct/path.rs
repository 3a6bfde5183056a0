use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use super::timeline::AnnotatedDetection;
use crate::model::Coordinate;

/// Longest gap between consecutive undisputed sightings that still counts as
/// continuous movement. The comparison is strict.
pub const CONTINUITY_THRESHOLD: Duration = Duration::seconds(300);

/// Where the path walk stands after each detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathState {
    #[default]
    NoPrior,
    /// Start time of the most recent undisputed detection, appended or not
    HasPrior(DateTime<Utc>),
}

impl PathState {
    /// Advance over one detection; returns whether its location joins the path.
    pub fn step(&mut self, entry: &AnnotatedDetection<'_>, threshold: Duration) -> bool {
        let detection = entry.detection;
        if detection.disputed {
            trace!(detection = %detection.id, "skipping disputed detection");
            return false;
        }

        let append = match *self {
            PathState::NoPrior => true,
            PathState::HasPrior(last) => {
                let gap = detection.start_time - last;
                if gap < threshold {
                    true
                } else {
                    debug!(
                        detection = %detection.id,
                        gap_secs = gap.num_seconds(),
                        "gap exceeds continuity threshold, dropping point"
                    );
                    false
                }
            }
        };

        *self = PathState::HasPrior(detection.start_time);
        append
    }
}

/// Path of camera locations using [`CONTINUITY_THRESHOLD`].
pub fn build_path(timeline: &[AnnotatedDetection<'_>]) -> Vec<Coordinate> {
    build_path_with(timeline, CONTINUITY_THRESHOLD)
}

/// Single forward pass over a time-ordered timeline.
///
/// Disputed entries are skipped without touching the state. Every other
/// entry moves the reference time forward, so the gap is always measured
/// from the previous undisputed detection rather than the last appended
/// point. Repeated locations are kept.
pub fn build_path_with(
    timeline: &[AnnotatedDetection<'_>],
    threshold: Duration,
) -> Vec<Coordinate> {
    let mut state = PathState::NoPrior;
    timeline
        .iter()
        .filter_map(|entry| state.step(entry, threshold).then_some(entry.camera_location))
        .collect()
}
