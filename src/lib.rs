pub mod config;
pub mod demo;
pub mod model;
pub mod reconstruct;
pub mod report;
pub mod store;

pub use model::{Camera, Coordinate, Detection, Snapshot, TrackedObject};
pub use reconstruct::{Reconstructor, Trajectory, build_path, build_timeline};
pub use store::{CameraSource, DetectionStore};
