use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Camera, Snapshot, TrackedObject};

pub mod audit;

pub use audit::{DataAnomaly, audit};

/// Anything that can hand the reconstructor a read-only camera list.
pub trait CameraSource {
    fn cameras(&self) -> &[Camera];
}

impl CameraSource for [Camera] {
    fn cameras(&self) -> &[Camera] {
        self
    }
}

impl CameraSource for Vec<Camera> {
    fn cameras(&self) -> &[Camera] {
        self
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read snapshot: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable set of cameras and tracked objects for one view session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionStore {
    cameras: Vec<Camera>,
    objects: Vec<TrackedObject>,
}

impl DetectionStore {
    pub fn new(cameras: Vec<Camera>, objects: Vec<TrackedObject>) -> Self {
        Self { cameras, objects }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::new(snapshot.cameras, snapshot.objects)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Read failures surface as [`StoreError::Read`], bad JSON as [`StoreError::Parse`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, StoreError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json_str(&content)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// All cameras with their detections. No filtering by tracked object.
    pub fn list_cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera(&self, id: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == id)
    }

    /// Lookup table from camera id to camera record
    pub fn camera_index(&self) -> HashMap<&str, &Camera> {
        self.cameras.iter().map(|c| (c.id.as_str(), c)).collect()
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn detection_count(&self) -> usize {
        self.cameras.iter().map(|c| c.detections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            version: Some(crate::model::SCHEMA_VERSION.to_string()),
            cameras: self.cameras.clone(),
            objects: self.objects.clone(),
        }
    }
}

impl CameraSource for DetectionStore {
    fn cameras(&self) -> &[Camera] {
        self.list_cameras()
    }
}

impl From<Snapshot> for DetectionStore {
    fn from(snapshot: Snapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use std::io::Write;

    #[test]
    fn empty_store_lists_nothing() {
        let store = DetectionStore::default();
        assert!(store.list_cameras().is_empty());
        assert!(store.objects().is_empty());
        assert_eq!(store.detection_count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let store = DetectionStore::from(demo::snapshot());
        assert_eq!(store.camera("cam2").map(|c| c.name.as_str()), Some("Park Avenue Camera"));
        assert!(store.camera("cam42").is_none());
        assert_eq!(
            store.object("obj1").map(|o| o.name.as_str()),
            Some("Blue Toyota Camry")
        );

        let index = store.camera_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index["cam3"].name, "Station Camera");
    }

    #[test]
    fn list_cameras_keeps_insertion_order() {
        let store = DetectionStore::from(demo::snapshot());
        let ids: Vec<&str> = store.list_cameras().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cam1", "cam2", "cam3"]);
        assert_eq!(store.detection_count(), 4);
    }

    #[test]
    fn snapshot_round_trip_through_json() {
        let store = DetectionStore::from(demo::snapshot());
        let json = serde_json::to_string(&store.to_snapshot()).unwrap();
        let reloaded = DetectionStore::from_json_str(&json).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = DetectionStore::from_json_str("{\"cameras\": 5}").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    struct BrokenPipe;

    impl std::io::Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn failing_reader_is_a_read_error() {
        let err = DetectionStore::from_reader(BrokenPipe).unwrap_err();
        assert!(matches!(err, StoreError::Read(_)));
        assert!(err.to_string().starts_with("failed to read snapshot"));
    }

    #[test]
    fn reader_with_bad_json_is_a_parse_error() {
        let err = DetectionStore::from_reader("[1, 2".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DetectionStore::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&demo::snapshot()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let store = DetectionStore::load(file.path()).unwrap();
        assert_eq!(store.list_cameras().len(), 3);
    }
}
