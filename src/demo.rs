//! Sample data for trying the tool without an ingestion pipeline.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    Camera, Coordinate, Detection, ObjectKind, SCHEMA_VERSION, Snapshot, TrackedObject,
};

fn march_first(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn sighting(id: &str, camera_id: &str, start: (u32, u32), end: (u32, u32)) -> Detection {
    Detection::new(
        id,
        camera_id,
        "obj1",
        march_first(start.0, start.1),
        march_first(end.0, end.1),
    )
}

/// Three cameras following a blue sedan, one of the sightings contested.
pub fn snapshot() -> Snapshot {
    let cameras = vec![
        Camera::new("cam1", "Main Street Camera", Coordinate::new(51.505, -0.09))
            .with_detection(
                sighting("det1", "cam1", (10, 0), (10, 5))
                    .with_confidence(0.95)
                    .verified()
                    .with_video_start(120.0),
            )
            .with_detection(
                sighting("det2", "cam1", (10, 15), (10, 20))
                    .with_confidence(0.92)
                    .verified()
                    .with_video_start(450.0),
            ),
        Camera::new("cam2", "Park Avenue Camera", Coordinate::new(51.51, -0.1)).with_detection(
            sighting("det3", "cam2", (10, 30), (10, 35))
                .with_confidence(0.88)
                .verified()
                .with_video_start(180.0),
        ),
        Camera::new("cam3", "Station Camera", Coordinate::new(51.515, -0.095)).with_detection(
            sighting("det4", "cam3", (10, 30), (10, 35))
                .with_confidence(0.85)
                .disputed()
                .with_video_start(300.0),
        ),
    ];

    let objects = vec![
        TrackedObject {
            id: "obj1".into(),
            name: "Blue Toyota Camry".into(),
            description: "Blue sedan with tinted windows".into(),
            reference_images: Vec::new(),
            kind: ObjectKind::Vehicle,
        },
        TrackedObject {
            id: "obj2".into(),
            name: "Person in Red Jacket".into(),
            description: "Male, approximately 6ft tall".into(),
            reference_images: Vec::new(),
            kind: ObjectKind::Person,
        },
    ];

    Snapshot {
        version: Some(SCHEMA_VERSION.to_string()),
        cameras,
        objects,
    }
}
