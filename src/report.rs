//! Human and JSON rendering of reconstruction results.

use chrono::SecondsFormat;
use colored::Colorize;
use serde_json::{Map, Value, json};

use crate::model::{Coordinate, SCHEMA_VERSION};
use crate::reconstruct::{AnnotatedDetection, CameraSummary, Trajectory};
use crate::store::DataAnomaly;

pub const FIELDS: &[&str] = &["timeline", "path", "cameras", "meta"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    pub raw: bool,
    pub show_disputed: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            raw: false,
            show_disputed: true,
        }
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

fn status_marker(entry: &AnnotatedDetection<'_>, color: bool) -> String {
    let (text, disputed) = if entry.detection.disputed {
        ("disputed", true)
    } else if entry.detection.verified {
        ("verified", false)
    } else {
        ("unverified", false)
    };
    match (color, disputed) {
        (false, _) => text.to_string(),
        (true, true) => text.red().to_string(),
        (true, false) if entry.detection.verified => text.green().to_string(),
        (true, false) => text.yellow().to_string(),
    }
}

fn format_coordinate(c: &Coordinate) -> String {
    format!("{:.5}, {:.5}", c.lat(), c.lon())
}

pub fn render_timeline(timeline: &[AnnotatedDetection<'_>], opts: RenderOptions) -> String {
    let visible: Vec<&AnnotatedDetection<'_>> = timeline
        .iter()
        .filter(|e| opts.show_disputed || !e.detection.disputed)
        .collect();

    let mut out = String::new();
    if opts.raw {
        for (i, entry) in visible.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let d = entry.detection;
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{:.2}\t{}\t{}",
                d.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                d.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                d.id,
                d.camera_id,
                d.confidence,
                status_marker(entry, false),
                d.seek_label(),
            ));
        }
        return out;
    }

    out.push_str(&heading("Timeline:", opts.color));
    if visible.is_empty() {
        out.push_str(" (no detections)");
    }
    for entry in visible {
        let d = entry.detection;
        out.push('\n');
        out.push_str(&format!(
            "  {} - {}  {} [{}]  {} conf={:.2} seek={}",
            d.start_time.format("%Y-%m-%d %H:%M:%S"),
            d.end_time.format("%H:%M:%S"),
            d.id,
            entry.camera_name,
            status_marker(entry, opts.color),
            d.confidence,
            d.seek_label(),
        ));
    }
    out
}

pub fn render_path(path: &[Coordinate], opts: RenderOptions) -> String {
    let mut out = String::new();
    if opts.raw {
        for (i, c) in path.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("{}\t{}", c.lat(), c.lon()));
        }
        return out;
    }

    out.push_str(&heading("Path:", opts.color));
    if path.is_empty() {
        out.push_str(" (no points)");
    }
    for (i, c) in path.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("  {:>3}. {}", i + 1, format_coordinate(c)));
    }
    out
}

pub fn render_cameras(cameras: &[CameraSummary<'_>], opts: RenderOptions) -> String {
    let mut out = String::new();
    if opts.raw {
        for (i, c) in cameras.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!(
                "{}\t{}\t{}\t{}",
                c.id, c.detection_count, c.disputed_count, c.has_dispute
            ));
        }
        return out;
    }

    out.push_str(&heading("Cameras:", opts.color));
    for c in cameras {
        out.push('\n');
        out.push_str(&format!(
            "  {} ({}) at {}: {} detection(s)",
            c.name,
            c.id,
            format_coordinate(&c.location),
            c.detection_count
        ));
        if c.has_dispute {
            let note = format!("time conflict detected, {} disputed", c.disputed_count);
            out.push_str(", ");
            if opts.color {
                out.push_str(&note.red().to_string());
            } else {
                out.push_str(&note);
            }
        }
    }
    out
}

pub fn render_anomalies(anomalies: &[DataAnomaly], color: bool) -> String {
    let mut out = heading("Anomalies:", color);
    if anomalies.is_empty() {
        out.push(' ');
        if color {
            out.push_str(&"none".green().to_string());
        } else {
            out.push_str("none");
        }
    }
    for anomaly in anomalies {
        out.push('\n');
        out.push_str("  ");
        out.push_str(&anomaly.describe());
    }
    out
}

/// JSON document for a trajectory with the stable top-level keys in [`FIELDS`].
pub fn trajectory_json(trajectory: &Trajectory<'_>) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "timeline": serde_json::to_value(&trajectory.timeline)?,
        "path": serde_json::to_value(&trajectory.path)?,
        "cameras": serde_json::to_value(&trajectory.cameras)?,
        "meta": {
            "schema_version": SCHEMA_VERSION,
            "object_id": trajectory.object_id,
            "detections": trajectory.timeline.len(),
            "disputed": trajectory.disputed_count(),
            "points": trajectory.path.len(),
        },
    }))
}

pub fn filter_json_fields(value: Value, fields: &str) -> Result<Value, String> {
    let requested: Vec<&str> = fields
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let obj = value
        .as_object()
        .ok_or_else(|| "expected object".to_string())?;
    let mut map = Map::new();
    for k in requested {
        if let Some(v) = obj.get(k) {
            map.insert(k.to_string(), v.clone());
        } else {
            return Err(format!("unknown field: {}", k));
        }
    }
    Ok(Value::Object(map))
}
