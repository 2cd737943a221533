//! # Bookmark Export & Import
//!
//! Serializes camera paths into the external editor's bookmark list and the
//! Heck-style level JSON, and rebuilds paths from bookmark lists.
//!
//! ## Responsibilities
//! - **Commands**: one compound command per waypoint (pose + outgoing easing).
//! - **Bookmarks**: `{ "_time": beat, "_name": command }` entries, both ways.
//! - **Level JSON**: `_pointDefinitions` and an `AnimateTrack` custom event.

use crate::beats::{beats_to_ms, beat_to_normalized, normalized_to_beat, path_beat_duration};
use crate::codec::{long_prefix, EasingCommand, PositionCommand, ScriptMapperCodec};
use crate::interpolate::{effective_position, effective_rotation};
use crate::registry::EasingRegistry;
use scriptcam_data::{
    CameraPath, CameraSegment, CameraWaypoint, CoordinateSystem, FunctionId, Position, Rotation,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// FOV used when a command carries none.
pub const DEFAULT_FOV: f64 = 60.0;

/// Export settings. Every field has a default so partial config files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Track name targeted by the level custom event.
    pub track: String,
    /// Field of view written into generated `q_`/`dpos_` commands.
    pub fov: f64,
    pub include_rotation: bool,
    /// Append the outgoing segment's easing command to each bookmark.
    pub append_easing: bool,
    /// Overrides the path's `beatOffset`.
    pub beat_offset: Option<f64>,
    /// `IOSine` rather than `InOutSine`.
    pub short_commands: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            track: "camera".to_string(),
            fov: DEFAULT_FOV,
            include_rotation: true,
            append_easing: true,
            beat_offset: None,
            short_commands: true,
        }
    }
}

/// One entry of the editor's bookmark list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_name")]
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("path `{0}` has neither a bpm nor a beat duration")]
    MissingTempo(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no bookmark carries a q_ or dpos_ command")]
    NoBookmarks,
}

/// The waypoint's stored command, or a generated `q_`/`dpos_` for its pose.
pub fn waypoint_command(waypoint: &CameraWaypoint, fov: f64) -> String {
    if let Some(command) = &waypoint.bookmark_command {
        return command.clone();
    }
    let command = match waypoint.rotation {
        Some(rotation) => PositionCommand::Q {
            position: waypoint.position,
            rotation,
            fov,
        },
        None => PositionCommand::Dpos {
            position: waypoint.position,
            fov,
        },
    };
    command.to_string()
}

/// Easing command for a segment, or `None` when it exports as linear.
///
/// `rawCommand` is kept verbatim while it still decodes to the segment's
/// easing; functions without a ScriptMapper equivalent are dropped with a
/// warning.
pub fn segment_command(
    codec: &ScriptMapperCodec<'_>,
    segment: &CameraSegment,
    short: bool,
) -> Option<String> {
    if !segment.easing_enabled {
        return None;
    }
    if let Some(raw) = &segment.raw_command {
        if codec.parse(raw).is_some_and(|parsed| describes(&parsed, segment)) {
            return Some(raw.trim().to_string());
        }
    }
    if segment.function_id == FunctionId::Linear {
        return None;
    }

    let command = if short {
        codec.format_short(&segment.function_id, segment.ease_type, segment.drift_params)
    } else {
        codec.format(&segment.function_id, segment.ease_type, segment.drift_params)
    };
    if command.is_none() {
        warn!(
            "Segment '{}' uses '{}' which has no ScriptMapper command, exporting as linear",
            segment.id, segment.function_id
        );
    }
    command
}

/// Drift commands carry no ease type, so only id and params are compared.
fn describes(command: &EasingCommand, segment: &CameraSegment) -> bool {
    if command.function_id != segment.function_id {
        return false;
    }
    match command.function_id {
        FunctionId::Drift => command.params == segment.drift_params,
        _ => command.ease_type == segment.ease_type,
    }
}

/// `command` without any easing parts.
fn strip_easing(codec: &ScriptMapperCodec<'_>, command: &str) -> String {
    command
        .split(',')
        .filter(|part| codec.parse(part).is_none())
        .collect::<Vec<_>>()
        .join(",")
}

/// Heck point easing name (`easeInOutSine`). Drift has no counterpart.
pub fn heck_easing_name(registry: &EasingRegistry, segment: &CameraSegment) -> Option<String> {
    if !segment.easing_enabled {
        return None;
    }
    let info = registry.get(&segment.function_id)?;
    if info.is_parametric {
        return None;
    }
    let base_name = info.script_mapper_name?;
    Some(format!("ease{}{}", long_prefix(segment.ease_type), base_name))
}

pub fn to_bookmarks(
    codec: &ScriptMapperCodec<'_>,
    path: &CameraPath,
    options: &ExportOptions,
) -> Result<Vec<Bookmark>, ExportError> {
    let span = path_beat_duration(path).ok_or_else(|| ExportError::MissingTempo(path.id.clone()))?;
    let offset = options.beat_offset.or(path.beat_offset).unwrap_or(0.0);

    let bookmarks = path
        .waypoints
        .iter()
        .enumerate()
        .map(|(i, waypoint)| {
            let mut name = waypoint_command(waypoint, options.fov);
            let outgoing = path.segments.get(i).filter(|_| options.append_easing);
            // The segment owns the easing, so a stored one is replaced.
            if outgoing.is_some() && codec.extract_easing(&name).is_some() {
                name = strip_easing(codec, &name);
            }
            let easing = outgoing
                .and_then(|segment| segment_command(codec, segment, options.short_commands));
            if let Some(easing) = easing {
                name.push(',');
                name.push_str(&easing);
            }
            Bookmark {
                time: offset + normalized_to_beat(waypoint.time, span),
                name,
            }
        })
        .collect();

    Ok(bookmarks)
}

/// Rebuilds a path from a bookmark list.
///
/// Entries without a position command are skipped. A `dpos_` missing its FOV
/// gets [`DEFAULT_FOV`]. Times are normalised over
/// the beat span between the first and last kept entry, and each entry's
/// easing command configures the segment leaving it.
pub fn from_bookmarks(
    codec: &ScriptMapperCodec<'_>,
    id: impl Into<String>,
    name: impl Into<String>,
    bookmarks: &[Bookmark],
    bpm: Option<f64>,
) -> Result<CameraPath, ImportError> {
    let mut entries: Vec<(&Bookmark, PositionCommand)> = bookmarks
        .iter()
        .filter_map(|bookmark| {
            match PositionCommand::find_in_lenient(&bookmark.name, DEFAULT_FOV) {
                Some(command) => Some((bookmark, command)),
                None => {
                    debug!(
                        "Skipping bookmark '{}' at beat {}: no position command",
                        bookmark.name, bookmark.time
                    );
                    None
                }
            }
        })
        .collect();
    entries.sort_by(|a, b| a.0.time.total_cmp(&b.0.time));

    let (first, last) = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => (first.0.time, last.0.time),
        _ => return Err(ImportError::NoBookmarks),
    };
    let span = last - first;

    let waypoints = entries
        .iter()
        .enumerate()
        .map(|(i, (bookmark, command))| {
            let mut waypoint = CameraWaypoint::new(
                format!("wp-{i}"),
                beat_to_normalized(bookmark.time - first, span),
                command.position(),
            )
            .with_bookmark_command(bookmark.name.trim());
            waypoint.rotation = command.rotation();
            waypoint.beat = Some(bookmark.time);
            waypoint
        })
        .collect();

    let total_duration = bpm.map(|bpm| beats_to_ms(span, bpm)).unwrap_or(0.0);
    let mut path = CameraPath::new(id, name, total_duration).with_waypoints(waypoints);
    path.bpm = bpm;
    path.beat_offset = Some(first);
    path.beat_duration = Some(span);

    for (segment, (bookmark, _)) in path.segments.iter_mut().zip(&entries) {
        let Some(raw) = codec.extract_easing(&bookmark.name) else {
            continue;
        };
        if let Some(easing) = codec.parse(raw) {
            segment.function_id = easing.function_id;
            segment.ease_type = easing.ease_type;
            segment.drift_params = easing.params;
            segment.raw_command = Some(raw.to_string());
        }
    }

    Ok(path)
}

fn to_left_handed(
    system: CoordinateSystem,
    position: Position,
    rotation: Rotation,
) -> (Position, Rotation) {
    match system {
        CoordinateSystem::LeftHanded => (position, rotation),
        CoordinateSystem::RightHanded => (
            Position::new(position.x, position.y, -position.z),
            Rotation::new(-rotation.rx, -rotation.ry, rotation.rz),
        ),
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if slug.is_empty() {
        "path".to_string()
    } else {
        slug
    }
}

/// Level `_customData` block: point definitions for the path, an
/// `AnimateTrack` event spanning it, and the bookmark list.
pub fn to_level_json(
    codec: &ScriptMapperCodec<'_>,
    path: &CameraPath,
    options: &ExportOptions,
) -> Result<Value, ExportError> {
    let span = path_beat_duration(path).ok_or_else(|| ExportError::MissingTempo(path.id.clone()))?;
    let offset = options.beat_offset.or(path.beat_offset).unwrap_or(0.0);
    let registry = codec.registry();

    let mut position_points = Vec::with_capacity(path.waypoints.len());
    let mut rotation_points = Vec::with_capacity(path.waypoints.len());
    for (i, waypoint) in path.waypoints.iter().enumerate() {
        let (p, r) = to_left_handed(
            path.coordinate_system,
            effective_position(waypoint),
            effective_rotation(waypoint).unwrap_or_default(),
        );
        // A point's easing governs the transition arriving at it.
        let easing = i
            .checked_sub(1)
            .and_then(|prev| path.segments.get(prev))
            .and_then(|segment| heck_easing_name(registry, segment));

        let mut position = vec![json!(p.x), json!(p.y), json!(p.z), json!(waypoint.time)];
        let mut rotation = vec![json!(r.rx), json!(r.ry), json!(r.rz), json!(waypoint.time)];
        if let Some(easing) = easing {
            position.push(json!(easing));
            rotation.push(json!(easing));
        }
        position_points.push(Value::Array(position));
        rotation_points.push(Value::Array(rotation));
    }

    let base = slug(&path.name);
    let position_name = format!("{base}_position");
    let rotation_name = format!("{base}_rotation");

    let mut point_definitions = vec![json!({
        "_name": position_name,
        "_points": position_points,
    })];
    let mut event_data = json!({
        "_track": options.track,
        "_duration": span,
        "_position": position_name,
    });
    if options.include_rotation {
        point_definitions.push(json!({
            "_name": rotation_name,
            "_points": rotation_points,
        }));
        event_data["_rotation"] = json!(rotation_name);
    }

    let bookmarks = to_bookmarks(codec, path, options)?;

    Ok(json!({
        "_customData": {
            "_pointDefinitions": point_definitions,
            "_customEvents": [{
                "_time": offset,
                "_type": "AnimateTrack",
                "_data": event_data,
            }],
            "_bookmarks": bookmarks,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcam_data::{DriftParams, EaseType};

    fn codec() -> ScriptMapperCodec<'static> {
        ScriptMapperCodec::default()
    }

    fn sample_path() -> CameraPath {
        let mut path = CameraPath::new("p1", "Sweep Left", 4000.0).with_waypoints(vec![
            CameraWaypoint::new("a", 0.0, Position::new(0.0, 1.5, -4.0)),
            CameraWaypoint::new("b", 0.5, Position::new(2.0, 2.0, -2.0))
                .with_rotation(Rotation::new(10.0, 45.0, 0.0)),
            CameraWaypoint::new("c", 1.0, Position::new(4.0, 1.0, 0.0))
                .with_rotation(Rotation::new(0.0, 90.0, 0.0)),
        ]);
        path.bpm = Some(120.0);
        path.segments[0].function_id = FunctionId::Quadratic;
        path.segments[0].ease_type = EaseType::EaseIn;
        path.segments[1].function_id = FunctionId::Trigonometric;
        path.segments[1].ease_type = EaseType::EaseBoth;
        path
    }

    #[test]
    fn test_waypoint_command_generation() {
        let plain = CameraWaypoint::new("a", 0.0, Position::new(0.0, 1.5, -4.0));
        assert_eq!(waypoint_command(&plain, 60.0), "dpos_0_1.5_-4_60");

        let rotated = plain.clone().with_rotation(Rotation::new(0.0, 30.0, 0.0));
        assert_eq!(waypoint_command(&rotated, 75.0), "q_0_1.5_-4_0_30_0_75");

        let stored = plain.with_bookmark_command("center,spin60");
        assert_eq!(waypoint_command(&stored, 60.0), "center,spin60");
    }

    #[test]
    fn test_segment_command_rules() {
        let c = codec();
        let mut segment = CameraSegment::new("s", "a", "b", FunctionId::Back, EaseType::EaseOut);
        assert_eq!(segment_command(&c, &segment, true).as_deref(), Some("OBack"));
        assert_eq!(segment_command(&c, &segment, false).as_deref(), Some("OutBack"));

        segment.raw_command = Some("OutBack".to_string());
        assert_eq!(segment_command(&c, &segment, true).as_deref(), Some("OutBack"));

        // A raw command left over from before an edit no longer applies.
        segment.raw_command = Some("IBack".to_string());
        assert_eq!(segment_command(&c, &segment, true).as_deref(), Some("OBack"));
        segment.function_id = FunctionId::Linear;
        assert_eq!(segment_command(&c, &segment, true), None);

        segment.easing_enabled = false;
        assert_eq!(segment_command(&c, &segment, true), None);

        let hermite = CameraSegment::new("h", "a", "b", FunctionId::Hermite, EaseType::EaseIn);
        assert_eq!(segment_command(&c, &hermite, true), None);

        let drift = CameraSegment::linear("d", "a", "b").with_drift(DriftParams::new(2.0, 8.0));
        assert_eq!(segment_command(&c, &drift, true).as_deref(), Some("ease_2_8"));
    }

    #[test]
    fn test_heck_easing_names() {
        let registry = EasingRegistry::builtin();
        let segment = CameraSegment::new("s", "a", "b", FunctionId::Trigonometric, EaseType::EaseBoth);
        assert_eq!(heck_easing_name(&registry, &segment).as_deref(), Some("easeInOutSine"));

        let drift = CameraSegment::linear("d", "a", "b").with_drift(DriftParams::default());
        assert_eq!(heck_easing_name(&registry, &drift), None);
        assert_eq!(heck_easing_name(&registry, &CameraSegment::linear("l", "a", "b")), None);
    }

    #[test]
    fn test_to_bookmarks() {
        let bookmarks = to_bookmarks(&codec(), &sample_path(), &ExportOptions::default()).unwrap();
        assert_eq!(
            bookmarks,
            vec![
                Bookmark { time: 0.0, name: "dpos_0_1.5_-4_60,IQuad".to_string() },
                Bookmark { time: 4.0, name: "q_2_2_-2_10_45_0_60,IOSine".to_string() },
                Bookmark { time: 8.0, name: "q_4_1_0_0_90_0_60".to_string() },
            ]
        );
    }

    #[test]
    fn test_to_bookmarks_requires_tempo() {
        let mut path = sample_path();
        path.bpm = None;
        assert!(matches!(
            to_bookmarks(&codec(), &path, &ExportOptions::default()),
            Err(ExportError::MissingTempo(id)) if id == "p1"
        ));
    }

    #[test]
    fn test_stored_easing_is_replaced_by_segment_easing() {
        let mut path = sample_path();
        path.waypoints[0].bookmark_command = Some("dpos_0_0_0_60,OCirc,spin60".to_string());
        path.waypoints[2].bookmark_command = Some("dpos_4_1_0_60,OCirc".to_string());
        let options = ExportOptions {
            beat_offset: Some(16.0),
            ..Default::default()
        };
        let bookmarks = to_bookmarks(&codec(), &path, &options).unwrap();
        assert_eq!(bookmarks[0].name, "dpos_0_0_0_60,spin60,IQuad");
        assert_eq!(bookmarks[0].time, 16.0);
        // The last waypoint has no outgoing segment; its text is kept.
        assert_eq!(bookmarks[2].name, "dpos_4_1_0_60,OCirc");

        path.segments[0].function_id = FunctionId::Linear;
        let bookmarks = to_bookmarks(&codec(), &path, &options).unwrap();
        assert_eq!(bookmarks[0].name, "dpos_0_0_0_60,spin60");
    }

    #[test]
    fn test_edited_import_exports_current_easing() {
        let c = codec();
        let imported = vec![
            Bookmark { time: 0.0, name: "dpos_0_0_0_60,IBack".to_string() },
            Bookmark { time: 8.0, name: "dpos_1_0_0_60".to_string() },
        ];
        let mut path = from_bookmarks(&c, "p", "P", &imported, Some(120.0)).unwrap();
        let before = to_bookmarks(&c, &path, &ExportOptions::default()).unwrap();
        assert_eq!(before[0].name, "dpos_0_0_0_60,IBack");

        path.segments[0].function_id = FunctionId::Cubic;
        path.segments[0].ease_type = EaseType::EaseOut;
        let bookmarks = to_bookmarks(&c, &path, &ExportOptions::default()).unwrap();
        assert_eq!(bookmarks[0].name, "dpos_0_0_0_60,OCubic");

        let reimported = from_bookmarks(&c, "p", "P", &bookmarks, Some(120.0)).unwrap();
        assert_eq!(reimported.segments[0].function_id, FunctionId::Cubic);
        assert_eq!(reimported.segments[0].ease_type, EaseType::EaseOut);
    }

    #[test]
    fn test_from_bookmarks_recovers_path() {
        let bookmarks = vec![
            Bookmark { time: 12.0, name: "q_0_1_2_0_90_0_60, spin60, IBack".to_string() },
            Bookmark { time: 14.0, name: "center".to_string() },
            Bookmark { time: 20.0, name: "dpos_4_1_-2_70".to_string() },
        ];
        let path = from_bookmarks(&codec(), "imported", "Imported", &bookmarks, Some(120.0)).unwrap();

        assert_eq!(path.waypoints.len(), 2);
        assert_eq!(path.segments.len(), 1);
        assert_eq!(path.beat_offset, Some(12.0));
        assert_eq!(path.beat_duration, Some(8.0));
        assert_eq!(path.total_duration, 4000.0);

        let first = &path.waypoints[0];
        assert_eq!(first.time, 0.0);
        assert_eq!(first.position, Position::new(0.0, 1.0, 2.0));
        assert_eq!(first.rotation, Some(Rotation::new(0.0, 90.0, 0.0)));
        assert_eq!(path.waypoints[1].time, 1.0);
        assert_eq!(path.waypoints[1].rotation, None);

        let segment = &path.segments[0];
        assert_eq!(segment.function_id, FunctionId::Back);
        assert_eq!(segment.ease_type, EaseType::EaseIn);
        assert_eq!(segment.raw_command.as_deref(), Some("IBack"));
        assert!(path.check_invariants().is_empty());
    }

    #[test]
    fn test_from_bookmarks_accepts_dpos_without_fov() {
        let bookmarks = vec![
            Bookmark { time: 4.0, name: "dpos_-0.5_3_-3,spin60,IBack".to_string() },
            Bookmark { time: 8.0, name: "dpos_0_0_0".to_string() },
        ];
        let path = from_bookmarks(&codec(), "short", "Short", &bookmarks, Some(120.0)).unwrap();
        assert_eq!(path.waypoints.len(), 2);
        assert_eq!(path.waypoints[0].position, Position::new(-0.5, 3.0, -3.0));
        assert_eq!(path.waypoints[1].position, Position::new(0.0, 0.0, 0.0));
        assert_eq!(path.segments[0].function_id, FunctionId::Back);
    }

    #[test]
    fn test_from_bookmarks_without_positions_fails() {
        let bookmarks = vec![Bookmark { time: 1.0, name: "spin".to_string() }];
        assert!(matches!(
            from_bookmarks(&codec(), "x", "X", &bookmarks, None),
            Err(ImportError::NoBookmarks)
        ));
    }

    #[test]
    fn test_level_json_shape() {
        let value = to_level_json(&codec(), &sample_path(), &ExportOptions::default()).unwrap();
        let data = &value["_customData"];

        let defs = data["_pointDefinitions"].as_array().unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0]["_name"], "sweep_left_position");
        assert_eq!(defs[0]["_points"][0], json!([0.0, 1.5, -4.0, 0.0]));
        assert_eq!(defs[0]["_points"][1], json!([2.0, 2.0, -2.0, 0.5, "easeInQuad"]));
        assert_eq!(defs[0]["_points"][2], json!([4.0, 1.0, 0.0, 1.0, "easeInOutSine"]));
        assert_eq!(defs[1]["_points"][1], json!([10.0, 45.0, 0.0, 0.5, "easeInQuad"]));

        let event = &data["_customEvents"][0];
        assert_eq!(event["_type"], "AnimateTrack");
        assert_eq!(event["_time"], 0.0);
        assert_eq!(event["_data"]["_track"], "camera");
        assert_eq!(event["_data"]["_duration"], 8.0);
        assert_eq!(event["_data"]["_rotation"], "sweep_left_rotation");
        assert_eq!(data["_bookmarks"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_level_json_converts_right_handed_paths() {
        let mut path = sample_path();
        path.coordinate_system = CoordinateSystem::RightHanded;
        let options = ExportOptions {
            include_rotation: false,
            ..Default::default()
        };
        let value = to_level_json(&codec(), &path, &options).unwrap();
        let defs = value["_customData"]["_pointDefinitions"].as_array().unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0]["_points"][0], json!([0.0, 1.5, 4.0, 0.0]));
        assert!(value["_customData"]["_customEvents"][0]["_data"]
            .get("_rotation")
            .is_none());
    }

    #[test]
    fn test_export_options_fill_missing_fields() {
        let options: ExportOptions = serde_json::from_str(r#"{ "track": "cam2" }"#).unwrap();
        assert_eq!(options.track, "cam2");
        assert_eq!(options.fov, 60.0);
        assert!(options.append_easing);
    }
}
