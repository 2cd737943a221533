//! Beat/time conversion.
//!
//! None of these functions validate BPM; the caller keeps it in a sane range.

use scriptcam_data::CameraPath;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Number of beats spanned by `total_duration_ms` at `bpm`.
pub fn calculate_beat_duration(total_duration_ms: f64, bpm: f64) -> f64 {
    total_duration_ms / (MS_PER_MINUTE / bpm)
}

pub fn normalized_to_beat(time: f64, beat_duration: f64) -> f64 {
    time * beat_duration
}

/// Inverse of [`normalized_to_beat`]. A zero-length span maps everything to 0.
pub fn beat_to_normalized(beat: f64, beat_duration: f64) -> f64 {
    if beat_duration == 0.0 {
        return 0.0;
    }
    beat / beat_duration
}

pub fn beats_to_ms(beats: f64, bpm: f64) -> f64 {
    beats * (MS_PER_MINUTE / bpm)
}

/// Beats spanned by the path: the explicit `beatDuration` if set, otherwise
/// derived from `totalDuration` and `bpm`. `None` without either.
pub fn path_beat_duration(path: &CameraPath) -> Option<f64> {
    path.beat_duration
        .or_else(|| path.bpm.map(|bpm| calculate_beat_duration(path.total_duration, bpm)))
}

/// Absolute beat of a normalized time on `path`, including its `beatOffset`.
pub fn waypoint_beat(path: &CameraPath, time: f64) -> Option<f64> {
    let span = path_beat_duration(path)?;
    Some(path.beat_offset.unwrap_or(0.0) + normalized_to_beat(time, span))
}

/// Returns a copy of `path` with every waypoint's display `beat` filled in.
/// Paths without tempo information come back unchanged.
pub fn annotate_beats(path: &CameraPath) -> CameraPath {
    let mut annotated = path.clone();
    if path_beat_duration(path).is_none() {
        return annotated;
    }
    for waypoint in &mut annotated.waypoints {
        waypoint.beat = waypoint_beat(path, waypoint.time);
    }
    annotated
}
