//! # Segment Locator & Interpolator
//!
//! Maps a global progress value onto a camera path: finds the active
//! segment, applies its easing to the local progress and lerps the pose.
//!
//! ## Responsibilities
//! - **Boundaries**: waypoint times as segment boundaries.
//! - **Segment lookup**: binary search over segment start times.
//! - **Pose**: component-wise position lerp, Euler rotation lerp.
//!
//! The interpolator only reads the path. Paths that break their invariants
//! mid-edit (unordered or out-of-range times, missing segments) still
//! produce a pose rather than an error.

use crate::codec::PositionCommand;
use crate::registry::EasingRegistry;
use glam::DVec3;
use scriptcam_data::{CameraPath, CameraSegment, CameraWaypoint, Position, Rotation};

/// How Euler rotations are blended between waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Plain component-wise lerp of the stored angles.
    #[default]
    Linear,
    /// Each component takes the shorter way around the circle.
    ShortestPath,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolationOptions {
    pub rotation_mode: RotationMode,
    /// Read poses from `q_`/`dpos_` bookmark commands when present.
    pub use_bookmark_poses: bool,
}

/// Result of [`interpolate_camera_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult<'a> {
    pub position: DVec3,
    /// Degrees; `None` unless both endpoints carry a rotation.
    pub rotation: Option<DVec3>,
    pub current_segment_index: usize,
    pub current_segment: Option<&'a CameraSegment>,
    /// Progress within the segment before easing.
    pub segment_local_time: f64,
    /// Progress within the segment after easing.
    pub eased_local_time: f64,
    /// Eased progress mapped back onto the global timeline.
    pub eased_output: f64,
}

pub fn position_to_vec(p: &Position) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

pub fn rotation_to_vec(r: &Rotation) -> DVec3 {
    DVec3::new(r.rx, r.ry, r.rz)
}

pub fn vec_to_position(v: DVec3) -> Position {
    Position::new(v.x, v.y, v.z)
}

pub fn vec_to_rotation(v: DVec3) -> Rotation {
    Rotation::new(v.x, v.y, v.z)
}

/// The waypoint times, in waypoint order.
pub fn segment_boundaries(path: &CameraPath) -> Vec<f64> {
    path.waypoints.iter().map(|wp| wp.time).collect()
}

/// Applies a segment's easing to its local progress. Disabled easing is linear.
pub fn calculate_segment_output(
    registry: &EasingRegistry,
    segment: &CameraSegment,
    local_t: f64,
) -> f64 {
    if !segment.easing_enabled {
        return local_t;
    }
    registry.calculate(
        &segment.function_id,
        local_t,
        segment.ease_type,
        segment.drift_params,
    )
}

/// Index of the segment containing `global_time`.
///
/// A time equal to an inner boundary belongs to the segment starting there;
/// times past the final boundary stay in the last segment, times before the
/// first in segment 0. Requires `segment_count >= 1`.
pub fn locate_segment(path: &CameraPath, global_time: f64, segment_count: usize) -> usize {
    let starts = &path.waypoints[..segment_count];
    let after = starts.partition_point(|wp| wp.time <= global_time);
    after.saturating_sub(1)
}

/// Position stored on the waypoint, or the one encoded in its bookmark
/// command when that command carries a `q_`/`dpos_` part.
pub fn effective_position(waypoint: &CameraWaypoint) -> Position {
    waypoint
        .bookmark_command
        .as_deref()
        .and_then(PositionCommand::find_in)
        .map(|cmd| cmd.position())
        .unwrap_or(waypoint.position)
}

/// Rotation stored on the waypoint, overridden by a bookmark command.
/// A `dpos_` command has no explicit rotation.
pub fn effective_rotation(waypoint: &CameraWaypoint) -> Option<Rotation> {
    match waypoint
        .bookmark_command
        .as_deref()
        .and_then(PositionCommand::find_in)
    {
        Some(cmd) => cmd.rotation(),
        None => waypoint.rotation,
    }
}

pub fn interpolate_camera_path<'a>(
    registry: &EasingRegistry,
    path: &'a CameraPath,
    global_time: f64,
) -> InterpolationResult<'a> {
    interpolate_camera_path_with(registry, path, global_time, InterpolationOptions::default())
}

pub fn interpolate_camera_path_with<'a>(
    registry: &EasingRegistry,
    path: &'a CameraPath,
    global_time: f64,
    options: InterpolationOptions,
) -> InterpolationResult<'a> {
    let pose_of = |wp: &CameraWaypoint| {
        if options.use_bookmark_poses {
            (effective_position(wp), effective_rotation(wp))
        } else {
            (wp.position, wp.rotation)
        }
    };

    let segment_count = path.waypoints.len().saturating_sub(1);
    if segment_count == 0 {
        let (position, rotation) = path
            .waypoints
            .first()
            .map(pose_of)
            .unwrap_or((Position::default(), None));
        return InterpolationResult {
            position: position_to_vec(&position),
            rotation: rotation.as_ref().map(rotation_to_vec),
            current_segment_index: 0,
            current_segment: None,
            segment_local_time: 0.0,
            eased_local_time: 0.0,
            eased_output: global_time,
        };
    }

    let index = locate_segment(path, global_time, segment_count);
    let from = &path.waypoints[index];
    let to = &path.waypoints[index + 1];

    let duration = to.time - from.time;
    let segment_local_time = if duration > 0.0 {
        (global_time - from.time) / duration
    } else {
        0.0
    };

    // Missing segments (mid-edit) fall back to linear.
    let segment = path.segments.get(index);
    let eased_local_time = segment
        .map(|s| calculate_segment_output(registry, s, segment_local_time))
        .unwrap_or(segment_local_time);

    let (from_pos, from_rot) = pose_of(from);
    let (to_pos, to_rot) = pose_of(to);

    let position = position_to_vec(&from_pos).lerp(position_to_vec(&to_pos), eased_local_time);
    let rotation = match (from_rot, to_rot) {
        (Some(a), Some(b)) => Some(lerp_rotation(
            rotation_to_vec(&a),
            rotation_to_vec(&b),
            eased_local_time,
            options.rotation_mode,
        )),
        _ => None,
    };

    InterpolationResult {
        position,
        rotation,
        current_segment_index: index,
        current_segment: segment,
        segment_local_time,
        eased_local_time,
        eased_output: from.time + eased_local_time * duration,
    }
}

fn lerp_rotation(from: DVec3, to: DVec3, t: f64, mode: RotationMode) -> DVec3 {
    match mode {
        RotationMode::Linear => from.lerp(to, t),
        RotationMode::ShortestPath => {
            let delta = to - from;
            let wrapped = DVec3::new(wrap_degrees(delta.x), wrap_degrees(delta.y), wrap_degrees(delta.z));
            from + wrapped * t
        }
    }
}

/// Maps an angle difference into `[-180, 180)`.
fn wrap_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}
