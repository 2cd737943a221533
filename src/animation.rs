//! Playback bridge to the `keyframe` crate.
//!
//! Turns a camera path into an `AnimationSequence` of poses keyed in seconds,
//! with each segment's easing driving the transition out of its first
//! waypoint.

use glam::DVec3;
use keyframe::{AnimationSequence, CanTween, EasingFunction, Keyframe};
use scriptcam_core::easing;
use scriptcam_core::interpolate::{
    effective_position, effective_rotation, position_to_vec, rotation_to_vec,
};
use scriptcam_data::{CameraPath, CameraSegment, CameraWaypoint, DriftParams, EaseType, FunctionId};
use std::fmt;

/// A segment's easing configuration as a keyframe easing function.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentEasing {
    pub function_id: FunctionId,
    pub ease_type: EaseType,
    pub params: Option<DriftParams>,
    pub enabled: bool,
}

impl SegmentEasing {
    pub fn linear() -> Self {
        Self {
            function_id: FunctionId::Linear,
            ease_type: EaseType::EaseIn,
            params: None,
            enabled: true,
        }
    }
}

impl From<&CameraSegment> for SegmentEasing {
    fn from(segment: &CameraSegment) -> Self {
        Self {
            function_id: segment.function_id.clone(),
            ease_type: segment.ease_type,
            params: segment.drift_params,
            enabled: segment.easing_enabled,
        }
    }
}

impl EasingFunction for SegmentEasing {
    fn y(&self, x: f64) -> f64 {
        if !self.enabled {
            return x;
        }
        easing::calculate(&self.function_id, x, self.ease_type, self.params)
    }
}

/// Camera position and Euler rotation (degrees).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub rotation: DVec3,
}

impl CanTween for CameraPose {
    fn ease(from: Self, to: Self, time: impl keyframe::num_traits::Float) -> Self {
        let t = time.to_f64().unwrap_or(0.0);
        CameraPose {
            position: from.position.lerp(to.position, t),
            rotation: from.rotation.lerp(to.rotation, t),
        }
    }
}

fn waypoint_pose(waypoint: &CameraWaypoint, use_bookmark_poses: bool) -> CameraPose {
    let (position, rotation) = if use_bookmark_poses {
        (effective_position(waypoint), effective_rotation(waypoint))
    } else {
        (waypoint.position, waypoint.rotation)
    };
    CameraPose {
        position: position_to_vec(&position),
        rotation: rotation.as_ref().map(rotation_to_vec).unwrap_or_default(),
    }
}

/// Gap before a jump cut at which the arriving pose is keyed, per second of
/// key time (at least one).
const JUMP_CUT_LEAD: f64 = 1e-9;

/// Builds the keyframes for `path`, at `time * totalDuration` seconds.
///
/// The final keyframe repeats the last segment's easing. Waypoints sharing a
/// time form a jump cut: the first is keyed just before that time, the last
/// at it, and any in between are dropped.
pub fn camera_keyframes(path: &CameraPath, use_bookmark_poses: bool) -> Vec<Keyframe<CameraPose>> {
    let seconds = path.total_duration / 1000.0;
    let last_easing = path
        .segments
        .last()
        .map(SegmentEasing::from)
        .unwrap_or_else(SegmentEasing::linear);

    let waypoints = &path.waypoints;
    waypoints
        .iter()
        .enumerate()
        .filter_map(|(i, waypoint)| {
            let time = waypoint.time * seconds;
            let starts_run = i > 0 && waypoints[i - 1].time != waypoint.time;
            let ends_run = waypoints
                .get(i + 1)
                .map_or(true, |next| next.time != waypoint.time);
            if ends_run {
                Some((i, waypoint, time))
            } else if starts_run {
                Some((i, waypoint, time - time.abs().max(1.0) * JUMP_CUT_LEAD))
            } else {
                None
            }
        })
        .map(|(i, waypoint, time)| {
            let easing = path
                .segments
                .get(i)
                .map(SegmentEasing::from)
                .unwrap_or_else(|| last_easing.clone());
            Keyframe::new(waypoint_pose(waypoint, use_bookmark_poses), time, easing)
        })
        .collect()
}

#[derive(Clone)]
pub struct CameraAnimation {
    pub sequence: AnimationSequence<CameraPose>,
    pub current_pose: CameraPose,
}

impl CameraAnimation {
    pub fn from_path(path: &CameraPath) -> Self {
        Self::from_path_with(path, false)
    }

    pub fn from_path_with(path: &CameraPath, use_bookmark_poses: bool) -> Self {
        let frames = camera_keyframes(path, use_bookmark_poses);
        if frames.is_empty() {
            tracing::debug!("Camera path '{}' has no waypoints", path.id);
        }
        let current_pose = frames.first().map(|kf| kf.value()).unwrap_or_default();

        Self {
            sequence: AnimationSequence::from(frames),
            current_pose,
        }
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.sequence.duration()
    }

    /// Moves playback to `time` seconds and refreshes [`Self::current_pose`].
    pub fn update(&mut self, time: f64) {
        self.sequence.advance_to(time);
        self.current_pose = self.sequence.now();
    }
}

impl fmt::Debug for CameraAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraAnimation")
            .field("duration", &self.duration())
            .field("current_pose", &self.current_pose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcam_data::{Position, Rotation};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn dolly(function_id: FunctionId, ease_type: EaseType) -> CameraPath {
        let mut path = CameraPath::new("dolly", "Dolly", 4000.0).with_waypoints(vec![
            CameraWaypoint::new("a", 0.0, Position::new(0.0, 1.5, -8.0))
                .with_rotation(Rotation::new(0.0, 0.0, 0.0)),
            CameraWaypoint::new("b", 1.0, Position::new(0.0, 1.5, -2.0))
                .with_rotation(Rotation::new(0.0, 40.0, 0.0)),
        ]);
        path.segments[0].function_id = function_id;
        path.segments[0].ease_type = ease_type;
        path
    }

    #[test]
    fn test_segment_easing_matches_core() {
        let easing = SegmentEasing {
            function_id: FunctionId::Quadratic,
            ease_type: EaseType::EaseOut,
            params: None,
            enabled: true,
        };
        assert!(approx(easing.y(0.5), 0.75));

        let disabled = SegmentEasing {
            enabled: false,
            ..easing
        };
        assert_eq!(disabled.y(0.5), 0.5);
    }

    #[test]
    fn test_keyframes_are_keyed_in_seconds() {
        let path = dolly(FunctionId::Linear, EaseType::EaseIn);
        let frames = camera_keyframes(&path, false);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].time(), 0.0);
        assert_eq!(frames[1].time(), 4.0);
        assert_eq!(frames[1].value().rotation, DVec3::new(0.0, 40.0, 0.0));
    }

    #[test]
    fn test_animation_follows_segment_easing() {
        let path = dolly(FunctionId::Cubic, EaseType::EaseOut);
        let mut animation = CameraAnimation::from_path(&path);
        assert!(approx(animation.duration(), 4.0));

        animation.update(2.0);
        // Ease-out cubic at 0.5 is 0.875.
        assert!(approx(animation.current_pose.position.z, -8.0 + 6.0 * 0.875));
        assert!(approx(animation.current_pose.rotation.y, 40.0 * 0.875));
    }

    #[test]
    fn test_animation_endpoints() {
        let path = dolly(FunctionId::Bounce, EaseType::EaseBoth);
        let mut animation = CameraAnimation::from_path(&path);
        assert_eq!(animation.current_pose.position, DVec3::new(0.0, 1.5, -8.0));

        animation.update(4.0);
        assert!(approx(animation.current_pose.position.z, -2.0));
    }

    #[test]
    fn test_jump_cut_matches_interpolator() {
        let path = CameraPath::new("jump", "Jump Cut", 4000.0).with_waypoints(vec![
            CameraWaypoint::new("a", 0.0, Position::new(0.0, 0.0, 0.0)),
            CameraWaypoint::new("b", 0.5, Position::new(10.0, 0.0, 0.0)),
            CameraWaypoint::new("c", 0.5, Position::new(20.0, 0.0, 0.0)),
            CameraWaypoint::new("d", 1.0, Position::new(30.0, 0.0, 0.0)),
        ]);
        let frames = camera_keyframes(&path, false);
        assert_eq!(frames.len(), 4);
        assert!(frames[1].time() < 2.0);
        assert_eq!(frames[1].value().position.x, 10.0);
        assert_eq!(frames[2].time(), 2.0);
        assert_eq!(frames[2].value().position.x, 20.0);

        let registry = scriptcam_core::EasingRegistry::builtin();
        let mut animation = CameraAnimation::from_path(&path);
        for (t, x) in [(0.25, 5.0), (0.5, 20.0), (0.75, 25.0)] {
            animation.update(t * 4.0);
            assert!(approx(animation.current_pose.position.x, x), "t = {t}");
            let expected = scriptcam_core::interpolate_camera_path(&registry, &path, t);
            assert!(approx(expected.position.x, x), "t = {t}");
        }
    }

    #[test]
    fn test_bookmark_poses_feed_keyframes() {
        let mut path = dolly(FunctionId::Linear, EaseType::EaseIn);
        path.waypoints[1].bookmark_command = Some("dpos_3_1_-1_60".to_string());

        let frames = camera_keyframes(&path, true);
        assert_eq!(frames[1].value().position, DVec3::new(3.0, 1.0, -1.0));
        // dpos_ carries no rotation.
        assert_eq!(frames[1].value().rotation, DVec3::ZERO);
    }

    #[test]
    fn test_empty_path_builds_empty_animation() {
        let path = CameraPath::new("empty", "Empty", 1000.0);
        let animation = CameraAnimation::from_path(&path);
        assert_eq!(animation.duration(), 0.0);
        assert_eq!(animation.current_pose, CameraPose::default());
    }
}
