//! Built-in camera path presets.
//!
//! Presets are templates: callers never edit them in place but take a copy
//! through [`clone_preset`], which gets its own id.

use crate::model::{
    CameraPath, CameraWaypoint, DriftParams, EaseType, FunctionId, Position, Rotation,
};

fn wp(id: &str, time: f64, pos: [f64; 3], rot: [f64; 3]) -> CameraWaypoint {
    CameraWaypoint::new(id, time, Position::new(pos[0], pos[1], pos[2]))
        .with_rotation(Rotation::new(rot[0], rot[1], rot[2]))
}

fn dolly_in() -> CameraPath {
    let mut path = CameraPath::new("preset-dolly-in", "Dolly In", 4000.0).with_waypoints(vec![
        wp("start", 0.0, [0.0, 1.5, -8.0], [0.0, 0.0, 0.0]).with_name("Wide"),
        wp("end", 1.0, [0.0, 1.5, -2.5], [0.0, 0.0, 0.0]).with_name("Close"),
    ]);
    path.segments[0].function_id = FunctionId::Cubic;
    path.segments[0].ease_type = EaseType::EaseOut;
    path.bpm = Some(120.0);
    path
}

fn orbit_sweep() -> CameraPath {
    let mut path =
        CameraPath::new("preset-orbit-sweep", "Orbit Sweep", 8000.0).with_waypoints(vec![
            wp("front", 0.0, [0.0, 2.0, -6.0], [10.0, 0.0, 0.0]),
            wp("left", 0.25, [-6.0, 2.0, 0.0], [10.0, 90.0, 0.0]),
            wp("back", 0.5, [0.0, 2.0, 6.0], [10.0, 180.0, 0.0]),
            wp("right", 0.75, [6.0, 2.0, 0.0], [10.0, 270.0, 0.0]),
            wp("front-again", 1.0, [0.0, 2.0, -6.0], [10.0, 360.0, 0.0]),
        ]);
    for segment in &mut path.segments {
        segment.function_id = FunctionId::Trigonometric;
        segment.ease_type = EaseType::EaseBoth;
    }
    path.bpm = Some(120.0);
    path
}

fn crane_up() -> CameraPath {
    let mut path = CameraPath::new("preset-crane-up", "Crane Up", 6000.0).with_waypoints(vec![
        wp("floor", 0.0, [0.0, 0.5, -4.0], [-10.0, 0.0, 0.0]),
        wp("mid", 0.6, [0.0, 3.0, -5.0], [15.0, 0.0, 0.0]),
        wp("top", 1.0, [0.0, 6.0, -6.0], [35.0, 0.0, 0.0]),
    ]);
    path.segments[0].function_id = FunctionId::Quadratic;
    path.segments[0].ease_type = EaseType::EaseIn;
    path.segments[1].function_id = FunctionId::Back;
    path.segments[1].ease_type = EaseType::EaseOut;
    path.bpm = Some(100.0);
    path
}

fn beat_drop() -> CameraPath {
    let mut path = CameraPath::new("preset-beat-drop", "Beat Drop", 2000.0).with_waypoints(vec![
        wp("hold", 0.0, [0.0, 1.5, -3.0], [0.0, 0.0, 0.0]),
        wp("pull", 0.5, [0.0, 1.8, -4.5], [5.0, 0.0, 0.0]),
        wp("slam", 1.0, [0.0, 1.2, -1.5], [-5.0, 0.0, 0.0]),
    ]);
    path.segments[0] = path.segments[0]
        .clone()
        .with_drift(DriftParams::new(6.0, 2.0));
    path.segments[1].function_id = FunctionId::Bounce;
    path.segments[1].ease_type = EaseType::EaseOut;
    path.bpm = Some(174.0);
    path
}

/// All built-in presets, in menu order.
pub fn builtin_presets() -> Vec<CameraPath> {
    vec![dolly_in(), orbit_sweep(), crane_up(), beat_drop()]
}

/// Looks a preset up by display name or id, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<CameraPath> {
    builtin_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name) || p.id.eq_ignore_ascii_case(name))
}

/// Copies a preset into an editable path with a fresh id.
pub fn clone_preset(preset: &CameraPath) -> CameraPath {
    let mut path = preset.clone();
    path.id = format!("path-{:08x}", rand::random::<u32>());
    path.name = format!("{} (Copy)", preset.name);
    path.rebuild_segments();
    path
}
