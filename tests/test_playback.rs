use scriptcam::data::{clone_preset, find_preset};
use scriptcam::{interpolate_camera_path, CameraAnimation, EasingRegistry};

#[test]
fn test_keyframe_playback_agrees_with_interpolator() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Crane Up keeps one easing per segment; sample inside the first one.
    let path = clone_preset(&find_preset("Crane Up").unwrap());
    let registry = EasingRegistry::builtin();
    let mut animation = CameraAnimation::from_path(&path);
    let seconds = path.total_duration / 1000.0;
    assert!((animation.duration() - seconds).abs() < 1e-9);

    for t in [0.0, 0.1, 0.25, 0.4, 0.55] {
        animation.update(t * seconds);
        let expected = interpolate_camera_path(&registry, &path, t);
        let pose = animation.current_pose;
        assert!(
            pose.position.abs_diff_eq(expected.position, 1e-6),
            "t = {t}: {:?} vs {:?}",
            pose.position,
            expected.position
        );
    }
}

#[test]
fn test_playback_of_every_preset_ends_on_last_waypoint() {
    let registry = EasingRegistry::builtin();
    for preset in scriptcam::data::builtin_presets() {
        let mut animation = CameraAnimation::from_path(&preset);
        animation.update(animation.duration());

        let expected = interpolate_camera_path(&registry, &preset, 1.0);
        assert!(
            animation.current_pose.position.abs_diff_eq(expected.position, 1e-6),
            "{}",
            preset.name
        );
    }
}
