//! Per-frame cost of path interpolation and easing evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scriptcam_core::data::{
    CameraPath, CameraWaypoint, EaseType, FunctionId, Position, Rotation,
};
use scriptcam_core::{calculate, interpolate_camera_path, EasingRegistry};

fn dense_path(waypoints: usize) -> CameraPath {
    let last = (waypoints - 1) as f64;
    let mut path = CameraPath::new("bench", "Bench", 60_000.0).with_waypoints(
        (0..waypoints)
            .map(|i| {
                let f = i as f64;
                CameraWaypoint::new(format!("wp{i}"), f / last, Position::new(f.sin(), 1.5, f.cos()))
                    .with_rotation(Rotation::new(0.0, f * 15.0, 0.0))
            })
            .collect(),
    );
    for (i, segment) in path.segments.iter_mut().enumerate() {
        let id = &FunctionId::KNOWN[i % FunctionId::KNOWN.len()];
        segment.function_id = id.clone();
        segment.ease_type = EaseType::ALL[i % EaseType::ALL.len()];
    }
    path
}

fn bench_interpolate(c: &mut Criterion) {
    let registry = EasingRegistry::builtin();
    let path = dense_path(48);

    c.bench_function("interpolate_48_waypoints", |b| {
        b.iter(|| interpolate_camera_path(&registry, black_box(&path), black_box(0.6173)))
    });

    c.bench_function("interpolate_48_waypoints_frame_sweep", |b| {
        b.iter(|| {
            for frame in 0..=120 {
                let t = frame as f64 / 120.0;
                black_box(interpolate_camera_path(&registry, &path, t));
            }
        })
    });
}

fn bench_easing(c: &mut Criterion) {
    c.bench_function("calculate_bounce_easeboth", |b| {
        b.iter(|| calculate(&FunctionId::Bounce, black_box(0.37), EaseType::EaseBoth, None))
    });

    c.bench_function("calculate_bezier_easein", |b| {
        b.iter(|| calculate(&FunctionId::Bezier, black_box(0.37), EaseType::EaseIn, None))
    });
}

criterion_group!(benches, bench_interpolate, bench_easing);
criterion_main!(benches);
