//! # Easing Curves
//!
//! Pure easing math. Every curve is written once, in its ease-in direction;
//! ease-out and ease-both are derived by [`apply_ease_type`].
//!
//! ## Responsibilities
//! - **Base shapes**: the ease-in form of each catalogued curve.
//! - **Ease-type transform**: reflection (ease-out) and mirroring (ease-both).
//! - **Drift**: the two-parameter breakpoint curve.
//!
//! Functions here are total: `t` outside `[0, 1]` extrapolates the formula
//! and never panics. Back and elastic overshoot `[0, 1]` on purpose.

use glam::DVec2;
use scriptcam_data::{DriftParams, EaseType, FunctionId};
use std::f64::consts::PI;

const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

/// Control points of the bezier curve (CSS `ease-in`).
const BEZIER_P1: DVec2 = DVec2::new(0.42, 0.0);
const BEZIER_P2: DVec2 = DVec2::new(1.0, 1.0);

/// Wraps an ease-in shape `f` into the requested direction.
#[inline]
pub fn apply_ease_type(f: impl Fn(f64) -> f64, t: f64, ease_type: EaseType) -> f64 {
    match ease_type {
        EaseType::EaseIn => f(t),
        EaseType::EaseOut => 1.0 - f(1.0 - t),
        EaseType::EaseBoth => {
            if t < 0.5 {
                f(2.0 * t) / 2.0
            } else {
                1.0 - f(2.0 - 2.0 * t) / 2.0
            }
        }
    }
}

/// Evaluates `id` at `t` under `ease_type`.
///
/// `params` is only read by drift; `None` falls back to its defaults.
/// Unknown ids evaluate as linear.
pub fn calculate(id: &FunctionId, t: f64, ease_type: EaseType, params: Option<DriftParams>) -> f64 {
    apply_ease_type(|x| base_shape(id, x, params), t, ease_type)
}

/// The ease-in form of a curve.
pub fn base_shape(id: &FunctionId, t: f64, params: Option<DriftParams>) -> f64 {
    match id {
        FunctionId::Linear | FunctionId::Unknown(_) => t,
        FunctionId::Quadratic => t * t,
        FunctionId::Cubic => t.powi(3),
        FunctionId::Quartic => t.powi(4),
        FunctionId::Quintic => t.powi(5),
        FunctionId::Exponential => expo_in(t),
        FunctionId::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        FunctionId::Sqrt => 1.0 - (1.0 - t).max(0.0).sqrt(),
        FunctionId::Back => BACK_C3 * t * t * t - BACK_C1 * t * t,
        FunctionId::Elastic => elastic_in(t),
        FunctionId::Bounce => 1.0 - bounce_out(1.0 - t),
        FunctionId::Hermite => t * t * (3.0 - 2.0 * t),
        FunctionId::Bezier => solve_cubic_bezier(BEZIER_P1, BEZIER_P2, t),
        FunctionId::Parabolic => 4.0 * t * (1.0 - t),
        FunctionId::Trigonometric => 1.0 - (t * PI / 2.0).cos(),
        FunctionId::Drift => drift(t, params.unwrap_or_default()),
    }
}

fn expo_in(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else {
        2.0f64.powf(10.0 * t - 10.0)
    }
}

fn elastic_in(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        -(2.0f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
    }
}

fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

/// Drift: a squared onset up to the breakpoint `x/10`, reaching `y/10`
/// there, followed by a linear tail to 1.
///
/// A zero breakpoint is the pure linear tail `yp + t * (1 - yp)`, so the
/// curve starts at `yp` rather than 0. A breakpoint of 1 is `t^2 * yp` over
/// the whole range.
pub fn drift(t: f64, params: DriftParams) -> f64 {
    let params = params.clamped();
    let xp = params.x / 10.0;
    let yp = params.y / 10.0;

    if xp >= 1.0 {
        t * t * yp
    } else if xp <= 0.0 {
        yp + t * (1.0 - yp)
    } else if t < xp {
        (t / xp).powi(2) * yp
    } else {
        yp + ((t - xp) / (1.0 - xp)) * (1.0 - yp)
    }
}

/// Cubic bezier timing curve through (0,0), `p1`, `p2`, (1,1).
///
/// Solves for the curve parameter with Newton-Raphson, then evaluates y.
pub fn solve_cubic_bezier(p1: DVec2, p2: DVec2, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut t = x;
    for _ in 0..8 {
        let one_minus_t = 1.0 - t;
        let x_est = 3.0 * one_minus_t * one_minus_t * t * p1.x
            + 3.0 * one_minus_t * t * t * p2.x
            + t * t * t;

        let err = x_est - x;
        if err.abs() < 1e-7 {
            break;
        }

        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);

        if dx_dt.abs() < 1e-9 {
            break;
        }
        t -= err / dx_dt;
    }

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}

/// `steps + 1` evenly spaced `(t, value)` samples over `[0, 1]`.
pub fn sample_curve(
    id: &FunctionId,
    ease_type: EaseType,
    params: Option<DriftParams>,
    steps: usize,
) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            (t, calculate(id, t, ease_type, params))
        })
        .collect()
}
