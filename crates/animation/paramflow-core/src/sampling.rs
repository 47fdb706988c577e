//! Keyframe track sampling and the sampler seam shared by all parameter sources.
//!
//! Model:
//! - Before the first keyframe, dead-reckon backward from it:
//!   `value - velocity·Δ - acceleration·Δ²/2` with `Δ = first.time - time`.
//! - After the last keyframe, dead-reckon forward symmetrically.
//! - Between keyframes `(k_i, k_i+1)`, evaluate a quintic (or cubic) Bézier whose
//!   control points come from the boundary values, velocities and accelerations.
//! - Acceleration is only read in [`CurveMode::Quintic`].
//!
//! Sampling returns `None` only when no bracketing pair exists for an interior
//! time, which requires a broken sort invariant. Callers turn that into `0.0`.

use crate::config::{Config, CurveMode};
use crate::data::{Keyframe, ParameterValues};
use crate::interp::functions::{
    cubic_control_points, eval_cubic_bezier, eval_cubic_bezier_derivative, eval_quintic_bezier,
    eval_quintic_bezier_derivative, quintic_control_points,
};

/// Anything that yields a full parameter snapshot for a timeline position.
pub trait Sampler {
    /// Sample every parameter at `time` (seconds).
    fn values_at(&self, time: f64) -> ParameterValues;

    /// Names this sampler produces values for.
    fn parameter_names(&self) -> Vec<String>;
}

#[inline]
fn acceleration(k: &Keyframe, mode: CurveMode) -> f64 {
    match mode {
        CurveMode::Quintic => k.acceleration.unwrap_or(0.0),
        CurveMode::Cubic => 0.0,
    }
}

/// Locate `(i, i + 1)` with `k_i.time <= time <= k_i+1.time` by binary search.
fn bracket(keyframes: &[Keyframe], time: f64) -> Option<(usize, usize)> {
    let idx = keyframes.partition_point(|k| k.time <= time);
    if idx == 0 || idx >= keyframes.len() {
        return None;
    }
    let (i, j) = (idx - 1, idx);
    let (left, right) = (&keyframes[i], &keyframes[j]);
    if left.time <= time && time <= right.time && right.time > left.time {
        Some((i, j))
    } else {
        None
    }
}

/// Control polygon of the span between two keyframes, in curve-mode degree.
enum Span {
    Cubic([f64; 4]),
    Quintic([f64; 6]),
}

fn span(left: &Keyframe, right: &Keyframe, cfg: &Config) -> Span {
    let dt = right.time - left.time;
    let vel0 = cfg.tangents.resolve(left.velocity);
    let vel1 = cfg.tangents.resolve(right.velocity);
    match cfg.curve {
        CurveMode::Cubic => {
            let (p1, p2) = cubic_control_points(left.value, right.value, dt, vel0, vel1);
            Span::Cubic([left.value, p1, p2, right.value])
        }
        CurveMode::Quintic => {
            let (p1, p2, p3, p4) = quintic_control_points(
                left.value,
                right.value,
                dt,
                vel0,
                vel1,
                left.acceleration,
                right.acceleration,
            );
            Span::Quintic([left.value, p1, p2, p3, p4, right.value])
        }
    }
}

/// One-sided curve slopes (units per second) at both ends of the span `left -> right`.
pub(crate) fn span_boundary_velocities(left: &Keyframe, right: &Keyframe, cfg: &Config) -> (f64, f64) {
    let dt = right.time - left.time;
    if dt <= 0.0 {
        return (0.0, 0.0);
    }
    let (d0, d1) = match span(left, right, cfg) {
        Span::Cubic(p) => (
            eval_cubic_bezier_derivative(p[0], p[1], p[2], p[3], 0.0),
            eval_cubic_bezier_derivative(p[0], p[1], p[2], p[3], 1.0),
        ),
        Span::Quintic(p) => (
            eval_quintic_bezier_derivative(&p, 0.0),
            eval_quintic_bezier_derivative(&p, 1.0),
        ),
    };
    (d0 / dt, d1 / dt)
}

/// Sample a sorted keyframe list at `time`.
pub fn sample_keyframes(keyframes: &[Keyframe], time: f64, cfg: &Config) -> Option<f64> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;

    if time <= first.time {
        let delta = first.time - time;
        let velocity = first.velocity.unwrap_or(0.0);
        let accel = acceleration(first, cfg.curve);
        return Some(first.value - velocity * delta - accel * delta * delta / 2.0);
    }
    if time >= last.time {
        let delta = time - last.time;
        let velocity = last.velocity.unwrap_or(0.0);
        let accel = acceleration(last, cfg.curve);
        return Some(last.value + velocity * delta + accel * delta * delta / 2.0);
    }

    let (i, j) = bracket(keyframes, time)?;
    let (left, right) = (&keyframes[i], &keyframes[j]);
    let t = (time - left.time) / (right.time - left.time);
    Some(match span(left, right, cfg) {
        Span::Cubic(p) => eval_cubic_bezier(p[0], p[1], p[2], p[3], t),
        Span::Quintic(p) => eval_quintic_bezier(&p, t),
    })
}

/// First time-derivative of [`sample_keyframes`] (units per second).
pub fn sample_keyframes_velocity(keyframes: &[Keyframe], time: f64, cfg: &Config) -> Option<f64> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;

    if time <= first.time {
        let delta = first.time - time;
        return Some(first.velocity.unwrap_or(0.0) + acceleration(first, cfg.curve) * delta);
    }
    if time >= last.time {
        let delta = time - last.time;
        return Some(last.velocity.unwrap_or(0.0) + acceleration(last, cfg.curve) * delta);
    }

    let (i, j) = bracket(keyframes, time)?;
    let (left, right) = (&keyframes[i], &keyframes[j]);
    let dt = right.time - left.time;
    let t = (time - left.time) / dt;
    let du = match span(left, right, cfg) {
        Span::Cubic(p) => eval_cubic_bezier_derivative(p[0], p[1], p[2], p[3], t),
        Span::Quintic(p) => eval_quintic_bezier_derivative(&p, t),
    };
    Some(du / dt)
}
