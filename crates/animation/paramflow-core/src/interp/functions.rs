//! Bézier evaluation and control-point derivation:
//! - eval_cubic_bezier / eval_quintic_bezier (Bernstein form)
//! - derivatives with respect to the normalized parameter
//! - cubic/quintic control points from boundary value, velocity and acceleration

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic Bezier basis function
#[inline]
pub fn eval_cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// d/dt of [`eval_cubic_bezier`] (normalized parameter, not seconds).
#[inline]
pub fn eval_cubic_bezier_derivative(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}

/// Degree-5 Bernstein polynomial over `p[0]..p[5]`.
#[inline]
pub fn eval_quintic_bezier(p: &[f64; 6], t: f64) -> f64 {
    let u = 1.0 - t;
    let u2 = u * u;
    let u3 = u2 * u;
    let u4 = u3 * u;
    let u5 = u4 * u;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    p[0] * u5
        + 5.0 * p[1] * t * u4
        + 10.0 * p[2] * t2 * u3
        + 10.0 * p[3] * t3 * u2
        + 5.0 * p[4] * t4 * u
        + p[5] * t5
}

/// d/dt of [`eval_quintic_bezier`]: a quartic over the forward differences.
#[inline]
pub fn eval_quintic_bezier_derivative(p: &[f64; 6], t: f64) -> f64 {
    let u = 1.0 - t;
    let u2 = u * u;
    let t2 = t * t;
    5.0 * ((p[1] - p[0]) * u2 * u2
        + 4.0 * (p[2] - p[1]) * t * u2 * u
        + 6.0 * (p[3] - p[2]) * t2 * u2
        + 4.0 * (p[4] - p[3]) * t2 * t * u
        + (p[5] - p[4]) * t2 * t2)
}

/// Inner control points `(p1, p2)` of a cubic spanning `dt` seconds from `v0` to `v1`.
///
/// A missing velocity falls back to the chord slope `(v1 - v0) / dt`.
#[inline]
pub fn cubic_control_points(
    v0: f64,
    v1: f64,
    dt: f64,
    vel0: Option<f64>,
    vel1: Option<f64>,
) -> (f64, f64) {
    let p1 = match vel0 {
        Some(d0) => v0 + d0 * dt / 3.0,
        None => v0 + (v1 - v0) / 3.0,
    };
    let p2 = match vel1 {
        Some(d1) => v1 - d1 * dt / 3.0,
        None => v1 - (v1 - v0) / 3.0,
    };
    (p1, p2)
}

/// Inner control points `(p1, p2, p3, p4)` of a quintic spanning `dt` seconds.
///
/// `p1`/`p4` carry the boundary velocities (chord fallback as in the cubic case).
/// `p2`/`p3` carry the boundary accelerations when given; otherwise they sit at
/// one third of the way between `p1` and `p4` from either end.
#[inline]
pub fn quintic_control_points(
    v0: f64,
    v1: f64,
    dt: f64,
    vel0: Option<f64>,
    vel1: Option<f64>,
    acc0: Option<f64>,
    acc1: Option<f64>,
) -> (f64, f64, f64, f64) {
    let p1 = match vel0 {
        Some(d0) => v0 + d0 * dt / 5.0,
        None => v0 + (v1 - v0) / 5.0,
    };
    let p4 = match vel1 {
        Some(d1) => v1 - d1 * dt / 5.0,
        None => v1 - (v1 - v0) / 5.0,
    };
    let third = (p4 - p1) / 3.0;
    let dt2 = dt * dt;
    let p2 = match acc0 {
        Some(a0) => 2.0 * p1 - v0 + a0 * dt2 / 20.0,
        None => p1 + third,
    };
    let p3 = match acc1 {
        Some(a1) => 2.0 * p4 - v1 + a1 * dt2 / 20.0,
        None => p4 - third,
    };
    (p1, p2, p3, p4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn cubic_hits_endpoints() {
        approx(eval_cubic_bezier(1.0, 7.0, -3.0, 4.0, 0.0), 1.0, 1e-12);
        approx(eval_cubic_bezier(1.0, 7.0, -3.0, 4.0, 1.0), 4.0, 1e-12);
    }

    #[test]
    fn chord_fallback_is_linear() {
        let (p1, p2) = cubic_control_points(0.0, 10.0, 1.0, None, None);
        approx(p1, 10.0 / 3.0, 1e-12);
        approx(p2, 20.0 / 3.0, 1e-12);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            approx(eval_cubic_bezier(0.0, p1, p2, 10.0, t), 10.0 * t, 1e-9);
        }

        let (q1, q2, q3, q4) = quintic_control_points(0.0, 10.0, 2.0, None, None, None, None);
        let p = [0.0, q1, q2, q3, q4, 10.0];
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            approx(eval_quintic_bezier(&p, t), 10.0 * t, 1e-9);
        }
    }

    #[test]
    fn explicit_velocity_sets_end_slopes() {
        let dt = 2.0;
        let (p1, p2) = cubic_control_points(1.0, 3.0, dt, Some(4.0), Some(-1.0));
        approx(eval_cubic_bezier_derivative(1.0, p1, p2, 3.0, 0.0) / dt, 4.0, 1e-9);
        approx(eval_cubic_bezier_derivative(1.0, p1, p2, 3.0, 1.0) / dt, -1.0, 1e-9);

        let (q1, q2, q3, q4) =
            quintic_control_points(1.0, 3.0, dt, Some(4.0), Some(-1.0), None, None);
        let p = [1.0, q1, q2, q3, q4, 3.0];
        approx(eval_quintic_bezier_derivative(&p, 0.0) / dt, 4.0, 1e-9);
        approx(eval_quintic_bezier_derivative(&p, 1.0) / dt, -1.0, 1e-9);
    }

    #[test]
    fn explicit_acceleration_sets_end_curvature() {
        let dt = 0.5;
        let (q1, q2, q3, q4) =
            quintic_control_points(0.0, 1.0, dt, Some(0.0), Some(0.0), Some(6.0), Some(-2.0));
        let p = [0.0, q1, q2, q3, q4, 1.0];
        // B''(0) = 20 (p2 - 2 p1 + p0), B''(1) = 20 (p5 - 2 p4 + p3), per normalized t.
        let start = 20.0 * (p[2] - 2.0 * p[1] + p[0]) / (dt * dt);
        let end = 20.0 * (p[5] - 2.0 * p[4] + p[3]) / (dt * dt);
        approx(start, 6.0, 1e-9);
        approx(end, -2.0, 1e-9);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let p = [0.0, 2.0, -1.0, 4.0, 3.0, 1.0];
        let h = 1e-6;
        for t in [0.1, 0.37, 0.5, 0.9] {
            let fd = (eval_quintic_bezier(&p, t + h) - eval_quintic_bezier(&p, t - h)) / (2.0 * h);
            approx(eval_quintic_bezier_derivative(&p, t), fd, 1e-5);
        }
    }
}
