//! Curve math shared by the keyframe engine and the segment sampler.
//!
//! Evaluation is Bernstein-form Bézier over a normalized parameter `t ∈ [0,1]`;
//! control points are derived from Hermite-style boundary conditions
//! (value, optional velocity, optional acceleration) over a span of `dt` seconds.

pub mod functions;

pub use functions::{
    cubic_control_points, eval_cubic_bezier, eval_cubic_bezier_derivative, eval_quintic_bezier,
    eval_quintic_bezier_derivative, lerp, quintic_control_points,
};
