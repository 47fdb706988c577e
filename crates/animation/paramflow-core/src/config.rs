//! Sampling and playback configuration for paramflow-core.

use serde::{Deserialize, Serialize};

/// Default tolerance under which two keyframe times are considered equal.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default timeline length (seconds) for a new clock.
pub const DEFAULT_DURATION: f64 = 10.0;

/// Curve family used between two keyframes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    /// Cubic Bézier; keyframe acceleration is ignored everywhere.
    Cubic,
    /// Quintic Bézier; acceleration shapes the curve and the extrapolation.
    #[default]
    Quintic,
}

/// Rule applied when a keyframe has no explicit velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentPolicy {
    /// Missing velocity follows the chord between the two keyframes.
    #[default]
    ChordSlope,
    /// Missing velocity is zero (ease in/out at every keyframe).
    Zero,
}

impl TangentPolicy {
    /// Resolve an optional boundary velocity under this policy.
    ///
    /// `None` means "let the curve math use its chord fallback".
    #[inline]
    pub fn resolve(self, velocity: Option<f64>) -> Option<f64> {
        match self {
            Self::ChordSlope => velocity,
            Self::Zero => Some(velocity.unwrap_or(0.0)),
        }
    }
}

/// Interpolation used inside a baked segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentInterpolation {
    #[default]
    Cubic,
    Linear,
}

/// Configuration shared by the engine and the samplers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyframe time tolerance.
    pub epsilon: f64,
    pub curve: CurveMode,
    pub tangents: TangentPolicy,
    pub segments: SegmentInterpolation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            curve: CurveMode::default(),
            tangents: TangentPolicy::default(),
            segments: SegmentInterpolation::default(),
        }
    }
}

impl Config {
    pub fn cubic() -> Self {
        Self {
            curve: CurveMode::Cubic,
            ..Self::default()
        }
    }

    /// Epsilon guarded against zero, negative and NaN overrides.
    #[inline]
    pub(crate) fn effective_epsilon(&self) -> f64 {
        if self.epsilon.is_finite() && self.epsilon > 0.0 {
            self.epsilon
        } else {
            DEFAULT_EPSILON
        }
    }
}

/// Playback clock settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Timeline length in seconds; `f64::INFINITY` for an unbounded timeline.
    pub duration: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "curve": "cubic" }"#).unwrap();
        assert_eq!(cfg.curve, CurveMode::Cubic);
        assert_eq!(cfg.tangents, TangentPolicy::ChordSlope);
        assert_eq!(cfg.epsilon, DEFAULT_EPSILON);

        let cfg: Config = serde_json::from_str(r#"{ "tangents": "zero" }"#).unwrap();
        assert_eq!(cfg.tangents, TangentPolicy::Zero);
    }

    #[test]
    fn epsilon_override_is_guarded() {
        let cfg = Config {
            epsilon: 0.0,
            ..Config::default()
        };
        assert_eq!(cfg.effective_epsilon(), DEFAULT_EPSILON);
    }

    #[test]
    fn zero_policy_fills_missing_velocity() {
        assert_eq!(TangentPolicy::Zero.resolve(None), Some(0.0));
        assert_eq!(TangentPolicy::Zero.resolve(Some(2.0)), Some(2.0));
        assert_eq!(TangentPolicy::ChordSlope.resolve(None), None);
    }
}
