//! Data model shared by the engine, the samplers and the exported artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParamFlowError;

/// Parameter snapshot at one instant: name -> value.
pub type ParameterValues = hashbrown::HashMap<String, f64>;

/// Serialized keyframe tracks, ordered by parameter name.
pub type KeyframeTracks = BTreeMap<String, Vec<Keyframe>>;

/// Baked segment tracks, ordered by parameter name.
pub type SegmentTracks = BTreeMap<String, Vec<Segment>>;

/// A control point anchoring one parameter's curve.
///
/// `velocity` and `acceleration` are optional: `Some(0.0)` is a flat tangent,
/// `None` defers to the configured tangent policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds on the timeline, `>= 0`.
    pub time: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
}

impl Keyframe {
    #[inline]
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            velocity: None,
            acceleration: None,
        }
    }

    #[inline]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    #[inline]
    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = Some(acceleration);
        self
    }
}

/// An explicit time interval of a baked track with independent boundary conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start_time: f64,
    pub end_time: f64,
    pub start_value: f64,
    pub end_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_velocity: Option<f64>,
}

impl Segment {
    #[inline]
    pub fn new(start_time: f64, end_time: f64, start_value: f64, end_value: f64) -> Self {
        Self {
            start_time,
            end_time,
            start_value,
            end_value,
            start_velocity: None,
            end_velocity: None,
        }
    }

    #[inline]
    pub fn with_velocities(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start_velocity = start;
        self.end_velocity = end;
        self
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.end_time - self.start_time
    }

    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// Outcome of loading serialized tracks against a known parameter set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Known parameters taken from the input.
    pub loaded: Vec<String>,
    /// Input names outside the known set (ghost parameters), dropped.
    pub ignored: Vec<String>,
    /// Known parameters absent from the input, seeded from defaults.
    pub seeded: Vec<String>,
    /// Per-parameter validation failures; those parameters were reset to defaults.
    pub errors: Vec<ParamFlowError>,
}

impl LoadReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty() && self.errors.is_empty()
    }
}

/// Validate one serialized keyframe list: non-empty, finite, non-negative,
/// strictly ascending with gaps wider than `epsilon`.
pub(crate) fn validate_keyframes(
    parameter: &str,
    keyframes: &[Keyframe],
    epsilon: f64,
) -> Result<(), ParamFlowError> {
    if keyframes.is_empty() {
        return Err(ParamFlowError::malformed(parameter, "empty keyframe list"));
    }
    let mut last: Option<f64> = None;
    for (i, k) in keyframes.iter().enumerate() {
        let finite = k.time.is_finite()
            && k.value.is_finite()
            && k.velocity.map_or(true, f64::is_finite)
            && k.acceleration.map_or(true, f64::is_finite);
        if !finite {
            return Err(ParamFlowError::malformed(
                parameter,
                format!("keyframe {i} has non-finite fields"),
            ));
        }
        if k.time < 0.0 {
            return Err(ParamFlowError::malformed(
                parameter,
                format!("keyframe {i} has negative time {}", k.time),
            ));
        }
        if let Some(prev) = last {
            if k.time < prev {
                return Err(ParamFlowError::malformed(
                    parameter,
                    format!("keyframe {i} at {} is out of order", k.time),
                ));
            }
            if k.time - prev < epsilon {
                return Err(ParamFlowError::malformed(
                    parameter,
                    format!("keyframe {i} duplicates time {}", k.time),
                ));
            }
        }
        last = Some(k.time);
    }
    Ok(())
}

/// Validate one baked segment list: non-empty, finite, `start < end`,
/// sorted by start and non-overlapping.
pub(crate) fn validate_segments(parameter: &str, segments: &[Segment]) -> Result<(), ParamFlowError> {
    if segments.is_empty() {
        return Err(ParamFlowError::malformed(parameter, "empty segment list"));
    }
    let mut prev_end: Option<f64> = None;
    for (i, s) in segments.iter().enumerate() {
        let finite = s.start_time.is_finite()
            && s.end_time.is_finite()
            && s.start_value.is_finite()
            && s.end_value.is_finite()
            && s.start_velocity.map_or(true, f64::is_finite)
            && s.end_velocity.map_or(true, f64::is_finite);
        if !finite {
            return Err(ParamFlowError::malformed(
                parameter,
                format!("segment {i} has non-finite fields"),
            ));
        }
        if s.start_time >= s.end_time {
            return Err(ParamFlowError::malformed(
                parameter,
                format!("segment {i} is empty or reversed"),
            ));
        }
        if let Some(end) = prev_end {
            if s.start_time < end {
                return Err(ParamFlowError::malformed(
                    parameter,
                    format!("segment {i} overlaps or precedes its predecessor"),
                ));
            }
        }
        prev_end = Some(s.end_time);
    }
    Ok(())
}
