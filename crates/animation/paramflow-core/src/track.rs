//! A parameter track: a sorted, never-empty keyframe sequence.

use serde::{Deserialize, Serialize};

use crate::data::{validate_keyframes, Keyframe};
use crate::error::ParamFlowError;

/// Nearest keyframe times around a query time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosestKeyframes {
    /// Greatest keyframe time `<= time`, or `0.0`.
    pub previous: f64,
    /// Smallest keyframe time `> time`, or the timeline duration.
    pub next: f64,
}

/// Keyframes of one parameter in ascending time order.
///
/// Times are pairwise further apart than the engine epsilon and the list is
/// never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Single keyframe at `t = 0`.
    #[inline]
    pub fn constant(value: f64) -> Self {
        Self {
            keyframes: vec![Keyframe::new(0.0, value)],
        }
    }

    /// Build from serialized keyframes, rejecting lists that break the track invariants.
    pub fn from_keyframes(
        parameter: &str,
        keyframes: Vec<Keyframe>,
        epsilon: f64,
    ) -> Result<Self, ParamFlowError> {
        validate_keyframes(parameter, &keyframes, epsilon)?;
        Ok(Self { keyframes })
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false for a well-formed track; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Index of the keyframe nearest `time`, if it lies within `epsilon`.
    pub fn find(&self, time: f64, epsilon: f64) -> Option<usize> {
        let idx = self.keyframes.partition_point(|k| k.time < time);
        let after = self.keyframes.get(idx).map(|k| (idx, (k.time - time).abs()));
        let before = idx
            .checked_sub(1)
            .map(|i| (i, (self.keyframes[i].time - time).abs()));
        [before, after]
            .into_iter()
            .flatten()
            .filter(|(_, d)| *d < epsilon)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Insert a keyframe, or overwrite the one within `epsilon` of `time`.
    ///
    /// On overwrite the value is always replaced; velocity and acceleration
    /// only when supplied.
    pub fn upsert(
        &mut self,
        time: f64,
        value: f64,
        velocity: Option<f64>,
        acceleration: Option<f64>,
        epsilon: f64,
    ) {
        if let Some(i) = self.find(time, epsilon) {
            let k = &mut self.keyframes[i];
            k.value = value;
            if velocity.is_some() {
                k.velocity = velocity;
            }
            if acceleration.is_some() {
                k.acceleration = acceleration;
            }
            return;
        }
        let idx = self.keyframes.partition_point(|k| k.time < time);
        self.keyframes.insert(
            idx,
            Keyframe {
                time,
                value,
                velocity,
                acceleration,
            },
        );
    }

    /// Remove the keyframe within `epsilon` of `time`.
    ///
    /// A track left empty, or left with only its `t = 0` keyframe, is reset
    /// to a single keyframe at `t = 0` holding `fallback_value`. A lone
    /// survivor later on the timeline is kept as is.
    /// Returns the removed keyframe, or `None` when nothing matched.
    pub fn remove(&mut self, time: f64, fallback_value: f64, epsilon: f64) -> Option<Keyframe> {
        let i = self.find(time, epsilon)?;
        let removed = self.keyframes.remove(i);
        let collapse = match self.keyframes.as_slice() {
            [] => true,
            [only] => only.time.abs() < epsilon,
            _ => false,
        };
        if collapse {
            self.keyframes.clear();
            self.keyframes.push(Keyframe::new(0.0, fallback_value));
        }
        Some(removed)
    }

    /// Neighbouring keyframe times for previous/next navigation.
    pub fn closest(&self, time: f64, duration: f64) -> ClosestKeyframes {
        let idx = self.keyframes.partition_point(|k| k.time <= time);
        let previous = idx
            .checked_sub(1)
            .map(|i| self.keyframes[i].time)
            .unwrap_or(0.0);
        let next = self
            .keyframes
            .get(idx)
            .map(|k| k.time)
            .unwrap_or(duration);
        ClosestKeyframes { previous, next }
    }
}
