//! Exported timeline artifacts.
//!
//! Keyframe artifact:
//! ```json
//! { "duration": 4.0,
//!   "parameters": { "zoom": [ { "time": 0.0, "value": 1.0, "velocity": 0.5 } ] } }
//! ```
//! Segment artifact: same envelope, each keyframe array replaced by
//! `{ startTime, endTime, startValue, endValue, startVelocity?, endVelocity? }`
//! segments.
//!
//! Parsing only checks the JSON shape. Per-parameter validation and
//! ghost-parameter filtering happen when the artifact is loaded into an
//! [`crate::Engine`] or [`crate::SegmentSampler`].

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DURATION;
use crate::data::{KeyframeTracks, SegmentTracks};
use crate::Result;

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

/// Saved keyframe animation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationArtifact {
    /// Timeline length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub parameters: KeyframeTracks,
}

/// Baked segment animation, replayed by a [`crate::SegmentSampler`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentArtifact {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub parameters: SegmentTracks,
}

impl AnimationArtifact {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SegmentArtifact {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
