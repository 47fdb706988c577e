//! Error types for parameter tracks, samplers and the playback clock

use serde::{Deserialize, Serialize};

/// Errors raised by engine mutations, artifact loading and clock control.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ParamFlowError {
    /// Mutation or query on a name outside the engine's known parameter set
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// Seek target is NaN or infinite
    #[error("Invalid seek target: {time}")]
    InvalidSeekTarget { time: f64 },

    /// Keyframe or segment list for a known parameter failed validation on load
    #[error("Malformed track data for '{parameter}': {reason}")]
    MalformedTrackData { parameter: String, reason: String },

    /// Keyframe fields outside the accepted domain
    #[error("Invalid keyframe for '{parameter}': {reason}")]
    InvalidKeyframe { parameter: String, reason: String },

    /// Clock duration negative or NaN
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: f64 },

    /// Artifact (de)serialization failure
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl ParamFlowError {
    /// Shorthand for [`ParamFlowError::UnknownParameter`].
    #[inline]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Shorthand for [`ParamFlowError::MalformedTrackData`].
    #[inline]
    pub fn malformed(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTrackData {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Name of the parameter the error refers to, if any.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter { name } => Some(name),
            Self::MalformedTrackData { parameter, .. } | Self::InvalidKeyframe { parameter, .. } => {
                Some(parameter)
            }
            _ => None,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownParameter { .. } | Self::MalformedTrackData { .. } => "data",
            Self::InvalidKeyframe { .. } | Self::InvalidDuration { .. } => "validation",
            Self::InvalidSeekTarget { .. } => "playback",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ParamFlowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
