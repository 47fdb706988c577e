//! Clock lifecycle notifications.
//!
//! Events are delivered synchronously to listeners registered on the clock,
//! in the order the state changes happen.

use serde::{Deserialize, Serialize};

/// Discrete signals emitted by the playback clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClockEvent {
    Play,
    Pause,
    /// Emitted after the jump, with the clamped target time.
    Seek {
        time: f64,
    },
    /// The end-of-timeline timer fired; the clock is paused at its duration.
    End,
}

impl ClockEvent {
    /// Get the name of this event
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Seek { .. } => "seek",
            Self::End => "end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(ClockEvent::Seek { time: 1.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "seek", "time": 1.5 }));
        let end: ClockEvent = serde_json::from_str(r#"{"type":"end"}"#).unwrap();
        assert_eq!(end, ClockEvent::End);
        assert_eq!(end.name(), "end");
    }
}
