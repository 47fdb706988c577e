//! Baking API: convert keyframe tracks into segment tracks for read-only playback.
//!
//! Each track bakes to segments covering `[0, duration]`:
//! - a head segment `0 -> first.time` when the first keyframe starts later
//! - one segment per adjacent keyframe pair
//! - a tail segment `last.time -> duration` when the timeline runs past the last keyframe
//!
//! Boundary values come from the engine's curve and boundary velocities from
//! its analytic derivative, so a [`crate::SegmentSampler`] replays cubic-mode
//! tracks exactly. Quintic spans with acceleration are approximated by a
//! cubic with the same end slopes.

use crate::config::Config;
use crate::data::{Keyframe, Segment, SegmentTracks};
use crate::engine::Engine;
use crate::sampling::{sample_keyframes, sample_keyframes_velocity, span_boundary_velocities};

/// Bake every track of `engine` over `[0, duration]`.
pub fn bake_segments(engine: &Engine, duration: f64) -> SegmentTracks {
    let cfg = engine.config();
    engine
        .parameter_names()
        .into_iter()
        .filter_map(|name| {
            let segments = bake_track(engine.keyframes(&name)?, duration, cfg);
            Some((name, segments))
        })
        .collect()
}

/// Bake one sorted keyframe list. A lone keyframe with nothing to span bakes
/// to a one-second segment so the result is never empty.
pub fn bake_track(keyframes: &[Keyframe], duration: f64, cfg: &Config) -> Vec<Segment> {
    let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
        return Vec::new();
    };
    let eps = cfg.effective_epsilon();
    let value = |t: f64| sample_keyframes(keyframes, t, cfg).unwrap_or(0.0);
    let velocity = |t: f64| sample_keyframes_velocity(keyframes, t, cfg).unwrap_or(0.0);

    let mut segments = Vec::with_capacity(keyframes.len() + 1);
    if first.time > eps {
        segments.push(
            Segment::new(0.0, first.time, value(0.0), first.value)
                .with_velocities(Some(velocity(0.0)), Some(velocity(first.time))),
        );
    }
    for pair in keyframes.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let (v0, v1) = span_boundary_velocities(left, right, cfg);
        segments.push(
            Segment::new(left.time, right.time, left.value, right.value)
                .with_velocities(Some(v0), Some(v1)),
        );
    }

    let tail_end = if duration.is_finite() && duration > last.time + eps {
        Some(duration)
    } else if segments.is_empty() {
        Some(last.time + 1.0)
    } else {
        None
    };
    if let Some(end) = tail_end {
        segments.push(
            Segment::new(last.time, end, last.value, value(end))
                .with_velocities(Some(velocity(last.time)), Some(velocity(end))),
        );
    }
    segments
}
