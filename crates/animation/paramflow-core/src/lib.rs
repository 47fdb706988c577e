//! ParamFlow Core (engine-agnostic)
//!
//! Named scalar parameters animated over a timeline:
//! - [`Engine`]: editable keyframe tracks sampled with cubic/quintic Bézier curves
//! - [`SegmentSampler`]: read-only playback of baked segment tracks
//! - [`StaticSampler`]: a fixed parameter snapshot
//! - [`PlaybackClock`]: a pausable, seekable virtual clock
//!
//! The clock and the samplers are siblings: the host reads
//! `clock.current_time()` and passes it to `sampler.values_at(time)` each frame.

pub mod artifact;
pub mod baking;
pub mod clock;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod interp;
pub mod sampling;
pub mod segments;
pub mod static_sampler;
pub mod time;
pub mod track;

// Re-exports for consumers (hosts and editors)
pub use artifact::{AnimationArtifact, SegmentArtifact};
pub use baking::{bake_segments, bake_track};
pub use clock::PlaybackClock;
pub use config::{ClockConfig, Config, CurveMode, SegmentInterpolation, TangentPolicy};
pub use data::{Keyframe, KeyframeTracks, LoadReport, ParameterValues, Segment, SegmentTracks};
pub use engine::Engine;
pub use error::ParamFlowError;
pub use events::ClockEvent;
pub use ids::ListenerId;
pub use sampling::{sample_keyframes, Sampler};
pub use segments::{sample_segments, SegmentSampler};
pub use static_sampler::StaticSampler;
pub use time::{ManualTimeSource, MonotonicTimeSource, TimeSource};
pub use track::{ClosestKeyframes, Track};

/// Result type for fallible paramflow operations.
pub type Result<T> = core::result::Result<T, ParamFlowError>;
