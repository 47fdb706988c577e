//! Read-only sampler over baked segment tracks.
//!
//! Each parameter holds disjoint segments sorted by start time, each with its
//! own boundary values and optional boundary velocities:
//! - before the first segment: linear extrapolation with `start_velocity`
//! - after the last segment: linear extrapolation with `end_velocity`
//! - inside a segment: cubic Bézier (chord fallback for missing velocities) or
//!   straight linear interpolation, per [`SegmentInterpolation`]
//! - in a gap between two segments: hold the previous segment's end value
//!
//! A track that is empty or misordered samples as `0.0`.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::artifact::SegmentArtifact;
use crate::config::SegmentInterpolation;
use crate::data::{validate_segments, LoadReport, ParameterValues, Segment, SegmentTracks};
use crate::interp::functions::{
    cubic_control_points, eval_cubic_bezier, eval_cubic_bezier_derivative, lerp,
};
use crate::sampling::Sampler;

#[derive(Clone, Debug, PartialEq)]
enum SegmentTrack {
    Segments(Vec<Segment>),
    /// Seeded or reset from a default on load.
    Constant(f64),
    /// Kept as given; samples as zero.
    Malformed(Vec<Segment>),
}

/// Sampler for exported animations; it has no mutation API.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentSampler {
    mode: SegmentInterpolation,
    tracks: BTreeMap<String, SegmentTrack>,
}

fn classify(name: &str, segments: Vec<Segment>) -> SegmentTrack {
    match validate_segments(name, &segments) {
        Ok(()) => SegmentTrack::Segments(segments),
        Err(err) => {
            warn!("{err}; track will sample as 0");
            SegmentTrack::Malformed(segments)
        }
    }
}

impl SegmentSampler {
    /// Wrap segment tracks as given, with cubic interpolation.
    pub fn new(tracks: SegmentTracks) -> Self {
        Self::with_mode(tracks, SegmentInterpolation::Cubic)
    }

    /// Wrap segment tracks as given; malformed tracks sample as zero.
    pub fn with_mode(tracks: SegmentTracks, mode: SegmentInterpolation) -> Self {
        let tracks = tracks
            .into_iter()
            .map(|(name, segments)| {
                let track = classify(&name, segments);
                (name, track)
            })
            .collect();
        Self { mode, tracks }
    }

    /// Load segment tracks against a known parameter set.
    ///
    /// Ghost names are dropped; missing or malformed known parameters hold
    /// their default value.
    pub fn load<I, K>(
        defaults: I,
        tracks: SegmentTracks,
        mode: SegmentInterpolation,
    ) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut defaults: Vec<(String, f64)> = defaults
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        defaults.sort_by(|a, b| a.0.cmp(&b.0));

        let mut incoming = tracks;
        let mut report = LoadReport::default();
        let mut out = BTreeMap::new();
        for (name, default) in defaults {
            let track = match incoming.remove(&name) {
                Some(segments) => match validate_segments(&name, &segments) {
                    Ok(()) => {
                        debug!("Loaded parameter: {name}");
                        report.loaded.push(name.clone());
                        SegmentTrack::Segments(segments)
                    }
                    Err(err) => {
                        warn!("{err}; holding default {default}");
                        report.errors.push(err);
                        SegmentTrack::Constant(default)
                    }
                },
                None => {
                    report.seeded.push(name.clone());
                    SegmentTrack::Constant(default)
                }
            };
            out.insert(name, track);
        }
        for ghost in incoming.into_keys() {
            debug!("Skipping undefined parameter: {ghost}");
            report.ignored.push(ghost);
        }
        (Self { mode, tracks: out }, report)
    }

    /// Load the parameters of a segment artifact (see [`SegmentSampler::load`]).
    pub fn from_artifact<I, K>(
        defaults: I,
        artifact: SegmentArtifact,
        mode: SegmentInterpolation,
    ) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::load(defaults, artifact.parameters, mode)
    }

    #[inline]
    pub fn mode(&self) -> SegmentInterpolation {
        self.mode
    }

    /// Segments of one parameter; empty for parameters holding a default.
    pub fn segments(&self, name: &str) -> Option<&[Segment]> {
        self.tracks.get(name).map(|track| match track {
            SegmentTrack::Segments(s) | SegmentTrack::Malformed(s) => s.as_slice(),
            SegmentTrack::Constant(_) => &[] as &[Segment],
        })
    }

    /// Known parameter names, sorted.
    pub fn parameter_names(&self) -> Vec<String> {
        self.tracks.keys().cloned().collect()
    }

    fn sample_track(&self, name: &str, track: &SegmentTrack, time: f64) -> f64 {
        match track {
            SegmentTrack::Constant(v) => *v,
            SegmentTrack::Malformed(_) => 0.0,
            SegmentTrack::Segments(segments) => sample_segments(segments, time, self.mode)
                .unwrap_or_else(|| {
                    warn!("values_at: no segment for '{name}' at {time}; using 0");
                    0.0
                }),
        }
    }

    /// Sample every parameter at `time`.
    pub fn values_at(&self, time: f64) -> ParameterValues {
        self.tracks
            .iter()
            .map(|(name, track)| (name.clone(), self.sample_track(name, track, time)))
            .collect()
    }

    /// First derivative (units per second) of every parameter at `time`.
    pub fn velocities_at(&self, time: f64) -> ParameterValues {
        self.tracks
            .iter()
            .map(|(name, track)| {
                let v = match track {
                    SegmentTrack::Segments(segments) => {
                        sample_segments_velocity(segments, time, self.mode).unwrap_or(0.0)
                    }
                    SegmentTrack::Constant(_) | SegmentTrack::Malformed(_) => 0.0,
                };
                (name.clone(), v)
            })
            .collect()
    }
}

impl Sampler for SegmentSampler {
    fn values_at(&self, time: f64) -> ParameterValues {
        SegmentSampler::values_at(self, time)
    }

    fn parameter_names(&self) -> Vec<String> {
        SegmentSampler::parameter_names(self)
    }
}

/// Where `time` falls relative to a sorted segment list.
enum Position<'a> {
    Before(&'a Segment),
    After(&'a Segment),
    Inside(&'a Segment),
    Gap(&'a Segment),
}

fn locate(segments: &[Segment], time: f64) -> Option<Position<'_>> {
    let first = segments.first()?;
    let last = segments.last()?;
    if time < first.start_time {
        return Some(Position::Before(first));
    }
    if time > last.end_time {
        return Some(Position::After(last));
    }
    let idx = segments.partition_point(|s| s.start_time <= time);
    let candidate = segments.get(idx.checked_sub(1)?)?;
    if candidate.contains(time) && candidate.span() > 0.0 {
        return Some(Position::Inside(candidate));
    }
    match segments.get(idx) {
        Some(next) if candidate.end_time < time && time < next.start_time => {
            Some(Position::Gap(candidate))
        }
        _ => None,
    }
}

/// Sample a sorted segment list at `time`.
pub fn sample_segments(segments: &[Segment], time: f64, mode: SegmentInterpolation) -> Option<f64> {
    Some(match locate(segments, time)? {
        Position::Before(s) => {
            s.start_value - s.start_velocity.unwrap_or(0.0) * (s.start_time - time)
        }
        Position::After(s) => s.end_value + s.end_velocity.unwrap_or(0.0) * (time - s.end_time),
        Position::Gap(s) => s.end_value,
        Position::Inside(s) => {
            let t = (time - s.start_time) / s.span();
            match mode {
                SegmentInterpolation::Linear => lerp(s.start_value, s.end_value, t),
                SegmentInterpolation::Cubic => {
                    let (p1, p2) = cubic_control_points(
                        s.start_value,
                        s.end_value,
                        s.span(),
                        s.start_velocity,
                        s.end_velocity,
                    );
                    eval_cubic_bezier(s.start_value, p1, p2, s.end_value, t)
                }
            }
        }
    })
}

/// First time-derivative of [`sample_segments`].
pub fn sample_segments_velocity(
    segments: &[Segment],
    time: f64,
    mode: SegmentInterpolation,
) -> Option<f64> {
    Some(match locate(segments, time)? {
        Position::Before(s) => s.start_velocity.unwrap_or(0.0),
        Position::After(s) => s.end_velocity.unwrap_or(0.0),
        Position::Gap(_) => 0.0,
        Position::Inside(s) => {
            let span = s.span();
            match mode {
                SegmentInterpolation::Linear => (s.end_value - s.start_value) / span,
                SegmentInterpolation::Cubic => {
                    let (p1, p2) = cubic_control_points(
                        s.start_value,
                        s.end_value,
                        span,
                        s.start_velocity,
                        s.end_velocity,
                    );
                    let t = (time - s.start_time) / span;
                    eval_cubic_bezier_derivative(s.start_value, p1, p2, s.end_value, t) / span
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn locate_positions() {
        let segs = [
            Segment::new(1.0, 2.0, 0.0, 1.0),
            Segment::new(3.0, 4.0, 1.0, 0.0),
        ];
        assert!(matches!(locate(&segs, 0.5), Some(Position::Before(_))));
        assert!(matches!(locate(&segs, 1.5), Some(Position::Inside(_))));
        assert!(matches!(locate(&segs, 2.5), Some(Position::Gap(_))));
        assert!(matches!(locate(&segs, 3.0), Some(Position::Inside(_))));
        assert!(matches!(locate(&segs, 4.5), Some(Position::After(_))));
        assert!(locate(&[], 1.0).is_none());
    }

    #[test]
    fn linear_mode_is_straight() {
        let segs = [Segment::new(0.0, 2.0, 1.0, 5.0).with_velocities(Some(10.0), Some(-10.0))];
        approx(
            sample_segments(&segs, 0.5, SegmentInterpolation::Linear).unwrap(),
            2.0,
            1e-12,
        );
        approx(
            sample_segments_velocity(&segs, 0.5, SegmentInterpolation::Linear).unwrap(),
            2.0,
            1e-12,
        );
    }
}
