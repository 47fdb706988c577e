//! Engine: owns one keyframe track per known parameter and exposes the
//! editing/query surface driven by input-translation glue.
//!
//! Methods:
//! - new / with_config / from_serialized
//! - upsert_keyframe, remove_keyframe, closest_keyframes
//! - values_at, velocities_at (full parameter snapshots)
//! - serialize / load (ghost-parameter filtering, per-parameter validation)
//! - reset_parameter(s), apply_deltas

use hashbrown::HashMap;
use log::{debug, warn};

use crate::artifact::AnimationArtifact;
use crate::config::Config;
use crate::data::{Keyframe, KeyframeTracks, LoadReport, ParameterValues};
use crate::error::ParamFlowError;
use crate::sampling::{sample_keyframes, sample_keyframes_velocity, Sampler};
use crate::track::{ClosestKeyframes, Track};
use crate::Result;

/// Keyframe animation over a fixed set of named parameters.
///
/// The known parameter set is fixed at construction from the default values;
/// every known parameter always has a non-empty track.
#[derive(Clone, Debug)]
pub struct Engine {
    cfg: Config,
    defaults: ParameterValues,
    tracks: HashMap<String, Track>,
}

impl Engine {
    /// Create an engine seeded with one `t = 0` keyframe per default value.
    pub fn new<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::with_config(defaults, Config::default())
    }

    /// Create an engine with an explicit sampling configuration.
    pub fn with_config<I, K>(defaults: I, cfg: Config) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let defaults: ParameterValues = defaults
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        let tracks = defaults
            .iter()
            .map(|(name, value)| (name.clone(), Track::constant(*value)))
            .collect();
        Self {
            cfg,
            defaults,
            tracks,
        }
    }

    /// Create an engine from defaults, then load previously serialized tracks.
    pub fn from_serialized<I, K>(defaults: I, tracks: KeyframeTracks, cfg: Config) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut engine = Self::with_config(defaults, cfg);
        let report = engine.load(tracks);
        (engine, report)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Default value of every known parameter.
    #[inline]
    pub fn defaults(&self) -> &ParameterValues {
        &self.defaults
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.tracks.contains_key(name)
    }

    /// Known parameter names, sorted.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tracks.keys().cloned().collect();
        names.sort();
        names
    }

    #[inline]
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    #[inline]
    pub fn keyframes(&self, name: &str) -> Option<&[Keyframe]> {
        self.tracks.get(name).map(Track::keyframes)
    }

    fn track_mut(&mut self, name: &str) -> Result<&mut Track> {
        self.tracks
            .get_mut(name)
            .ok_or_else(|| ParamFlowError::unknown(name))
    }

    /// Insert a keyframe or overwrite the one within epsilon of `time`.
    ///
    /// Velocity and acceleration are only written when supplied; an update
    /// never clears them.
    pub fn upsert_keyframe(
        &mut self,
        name: &str,
        time: f64,
        value: f64,
        velocity: Option<f64>,
        acceleration: Option<f64>,
    ) -> Result<()> {
        if !self.contains(name) {
            return Err(ParamFlowError::unknown(name));
        }
        let reason = if !time.is_finite() || time < 0.0 {
            Some(format!("time must be finite and >= 0, got {time}"))
        } else if !value.is_finite() {
            Some(format!("value must be finite, got {value}"))
        } else if velocity.is_some_and(|v| !v.is_finite()) {
            Some("velocity must be finite".to_string())
        } else if acceleration.is_some_and(|a| !a.is_finite()) {
            Some("acceleration must be finite".to_string())
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ParamFlowError::InvalidKeyframe {
                parameter: name.to_string(),
                reason,
            });
        }

        let eps = self.cfg.effective_epsilon();
        self.track_mut(name)?
            .upsert(time, value, velocity, acceleration, eps);
        Ok(())
    }

    /// Remove the keyframe within epsilon of `time`.
    ///
    /// When the track would be left empty, or holding only its `t = 0`
    /// keyframe, it is reset to a single `t = 0` keyframe holding
    /// `fallback_value`. A surviving keyframe later on the timeline is kept.
    pub fn remove_keyframe(
        &mut self,
        name: &str,
        time: f64,
        fallback_value: f64,
    ) -> Result<Option<Keyframe>> {
        if !self.contains(name) {
            return Err(ParamFlowError::unknown(name));
        }
        if !fallback_value.is_finite() {
            return Err(ParamFlowError::InvalidKeyframe {
                parameter: name.to_string(),
                reason: format!("fallback value must be finite, got {fallback_value}"),
            });
        }
        let eps = self.cfg.effective_epsilon();
        let removed = self.track_mut(name)?.remove(time, fallback_value, eps);
        if removed.is_none() {
            debug!("remove_keyframe: no keyframe for '{name}' near {time}");
        }
        Ok(removed)
    }

    /// Previous/next keyframe times around `time` for navigation.
    pub fn closest_keyframes(&self, name: &str, time: f64, duration: f64) -> Result<ClosestKeyframes> {
        self.tracks
            .get(name)
            .map(|t| t.closest(time, duration))
            .ok_or_else(|| ParamFlowError::unknown(name))
    }

    /// Sample one parameter; `None` for unknown names.
    pub fn value_at(&self, name: &str, time: f64) -> Option<f64> {
        self.tracks
            .get(name)
            .map(|track| self.sample_or_zero(name, track, time))
    }

    fn sample_or_zero(&self, name: &str, track: &Track, time: f64) -> f64 {
        sample_keyframes(track.keyframes(), time, &self.cfg).unwrap_or_else(|| {
            warn!("values_at: no bracketing keyframes for '{name}' at {time}; using 0");
            0.0
        })
    }

    /// Sample every parameter at `time`.
    pub fn values_at(&self, time: f64) -> ParameterValues {
        self.tracks
            .iter()
            .map(|(name, track)| (name.clone(), self.sample_or_zero(name, track, time)))
            .collect()
    }

    /// First derivative (units per second) of every parameter at `time`.
    pub fn velocities_at(&self, time: f64) -> ParameterValues {
        self.tracks
            .iter()
            .map(|(name, track)| {
                let v = sample_keyframes_velocity(track.keyframes(), time, &self.cfg)
                    .unwrap_or(0.0);
                (name.clone(), v)
            })
            .collect()
    }

    /// Snapshot all tracks.
    pub fn serialize(&self) -> KeyframeTracks {
        self.tracks
            .iter()
            .map(|(name, track)| (name.clone(), track.keyframes().to_vec()))
            .collect()
    }

    /// Replace tracks from a serialized snapshot.
    ///
    /// Names outside the known set are dropped; known names missing from the
    /// input, or whose keyframes fail validation, are reset to their default.
    pub fn load(&mut self, tracks: KeyframeTracks) -> LoadReport {
        debug!("Loading {} serialized tracks", tracks.len());
        let eps = self.cfg.effective_epsilon();
        let mut report = LoadReport::default();
        let mut incoming = tracks;

        let mut names: Vec<String> = self.defaults.keys().cloned().collect();
        names.sort();
        for name in names {
            let default = self.defaults[&name];
            let track = match incoming.remove(&name) {
                Some(keyframes) => match Track::from_keyframes(&name, keyframes, eps) {
                    Ok(track) => {
                        debug!("Loaded parameter: {name}");
                        report.loaded.push(name.clone());
                        track
                    }
                    Err(err) => {
                        warn!("{err}; resetting to default {default}");
                        report.errors.push(err);
                        Track::constant(default)
                    }
                },
                None => {
                    report.seeded.push(name.clone());
                    Track::constant(default)
                }
            };
            self.tracks.insert(name, track);
        }

        for ghost in incoming.into_keys() {
            debug!("Skipping undefined parameter: {ghost}");
            report.ignored.push(ghost);
        }
        report
    }

    /// Reset one parameter to its single default keyframe.
    pub fn reset_parameter(&mut self, name: &str) -> Result<()> {
        let default = *self
            .defaults
            .get(name)
            .ok_or_else(|| ParamFlowError::unknown(name))?;
        self.tracks.insert(name.to_string(), Track::constant(default));
        Ok(())
    }

    /// Reset several parameters; nothing changes if any name is unknown.
    pub fn reset_parameters<'a, I>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        if let Some(unknown) = names.iter().find(|n| !self.contains(n)) {
            return Err(ParamFlowError::unknown(*unknown));
        }
        for name in names {
            self.reset_parameter(name)?;
        }
        Ok(())
    }

    /// Add each delta to the parameter's sampled value at `time` and keyframe the result.
    ///
    /// The batch is rejected as a whole if any name is unknown.
    pub fn apply_deltas<'a, I>(&mut self, time: f64, deltas: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let deltas: Vec<(&str, f64)> = deltas.into_iter().collect();
        if let Some((unknown, _)) = deltas.iter().find(|(n, _)| !self.contains(n)) {
            return Err(ParamFlowError::unknown(*unknown));
        }
        let targets: Vec<(&str, f64)> = deltas
            .iter()
            .map(|(name, delta)| {
                let current = self.value_at(name, time).unwrap_or(0.0);
                (*name, current + delta)
            })
            .collect();
        let invalid = if !time.is_finite() || time < 0.0 {
            targets
                .first()
                .map(|(name, _)| (*name, format!("time must be finite and >= 0, got {time}")))
        } else {
            targets
                .iter()
                .find(|(_, value)| !value.is_finite())
                .map(|(name, value)| (*name, format!("value must be finite, got {value}")))
        };
        if let Some((name, reason)) = invalid {
            return Err(ParamFlowError::InvalidKeyframe {
                parameter: name.to_string(),
                reason,
            });
        }
        for (name, value) in targets {
            self.upsert_keyframe(name, time, value, None, None)?;
        }
        Ok(())
    }

    /// Export tracks as a timeline artifact of the given duration.
    pub fn export(&self, duration: f64) -> AnimationArtifact {
        AnimationArtifact {
            duration,
            parameters: self.serialize(),
        }
    }

    /// Load the parameters of a timeline artifact (see [`Engine::load`]).
    pub fn import(&mut self, artifact: AnimationArtifact) -> LoadReport {
        self.load(artifact.parameters)
    }
}

impl Sampler for Engine {
    fn values_at(&self, time: f64) -> ParameterValues {
        Engine::values_at(self, time)
    }

    fn parameter_names(&self) -> Vec<String> {
        Engine::parameter_names(self)
    }
}
