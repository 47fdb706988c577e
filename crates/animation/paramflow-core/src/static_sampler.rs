//! Constant parameter snapshot that ignores the timeline position.

use log::debug;

use crate::data::{LoadReport, ParameterValues};
use crate::error::ParamFlowError;
use crate::sampling::Sampler;

/// Fixed `{name -> value}` set, e.g. a tuned pose exported from an explorer session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticSampler {
    values: ParameterValues,
}

impl StaticSampler {
    pub fn new<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Start from `defaults`, then take every known name from `values`.
    ///
    /// Unknown names are dropped and non-finite values keep the default.
    pub fn load<I, K>(defaults: I, values: &ParameterValues) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut out: ParameterValues = defaults.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let mut report = LoadReport::default();

        let mut names: Vec<&String> = values.keys().collect();
        names.sort();
        for name in names {
            let value = values[name];
            match out.get_mut(name) {
                Some(slot) if value.is_finite() => {
                    debug!("Loaded parameter: {name}");
                    *slot = value;
                    report.loaded.push(name.clone());
                }
                Some(_) => {
                    report.errors.push(ParamFlowError::malformed(
                        name.as_str(),
                        format!("non-finite value {value}"),
                    ));
                }
                None => {
                    debug!("Skipping undefined parameter: {name}");
                    report.ignored.push(name.clone());
                }
            }
        }

        let mut seeded: Vec<String> = out
            .keys()
            .filter(|k| !values.contains_key(k.as_str()))
            .cloned()
            .collect();
        seeded.sort();
        report.seeded = seeded;
        (Self { values: out }, report)
    }

    #[inline]
    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

impl Sampler for StaticSampler {
    fn values_at(&self, _time: f64) -> ParameterValues {
        self.values.clone()
    }

    fn parameter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_filters_ghosts_and_seeds_defaults() {
        let mut saved = ParameterValues::new();
        saved.insert("zoom".to_string(), 2.5);
        saved.insert("legacy".to_string(), 1.0);

        let (sampler, report) = StaticSampler::load([("zoom", 1.0), ("pan", 0.0)], &saved);
        assert_eq!(sampler.get("zoom"), Some(2.5));
        assert_eq!(sampler.get("pan"), Some(0.0));
        assert_eq!(sampler.get("legacy"), None);
        assert_eq!(report.loaded, vec!["zoom".to_string()]);
        assert_eq!(report.ignored, vec!["legacy".to_string()]);
        assert_eq!(report.seeded, vec!["pan".to_string()]);
    }

    #[test]
    fn values_do_not_depend_on_time() {
        let sampler = StaticSampler::new([("a", 1.0)]);
        assert_eq!(sampler.values_at(0.0), sampler.values_at(123.0));
        assert_eq!(sampler.parameter_names(), vec!["a".to_string()]);
    }
}
