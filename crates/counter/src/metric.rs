//! Metric observations and the constructor seam that builds them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tally_config::{CounterConfig, Statistic};

use crate::error::Result;
use crate::preset::Preset;

/// Resolution attached to metrics when the caller does not set one, in seconds
pub const DEFAULT_RESOLUTION: u32 = 60;

/// Caller-supplied overrides for the options a preset provides
///
/// Fields left as `None` (or empty tags) fall back to the preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricOverrides {
    pub unit: Option<String>,
    pub statistic: Option<Statistic>,
    pub resolution: Option<u32>,
    pub tags: BTreeMap<String, String>,
}

impl MetricOverrides {
    /// Override the unit
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Override the statistic
    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = Some(statistic);
        self
    }

    /// Override the resolution (seconds)
    pub fn resolution(mut self, resolution: u32) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Attach a tag
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl From<&CounterConfig> for MetricOverrides {
    fn from(config: &CounterConfig) -> Self {
        Self {
            unit: config.unit.clone(),
            statistic: config.statistic,
            resolution: config.resolution,
            tags: config.tags.clone(),
        }
    }
}

/// Resolved metric options: preset defaults with overrides applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricOptions {
    pub unit: String,
    pub statistic: Statistic,
    pub resolution: u32,
    pub tags: BTreeMap<String, String>,
}

impl MetricOptions {
    /// Merge `overrides` over the defaults of `preset`
    pub fn resolve(preset: Preset, overrides: MetricOverrides) -> Self {
        Self {
            unit: overrides.unit.unwrap_or_else(|| preset.unit().to_string()),
            statistic: overrides.statistic.unwrap_or(preset.statistic()),
            resolution: overrides.resolution.unwrap_or(DEFAULT_RESOLUTION),
            tags: overrides.tags,
        }
    }
}

/// A single metric observation
#[derive(Debug, Clone, PartialEq)]
pub struct SingleMetric {
    pub name: String,
    pub unit: String,
    pub statistic: Statistic,
    pub resolution: u32,
    pub tags: BTreeMap<String, String>,
    /// Set when a value is recorded
    pub date: Option<DateTime<Utc>>,
    pub value: f64,
}

impl SingleMetric {
    /// Create an unrecorded metric from resolved options
    pub fn new(name: impl Into<String>, options: &MetricOptions) -> Self {
        Self {
            name: name.into(),
            unit: options.unit.clone(),
            statistic: options.statistic,
            resolution: options.resolution,
            tags: options.tags.clone(),
            date: None,
            value: 0.0,
        }
    }

    /// Record a value, stamping the observation with the current time
    pub fn record(&mut self, value: f64) {
        self.value = value;
        self.date = Some(Utc::now());
    }
}

/// Builds metric observations for collectors
///
/// Hosts that keep their own metric registry implement this to hand out
/// their metric objects; [`DefaultConstructor`] builds plain
/// [`SingleMetric`]s.
pub trait MetricConstructor: Send + Sync {
    /// Build an unrecorded metric named `name`
    fn single(&self, name: &str, options: &MetricOptions) -> Result<SingleMetric>;
}

/// Constructor that never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConstructor;

impl MetricConstructor for DefaultConstructor {
    fn single(&self, name: &str, options: &MetricOptions) -> Result<SingleMetric> {
        Ok(SingleMetric::new(name, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_preset_defaults() {
        let options = MetricOptions::resolve(Preset::RATE, MetricOverrides::default());
        assert_eq!(options.unit, "count/second");
        assert_eq!(options.statistic, Statistic::Average);
        assert_eq!(options.resolution, DEFAULT_RESOLUTION);
        assert!(options.tags.is_empty());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = MetricOverrides::default()
            .unit("requests")
            .statistic(Statistic::Sum)
            .resolution(10)
            .tag("service", "api");

        let options = MetricOptions::resolve(Preset::PERSISTENT, overrides);
        assert_eq!(options.unit, "requests");
        assert_eq!(options.statistic, Statistic::Sum);
        assert_eq!(options.resolution, 10);
        assert_eq!(options.tags.get("service").map(String::as_str), Some("api"));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let options = MetricOptions::resolve(Preset::DELTA, MetricOverrides::default().unit("bytes"));
        assert_eq!(options.unit, "bytes");
        assert_eq!(options.statistic, Statistic::Sum);
    }

    #[test]
    fn test_overrides_from_config() {
        let config = CounterConfig {
            name: "jobs".into(),
            unit: Some("jobs".into()),
            resolution: Some(5),
            ..Default::default()
        };
        let overrides = MetricOverrides::from(&config);
        assert_eq!(overrides.unit.as_deref(), Some("jobs"));
        assert_eq!(overrides.statistic, None);
        assert_eq!(overrides.resolution, Some(5));
    }

    #[test]
    fn test_record_sets_value_and_date() {
        let options = MetricOptions::resolve(Preset::DELTA, MetricOverrides::default());
        let mut metric = DefaultConstructor.single("test.delta", &options).unwrap();
        assert!(metric.date.is_none());

        metric.record(10.0);
        assert_eq!(metric.name, "test.delta");
        assert_eq!(metric.value, 10.0);
        assert_eq!(metric.unit, "count");
        assert_eq!(metric.statistic, Statistic::Sum);
        assert!(metric.date.is_some());
    }
}
