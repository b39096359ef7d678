//! Counter declarations
//!
//! Each `[[counters]]` entry declares one logical counter: its name, the
//! mode it samples in, and optional overrides for the metric options that
//! mode would otherwise supply.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Sampling mode of a counter
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CounterMode {
    /// Running total that never resets
    Persistent,
    /// Resets to zero after every sample (default)
    #[default]
    Delta,
    /// Per-second rate of the events since the previous sample
    Rate,
}

impl CounterMode {
    /// Mode name as written in config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persistent => "persistent",
            Self::Delta => "delta",
            Self::Rate => "rate",
        }
    }
}

/// How a downstream aggregator should combine samples of a metric
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Samples are summed
    Sum,
    /// Samples are averaged
    Average,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single counter declaration
///
/// # Example
///
/// ```toml
/// [[counters]]
/// name = "http.requests"
/// mode = "rate"
/// unit = "requests/second"
/// tags = { service = "api" }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CounterConfig {
    /// Metric name reported for this counter
    pub name: String,

    /// Sampling mode (persistent, delta, rate)
    /// Default: delta
    pub mode: CounterMode,

    /// Unit override; the mode supplies one when absent
    pub unit: Option<String>,

    /// Statistic override; the mode supplies one when absent
    pub statistic: Option<Statistic>,

    /// Resolution override in seconds
    pub resolution: Option<u32>,

    /// Tags attached to every observation of this counter
    pub tags: BTreeMap<String, String>,
}
