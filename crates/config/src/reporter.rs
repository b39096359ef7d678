//! Reporter configuration
//!
//! Controls how often the counter reporter samples its collectors.
//!
//! # Defaults
//!
//! - `enabled`: true
//! - `interval`: 10s

use serde::Deserialize;
use std::time::Duration;

/// Reporter configuration
///
/// # Example
///
/// ```toml
/// [reporter]
/// enabled = true
/// interval = "10s"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReporterConfig {
    /// Enable periodic sampling
    /// Default: true
    pub enabled: bool,

    /// Sampling interval
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(10),
        }
    }
}
