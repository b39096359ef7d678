//! Tally Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid config: no counters, reporter on a 10s interval,
//! info-level console logging.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[[counters]]\nname = \"jobs\"").unwrap();
//! assert_eq!(config.counters.len(), 1);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [reporter]
//! interval = "10s"
//!
//! [[counters]]
//! name = "http.requests"
//! mode = "rate"
//!
//! [[counters]]
//! name = "queue.depth"
//! mode = "persistent"
//! ```

mod counters;
mod error;
mod logging;
mod reporter;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use counters::{CounterConfig, CounterMode, Statistic};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use reporter::ReporterConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Sampling reporter configuration
    pub reporter: ReporterConfig,

    /// Counter declarations
    pub counters: Vec<CounterConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Look up a counter declaration by name
    pub fn counter(&self, name: &str) -> Option<&CounterConfig> {
        self.counters.iter().find(|c| c.name == name)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
