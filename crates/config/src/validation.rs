//! Configuration validation
//!
//! Validates config consistency:
//! - Counter names are non-empty and unique
//! - Resolution overrides are non-zero
//! - An enabled reporter has a non-zero interval

use crate::Config;
use crate::error::{ConfigError, Result};
use std::collections::HashSet;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_counters(config)?;
    validate_reporter(config)?;
    Ok(())
}

fn validate_counters(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();

    for (i, counter) in config.counters.iter().enumerate() {
        if counter.name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "counter",
                format!("#{}", i),
                "name",
                "must not be empty",
            ));
        }

        if !seen.insert(counter.name.as_str()) {
            return Err(ConfigError::duplicate_counter(&counter.name));
        }

        if counter.resolution == Some(0) {
            return Err(ConfigError::invalid_value(
                "counter",
                &counter.name,
                "resolution",
                "must be greater than zero",
            ));
        }
    }

    Ok(())
}

fn validate_reporter(config: &Config) -> Result<()> {
    if config.reporter.enabled && config.reporter.interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "reporter",
            "reporter",
            "interval",
            "must be greater than zero when enabled",
        ));
    }
    Ok(())
}
