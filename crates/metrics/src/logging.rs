//! Tracing subscriber setup
//!
//! Hosts call [`init_logging`] once at startup with the `[log]` section of
//! their config; the reporter and collectors log through `tracing`.

use tally_config::{LogConfig, LogFormat, LogOutput};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{ReporterError, Result};

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.level.as_str())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| ReporterError::Logging(format!("invalid log level: {}", e)))?;

    let registry = tracing_subscriber::registry();
    let result = match (config.format, config.output) {
        (LogFormat::Console, LogOutput::Stdout) => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .with(filter)
            .try_init(),
        (LogFormat::Console, LogOutput::Stderr) => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init(),
        (LogFormat::Json, LogOutput::Stdout) => {
            registry.with(fmt::layer().json()).with(filter).try_init()
        }
        (LogFormat::Json, LogOutput::Stderr) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init(),
    };

    result.map_err(|e| ReporterError::Logging(e.to_string()))
}
