//! Tally - Metrics
//!
//! Periodic sampling and log reporting for tally counters.
//!
//! # Overview
//!
//! This crate provides:
//! - A reporter that starts, samples and stops counter collectors on an interval
//! - Human-readable formatting of each sampling round
//! - Tracing subscriber setup from the `[log]` config section
//!
//! # Wiring
//!
//! ```text
//! Config ──▶ CounterFactory::from_config ──▶ factories handed to app code
//!                                   │
//!                                   └──▶ CounterReporter::builder().factories(..)
//!                                              │
//!                                              └──▶ tokio::spawn(reporter.run(cancel))
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tally_config::Config;
//! use tally_metrics::{CounterReporter, factories_from_config, init_logging};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = Config::from_file("tally.toml")?;
//! init_logging(&config.log)?;
//!
//! let factories = factories_from_config(&config);
//! let reporter = CounterReporter::builder()
//!     .config(config.reporter.clone())
//!     .factories(&factories)
//!     .build();
//!
//! let cancel = CancellationToken::new();
//! tokio::spawn(reporter.run(cancel.clone()));
//! ```

mod error;
pub mod format;
mod logging;
mod reporter;

pub use error::{ReporterError, Result};
pub use format::{HumanFormatter, MetricsFormatter, format_metric, format_value};
pub use logging::init_logging;
pub use reporter::{CounterReporter, CounterReporterBuilder};

use tally_config::Config;
use tally_counter::CounterFactory;

/// Build one factory per declared counter, in declaration order
pub fn factories_from_config(config: &Config) -> Vec<CounterFactory> {
    config
        .counters
        .iter()
        .map(CounterFactory::from_config)
        .collect()
}
