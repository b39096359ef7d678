//! Counter reporter
//!
//! Drives counter collectors the way a host scheduler would: starts them,
//! samples every collector at the configured interval, and stops them on
//! shutdown.
//!
//! # Overview
//!
//! Each tick is one sampling round. Observations from the round are logged
//! through the configured formatter via tracing; a collector whose sample
//! fails is logged and skipped for that round only.
//!
//! Collectors are started before the first round, whether that round comes
//! from [`CounterReporter::run`] or a direct [`CounterReporter::report`] call.

use crate::format::{HumanFormatter, MetricsFormatter};
use std::time::Instant;
use tally_config::ReporterConfig;
use tally_counter::{Collector, CounterFactory, SingleMetric};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Builder for constructing a CounterReporter
#[derive(Default)]
pub struct CounterReporterBuilder {
    config: Option<ReporterConfig>,
    formatter: Option<Box<dyn MetricsFormatter>>,
    collectors: Vec<Box<dyn Collector>>,
}

impl CounterReporterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reporter configuration
    pub fn config(mut self, config: ReporterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom formatter (default: human)
    pub fn formatter(mut self, formatter: Box<dyn MetricsFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Register a collector
    pub fn collector(mut self, collector: Box<dyn Collector>) -> Self {
        self.collectors.push(collector);
        self
    }

    /// Register a new collector produced by `factory`
    pub fn factory(self, factory: &CounterFactory) -> Self {
        self.collector(Box::new(factory.collector()))
    }

    /// Register one new collector per factory
    pub fn factories<'a>(self, factories: impl IntoIterator<Item = &'a CounterFactory>) -> Self {
        factories.into_iter().fold(self, |builder, f| builder.factory(f))
    }

    /// Build the CounterReporter
    pub fn build(self) -> CounterReporter {
        CounterReporter {
            config: self.config.unwrap_or_default(),
            formatter: self
                .formatter
                .unwrap_or_else(|| Box::new(HumanFormatter::new())),
            collectors: self.collectors,
            latest: Vec::new(),
            started: false,
        }
    }
}

/// Counter reporter
///
/// Samples every registered collector at the configured interval.
pub struct CounterReporter {
    config: ReporterConfig,
    formatter: Box<dyn MetricsFormatter>,
    collectors: Vec<Box<dyn Collector>>,
    latest: Vec<SingleMetric>,
    /// Collectors have been started and not yet stopped
    started: bool,
}

impl CounterReporter {
    /// Create a new builder
    pub fn builder() -> CounterReporterBuilder {
        CounterReporterBuilder::new()
    }

    /// Run the reporter until cancellation
    ///
    /// This is the main entry point - spawn this as a tokio task.
    pub async fn run(mut self, cancel: CancellationToken) {
        if !self.config.enabled {
            info!("counter reporting disabled");
            return;
        }

        self.start_collectors().await;

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            collectors = self.collectors.len(),
            "counter reporter started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("counter reporter shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.report().await;
                }
            }
        }

        self.stop_collectors().await;
    }

    async fn start_collectors(&mut self) {
        if self.started {
            return;
        }
        for collector in self.collectors.iter_mut() {
            collector.start().await;
        }
        self.started = true;
    }

    async fn stop_collectors(&mut self) {
        if !self.started {
            return;
        }
        for collector in self.collectors.iter_mut() {
            collector.stop().await;
        }
        self.started = false;
    }

    /// Sample every collector once and log the round
    ///
    /// Starts the collectors first if they are not running yet.
    pub async fn report(&mut self) {
        self.start_collectors().await;

        let round_start = Instant::now();
        self.latest.clear();

        for collector in self.collectors.iter_mut() {
            match collector.sample().await {
                Ok(Some(metric)) => self.latest.push(metric),
                Ok(None) => {}
                Err(e) => warn!(counter = collector.name(), error = %e, "counter sample failed"),
            }
        }

        let output = self.formatter.format_round(&self.latest);
        for line in output.lines() {
            info!("{}", line);
        }

        debug!(
            observations = self.latest.len(),
            elapsed_us = round_start.elapsed().as_micros() as u64,
            "sampling round complete"
        );
    }

    /// Observations from the most recent round
    pub fn latest(&self) -> &[SingleMetric] {
        &self.latest
    }

    /// Add a collector dynamically
    ///
    /// The collector is started right away if the others are running.
    pub async fn add_collector(&mut self, mut collector: Box<dyn Collector>) {
        if self.started {
            collector.start().await;
        }
        self.collectors.push(collector);
    }
}
