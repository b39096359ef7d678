//! Tally - Counters
//!
//! Counter-style metric collectors for a telemetry pipeline.
//!
//! # Overview
//!
//! This crate provides three kinds of counter:
//! - **Persistent**: reports the running total, never resets
//! - **Delta**: reports the change since the previous sample, then resets
//! - **Rate**: reports events per second since the previous sample
//!
//! # Factory / Collector Pattern
//!
//! A [`CounterFactory`] is the handle application code increments. Each call
//! to [`CounterFactory::collector`] produces a [`CounterCollector`] with its
//! own accumulator; increments fan out to every live collector so several
//! reporting destinations can sample the same counter independently.
//!
//! ```text
//! app code ──increment()──▶ CounterFactory ──┬──▶ Accumulator ◀── CounterCollector ◀── scheduler A
//!                                            └──▶ Accumulator ◀── CounterCollector ◀── scheduler B
//! ```
//!
//! # Example
//!
//! ```
//! use tally_counter::{delta, Collector};
//!
//! # tokio_test_block(async {
//! let requests = delta("http.requests");
//! let mut collector = requests.collector();
//!
//! collector.start().await;
//! requests.increment();
//! requests.increment_by(4.0);
//!
//! let metric = collector.sample().await.unwrap().unwrap();
//! assert_eq!(metric.value, 5.0);
//! assert_eq!(metric.unit, "count");
//! collector.stop().await;
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Design Principles
//!
//! - **Lock-free counting**: accumulators are atomics; sampling reads and
//!   resets in one swap, so no increment is lost to a concurrent sample
//! - **Total**: counting, `start` and `stop` never fail; non-finite readings
//!   are dropped silently
//! - **Bounded tracking**: factories hold weak references and forget
//!   collectors that have been dropped

mod accumulator;
mod collector;
mod error;
mod factory;
mod metric;
mod preset;

pub use accumulator::Accumulator;
pub use collector::{Collector, CounterCollector, MetricObserver};
pub use error::{CounterError, Result};
pub use factory::{CounterFactory, CounterFactoryBuilder, delta, persistent, rate};
pub use metric::{
    DEFAULT_RESOLUTION, DefaultConstructor, MetricConstructor, MetricOptions, MetricOverrides,
    SingleMetric,
};
pub use preset::Preset;

pub use tally_config::{CounterMode, Statistic};
