//! Counter collector state machine
//!
//! A collector wraps one [`Accumulator`] and turns it into metric
//! observations each time the scheduler samples it.
//!
//! ```text
//!   Idle ──start()──▶ Running ──sample()──┐
//!    ▲                   │  ▲             │
//!    └─────stop()────────┘  └─────────────┘
//! ```
//!
//! Sampling order:
//! 1. read the accumulator, zeroing it in the same atomic step unless the
//!    preset is persistent
//! 2. for rate presets, divide by the seconds since the previous sample
//!    (floored at one second) and move the window forward
//! 3. drop non-finite readings silently
//! 4. build the observation, notify observers, return it

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::accumulator::Accumulator;
use crate::error::Result;
use crate::metric::{MetricConstructor, MetricOptions, SingleMetric};
use crate::preset::Preset;

/// Lifecycle hooks driven by a scheduler
///
/// `start` and `stop` never fail. `sample` fails only when building the
/// observation fails; counting state has already advanced by then.
#[async_trait]
pub trait Collector: Send {
    /// Metric name this collector reports
    fn name(&self) -> &str;

    /// Begin a sampling session
    async fn start(&mut self);

    /// Take one sample, returning the emitted observation if any
    async fn sample(&mut self) -> Result<Option<SingleMetric>>;

    /// End the sampling session
    async fn stop(&mut self);
}

/// Receives every observation a collector emits, in-line during `sample`
pub trait MetricObserver: Send + Sync {
    fn on_metric(&self, metric: &SingleMetric);
}

impl<F> MetricObserver for F
where
    F: Fn(&SingleMetric) + Send + Sync,
{
    fn on_metric(&self, metric: &SingleMetric) {
        self(metric)
    }
}

/// Collector produced by a [`CounterFactory`](crate::CounterFactory)
pub struct CounterCollector {
    name: String,
    preset: Preset,
    options: MetricOptions,
    state: Arc<Accumulator>,
    constructor: Arc<dyn MetricConstructor>,
    observers: Vec<Arc<dyn MetricObserver>>,
    /// Start of the current rate window; `None` while idle
    last_sample: Option<Instant>,
    warned_sub_second: bool,
}

impl CounterCollector {
    pub(crate) fn new(
        name: String,
        preset: Preset,
        options: MetricOptions,
        state: Arc<Accumulator>,
        constructor: Arc<dyn MetricConstructor>,
    ) -> Self {
        Self {
            name,
            preset,
            options,
            state,
            constructor,
            observers: Vec::new(),
            last_sample: None,
            warned_sub_second: false,
        }
    }

    /// Register an observer notified of every emitted metric
    pub fn subscribe(&mut self, observer: Arc<dyn MetricObserver>) {
        self.observers.push(observer);
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn options(&self) -> &MetricOptions {
        &self.options
    }

    /// Whether `start` has been called without a matching `stop`
    pub fn is_running(&self) -> bool {
        self.last_sample.is_some()
    }

    /// Current accumulator value, without resetting it
    pub fn pending(&self) -> f64 {
        self.state.get()
    }

    fn read(&self) -> f64 {
        if self.preset.is_persistent() {
            self.state.get()
        } else {
            self.state.take()
        }
    }

    /// Convert a reading into a per-second rate and advance the window
    ///
    /// Returns `None` while idle (never started, or stopped).
    fn rate_of(&mut self, value: f64) -> Option<f64> {
        let now = Instant::now();
        let Some(last) = self.last_sample else {
            warn!(
                counter = %self.name,
                discarded = value,
                "rate counter sampled while idle, reading discarded"
            );
            return None;
        };
        self.last_sample = Some(now);

        let elapsed = now.duration_since(last).as_secs_f64();
        if elapsed < 1.0 && !self.warned_sub_second {
            self.warned_sub_second = true;
            debug!(
                counter = %self.name,
                elapsed_ms = (elapsed * 1000.0) as u64,
                "rate counter sampled more than once per second, elapsed floored to 1s"
            );
        }

        Some(value / elapsed.max(1.0))
    }

    fn emit(&self, value: f64) -> Result<SingleMetric> {
        let mut metric = self.constructor.single(&self.name, &self.options)?;
        metric.record(value);

        for observer in &self.observers {
            observer.on_metric(&metric);
        }

        Ok(metric)
    }
}

#[async_trait]
impl Collector for CounterCollector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self) {
        self.last_sample = Some(Instant::now());
        self.warned_sub_second = false;
        tokio::task::yield_now().await;
    }

    async fn sample(&mut self) -> Result<Option<SingleMetric>> {
        let value = self.read();

        let reading = if self.preset.is_rate() {
            match self.rate_of(value) {
                Some(rate) => rate,
                None => return Ok(None),
            }
        } else {
            value
        };

        if !reading.is_finite() {
            trace!(counter = %self.name, reading, "non-finite reading dropped");
            return Ok(None);
        }

        self.emit(reading).map(Some)
    }

    async fn stop(&mut self) {
        self.last_sample = None;
        tokio::task::yield_now().await;
    }
}

impl std::fmt::Debug for CounterCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterCollector")
            .field("name", &self.name)
            .field("mode", &self.preset.mode())
            .field("running", &self.is_running())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CounterError;
    use crate::metric::{DefaultConstructor, MetricOverrides};
    use parking_lot::Mutex;
    use std::time::Duration;

    fn collector(preset: Preset) -> (CounterCollector, Arc<Accumulator>) {
        collector_with(preset, Arc::new(DefaultConstructor))
    }

    fn collector_with(
        preset: Preset,
        constructor: Arc<dyn MetricConstructor>,
    ) -> (CounterCollector, Arc<Accumulator>) {
        let state = Arc::new(Accumulator::new());
        let collector = CounterCollector::new(
            "test".into(),
            preset,
            MetricOptions::resolve(preset, MetricOverrides::default()),
            Arc::clone(&state),
            constructor,
        );
        (collector, state)
    }

    struct FailingConstructor;

    impl MetricConstructor for FailingConstructor {
        fn single(&self, name: &str, _options: &MetricOptions) -> Result<SingleMetric> {
            Err(CounterError::construct(name, "registry closed"))
        }
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let (mut collector, _) = collector(Preset::DELTA);
        assert!(!collector.is_running());

        collector.start().await;
        assert!(collector.is_running());

        collector.stop().await;
        assert!(!collector.is_running());

        collector.start().await;
        assert!(collector.is_running());
    }

    #[tokio::test]
    async fn test_delta_resets_on_sample() {
        let (mut collector, state) = collector(Preset::DELTA);
        state.add(4.0);

        let metric = collector.sample().await.unwrap().unwrap();
        assert_eq!(metric.value, 4.0);
        assert_eq!(state.get(), 0.0);
    }

    #[tokio::test]
    async fn test_persistent_keeps_value() {
        let (mut collector, state) = collector(Preset::PERSISTENT);
        state.add(4.0);

        collector.sample().await.unwrap();
        assert_eq!(collector.pending(), 4.0);
    }

    #[tokio::test]
    async fn test_stop_keeps_value() {
        let (mut collector, state) = collector(Preset::DELTA);
        collector.start().await;
        state.add(2.0);
        collector.stop().await;
        assert_eq!(collector.pending(), 2.0);
    }

    #[tokio::test]
    async fn test_non_finite_dropped() {
        let (mut collector, state) = collector(Preset::DELTA);
        state.add(f64::NAN);

        assert!(collector.sample().await.unwrap().is_none());
        // Reset still happened
        assert_eq!(state.get(), 0.0);
        assert_eq!(collector.sample().await.unwrap().unwrap().value, 0.0);
    }

    #[tokio::test]
    async fn test_persistent_infinity_never_emits() {
        let (mut collector, state) = collector(Preset::PERSISTENT);
        state.add(f64::INFINITY);

        assert!(collector.sample().await.unwrap().is_none());
        assert!(collector.sample().await.unwrap().is_none());
        assert!(collector.pending().is_infinite());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_idle_sample_discards_reading() {
        let (mut collector, state) = collector(Preset::RATE);
        state.add(5.0);

        assert!(collector.sample().await.unwrap().is_none());
        assert_eq!(state.get(), 0.0);
        assert!(!collector.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_divides_by_elapsed_seconds() {
        let (mut collector, state) = collector(Preset::RATE);
        collector.start().await;

        state.add(20.0);
        tokio::time::advance(Duration::from_secs(4)).await;

        let metric = collector.sample().await.unwrap().unwrap();
        assert_eq!(metric.value, 5.0);
        assert_eq!(metric.unit, "count/second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_floors_elapsed_to_one_second() {
        let (mut collector, state) = collector(Preset::RATE);
        collector.start().await;

        state.add(3.0);
        tokio::time::advance(Duration::from_millis(10)).await;

        assert_eq!(collector.sample().await.unwrap().unwrap().value, 3.0);
        assert!(collector.warned_sub_second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_note_rearmed_on_restart() {
        let (mut collector, _) = collector(Preset::RATE);
        collector.start().await;
        tokio::time::advance(Duration::from_millis(10)).await;
        collector.sample().await.unwrap();
        assert!(collector.warned_sub_second);

        collector.stop().await;
        collector.start().await;
        assert!(!collector.warned_sub_second);

        tokio::time::advance(Duration::from_millis(10)).await;
        collector.sample().await.unwrap();
        assert!(collector.warned_sub_second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_window_advances_when_nothing_emitted() {
        let (mut collector, state) = collector(Preset::RATE);
        collector.start().await;

        tokio::time::advance(Duration::from_secs(10)).await;
        state.add(f64::NAN);
        assert!(collector.sample().await.unwrap().is_none());

        // Window restarted at the dropped sample, not at start()
        state.add(4.0);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(collector.sample().await.unwrap().unwrap().value, 2.0);
    }

    #[tokio::test]
    async fn test_observers_see_emitted_metric() {
        let (mut collector, state) = collector(Preset::DELTA);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        collector.subscribe(Arc::new(move |m: &SingleMetric| sink.lock().push(m.clone())));

        state.add(7.0);
        let metric = collector.sample().await.unwrap().unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], metric);
    }

    #[tokio::test]
    async fn test_observers_not_called_for_dropped_reading() {
        let (mut collector, state) = collector(Preset::DELTA);
        let calls = Arc::new(Mutex::new(0usize));

        let counter = Arc::clone(&calls);
        collector.subscribe(Arc::new(move |_: &SingleMetric| *counter.lock() += 1));

        state.add(f64::INFINITY);
        collector.sample().await.unwrap();
        assert_eq!(*calls.lock(), 0);
    }

    #[tokio::test]
    async fn test_constructor_failure_after_reset() {
        let (mut collector, state) = collector_with(Preset::DELTA, Arc::new(FailingConstructor));
        state.add(3.0);

        let err = collector.sample().await.unwrap_err();
        assert!(matches!(err, CounterError::Construct { .. }));
        assert_eq!(state.get(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_constructor_failure_still_advances_rate_window() {
        let (mut collector, state) = collector_with(Preset::RATE, Arc::new(FailingConstructor));
        collector.start().await;
        let started = collector.last_sample.unwrap();

        state.add(1.0);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(collector.sample().await.is_err());
        assert!(collector.last_sample.unwrap() > started);
    }

    #[test]
    fn test_debug_output() {
        let (collector, _) = collector(Preset::RATE);
        let debug = format!("{:?}", collector);
        assert!(debug.contains("Rate"));
        assert!(debug.contains("running: false"));
    }
}
