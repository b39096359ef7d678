//! Counter factories
//!
//! A factory is one logical counter. Application code calls
//! [`CounterFactory::increment`] and friends; schedulers call
//! [`CounterFactory::collector`] once per reporting destination. Every
//! increment reaches every live collector, so two destinations sampling at
//! different times each see all events.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tally_config::CounterConfig;
use tracing::debug;

use crate::accumulator::Accumulator;
use crate::collector::CounterCollector;
use crate::metric::{DefaultConstructor, MetricConstructor, MetricOptions, MetricOverrides};
use crate::preset::Preset;

/// Builder for a [`CounterFactory`]
pub struct CounterFactoryBuilder {
    preset: Preset,
    name: String,
    overrides: MetricOverrides,
    constructor: Option<Arc<dyn MetricConstructor>>,
}

impl CounterFactoryBuilder {
    /// Set metric option overrides
    pub fn overrides(mut self, overrides: MetricOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Use a custom metric constructor
    pub fn constructor(mut self, constructor: Arc<dyn MetricConstructor>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Build the factory
    pub fn build(self) -> CounterFactory {
        let options = MetricOptions::resolve(self.preset, self.overrides);
        let constructor = self
            .constructor
            .unwrap_or_else(|| Arc::new(DefaultConstructor) as Arc<dyn MetricConstructor>);

        CounterFactory {
            inner: Arc::new(FactoryInner {
                preset: self.preset,
                name: self.name,
                options,
                constructor,
                states: RwLock::new(Vec::new()),
            }),
        }
    }
}

struct FactoryInner {
    preset: Preset,
    name: String,
    options: MetricOptions,
    constructor: Arc<dyn MetricConstructor>,
    /// Accumulators of collectors produced so far; dead entries are pruned
    /// when the next collector is created
    states: RwLock<Vec<Weak<Accumulator>>>,
}

/// Produces counter collectors and fans increments out to all of them
///
/// Cloning is cheap and every clone refers to the same counter.
#[derive(Clone)]
pub struct CounterFactory {
    inner: Arc<FactoryInner>,
}

impl CounterFactory {
    /// Create a factory with the preset's default metric options
    pub fn new(preset: Preset, name: impl Into<String>) -> Self {
        Self::builder(preset, name).build()
    }

    /// Create a factory whose metric options are `overrides` merged over the preset
    pub fn with_overrides(preset: Preset, name: impl Into<String>, overrides: MetricOverrides) -> Self {
        Self::builder(preset, name).overrides(overrides).build()
    }

    /// Create a factory from a counter declaration
    pub fn from_config(config: &CounterConfig) -> Self {
        Self::with_overrides(
            Preset::for_mode(config.mode),
            config.name.clone(),
            MetricOverrides::from(config),
        )
    }

    /// Start building a factory
    pub fn builder(preset: Preset, name: impl Into<String>) -> CounterFactoryBuilder {
        CounterFactoryBuilder {
            preset,
            name: name.into(),
            overrides: MetricOverrides::default(),
            constructor: None,
        }
    }

    /// Create a new collector with its own accumulator starting at 0
    pub fn collector(&self) -> CounterCollector {
        let state = Arc::new(Accumulator::new());

        {
            let mut states = self.inner.states.write();
            states.retain(|s| s.strong_count() > 0);
            states.push(Arc::downgrade(&state));
        }

        debug!(
            counter = %self.inner.name,
            mode = self.inner.preset.mode().as_str(),
            "counter collector created"
        );

        CounterCollector::new(
            self.inner.name.clone(),
            self.inner.preset,
            self.inner.options.clone(),
            state,
            Arc::clone(&self.inner.constructor),
        )
    }

    /// Add 1 to every live collector
    #[inline]
    pub fn increment(&self) {
        self.increment_by(1.0);
    }

    /// Add `n` to every live collector
    pub fn increment_by(&self, n: f64) {
        self.fan_out(n);
    }

    /// Subtract 1 from every live collector
    #[inline]
    pub fn decrement(&self) {
        self.decrement_by(1.0);
    }

    /// Subtract `n` from every live collector
    pub fn decrement_by(&self, n: f64) {
        self.fan_out(-n);
    }

    fn fan_out(&self, delta: f64) {
        for state in self.inner.states.read().iter() {
            if let Some(state) = state.upgrade() {
                state.add(delta);
            }
        }
    }

    /// Number of collectors still alive
    pub fn tracked(&self) -> usize {
        self.inner
            .states
            .read()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn preset(&self) -> Preset {
        self.inner.preset
    }

    /// Resolved options every collector of this factory reports with
    pub fn options(&self) -> &MetricOptions {
        &self.inner.options
    }
}

impl std::fmt::Debug for CounterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterFactory")
            .field("name", &self.inner.name)
            .field("mode", &self.inner.preset.mode())
            .field("tracked", &self.tracked())
            .finish()
    }
}

/// Factory for a counter that reports its running total
pub fn persistent(name: impl Into<String>) -> CounterFactory {
    CounterFactory::new(Preset::PERSISTENT, name)
}

/// Factory for a counter that reports the change since the previous sample
pub fn delta(name: impl Into<String>) -> CounterFactory {
    CounterFactory::new(Preset::DELTA, name)
}

/// Factory for a counter that reports events per second
pub fn rate(name: impl Into<String>) -> CounterFactory {
    CounterFactory::new(Preset::RATE, name)
}
