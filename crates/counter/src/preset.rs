//! Mode presets
//!
//! A preset fixes whether a counter resets after sampling, whether it
//! reports a per-second rate, and the unit and statistic its metrics carry
//! unless the caller overrides them.

use tally_config::{CounterMode, Statistic};

/// Counter behaviour preset
///
/// Fields are private: the only values are [`Preset::PERSISTENT`],
/// [`Preset::DELTA`] and [`Preset::RATE`], so a preset is never both
/// persistent and rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    persistent: bool,
    rate: bool,
    statistic: Statistic,
    unit: &'static str,
}

impl Preset {
    /// Running total, never reset
    pub const PERSISTENT: Preset = Preset {
        persistent: true,
        rate: false,
        statistic: Statistic::Average,
        unit: "count",
    };

    /// Net change since the previous sample
    pub const DELTA: Preset = Preset {
        persistent: false,
        rate: false,
        statistic: Statistic::Sum,
        unit: "count",
    };

    /// Events per second since the previous sample
    pub const RATE: Preset = Preset {
        persistent: false,
        rate: true,
        statistic: Statistic::Average,
        unit: "count/second",
    };

    /// Preset for a configured mode
    pub const fn for_mode(mode: CounterMode) -> Self {
        match mode {
            CounterMode::Persistent => Self::PERSISTENT,
            CounterMode::Delta => Self::DELTA,
            CounterMode::Rate => Self::RATE,
        }
    }

    /// Mode this preset implements
    pub fn mode(&self) -> CounterMode {
        if self.persistent {
            CounterMode::Persistent
        } else if self.rate {
            CounterMode::Rate
        } else {
            CounterMode::Delta
        }
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[inline]
    pub fn is_rate(&self) -> bool {
        self.rate
    }

    /// Default statistic
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Default unit
    pub fn unit(&self) -> &'static str {
        self.unit
    }
}
