//! Shared accumulator cell
//!
//! One `Accumulator` backs one collector. The factory that produced the
//! collector holds a weak reference to it so increments fan out to every
//! live collector.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free `f64` cell
///
/// The value is stored as raw bits in an `AtomicU64`. Additions use a
/// compare-exchange loop; [`Accumulator::take`] reads and zeroes the cell in
/// a single swap so no concurrent addition can fall between the two.
#[derive(Debug)]
pub struct Accumulator(AtomicU64);

impl Accumulator {
    /// Create a new accumulator initialized to 0
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0.0f64.to_bits()))
    }

    /// Add `delta` to the value (negative to subtract)
    #[inline]
    pub fn add(&self, delta: f64) {
        // fetch_update only fails when the closure returns None
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }

    /// Get the current value
    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Reset the value to 0 and return the previous value
    #[inline]
    pub fn take(&self) -> f64 {
        f64::from_bits(self.0.swap(0.0f64.to_bits(), Ordering::AcqRel))
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
