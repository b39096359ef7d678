//! Counter error types.

use thiserror::Error;

/// Result type for counter operations
pub type Result<T> = std::result::Result<T, CounterError>;

/// Errors surfaced by [`Collector::sample`](crate::Collector::sample).
///
/// Counting itself never fails; the only failure is the metric constructor
/// refusing to build an observation.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The metric constructor could not build an observation
    #[error("failed to construct metric '{name}': {message}")]
    Construct {
        /// Metric name
        name: String,
        /// Constructor's reason
        message: String,
    },
}

impl CounterError {
    /// Create a Construct error
    pub fn construct(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construct {
            name: name.into(),
            message: message.into(),
        }
    }
}
