//! Reporter error types.

use thiserror::Error;

/// Result type for reporter operations
pub type Result<T> = std::result::Result<T, ReporterError>;

/// Errors that can occur while setting up reporting.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The tracing subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}
