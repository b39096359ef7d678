//! Metrics output formatting
//!
//! Formats the observations of one sampling round for the log.
//!
//! # Example Output
//!
//! ```text
//! [counters] http.requests: 1.2K count/second (average) | queue.depth: 42 count (average)
//! ```

use std::fmt::Write;

use tally_counter::SingleMetric;

/// Trait for metrics formatters
pub trait MetricsFormatter: Send + Sync {
    /// Format every observation from one sampling round
    fn format_round(&self, metrics: &[SingleMetric]) -> String;
}

/// Human-readable metrics formatter
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self
    }
}

impl MetricsFormatter for HumanFormatter {
    fn format_round(&self, metrics: &[SingleMetric]) -> String {
        if metrics.is_empty() {
            return "[counters] no observations".to_string();
        }

        let mut output = String::from("[counters]");
        for (i, metric) in metrics.iter().enumerate() {
            if i > 0 {
                output.push_str(" |");
            }
            let _ = write!(output, " {}", format_metric(metric));
        }
        output
    }
}

/// Format one observation as `name: value unit (statistic)`
pub fn format_metric(metric: &SingleMetric) -> String {
    format!(
        "{}: {} {} ({})",
        metric.name,
        format_value(metric.value),
        metric.unit,
        metric.statistic
    )
}

/// Format a counter value with K/M suffix for readability
///
/// The suffix is chosen from the value as it will be printed, so rounding
/// never produces `1000.0K`. Whole numbers below 1000 print without
/// decimals, fractions with two.
pub fn format_value(value: f64) -> String {
    const K: f64 = 1000.0;
    const M: f64 = 1_000_000.0;

    // + 0.0 folds -0.0 into 0.0
    let hundredths = (value * 100.0).round() / 100.0 + 0.0;
    if hundredths.abs() < K {
        return if hundredths.fract() == 0.0 {
            format!("{:.0}", hundredths)
        } else {
            format!("{:.2}", hundredths)
        };
    }

    let thousands = (value / K * 10.0).round() / 10.0;
    if thousands.abs() < K {
        format!("{:.1}K", thousands)
    } else {
        format!("{:.1}M", value / M)
    }
}
