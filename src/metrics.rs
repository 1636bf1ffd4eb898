//! Session statistics for predictions made during one run.

use crate::types::outcome::PredictionOutcome;
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latency samples for the current session
pub struct SessionMetrics {
    /// Predict triggers
    pub attempted: u64,
    /// Triggers that produced a price
    pub succeeded: u64,
    /// Triggers that produced an error banner
    pub failed: u64,
    /// Predict latencies (in microseconds)
    latencies: Vec<u64>,
    /// Displayed values of successful predictions
    values: Vec<f64>,
    /// Start time for the session duration
    start_time: Instant,
}

impl SessionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failed: 0,
            latencies: Vec::new(),
            values: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Record one predict trigger
    pub fn record(&mut self, outcome: &PredictionOutcome, latency: Duration) {
        self.attempted += 1;
        self.latencies.push(latency.as_micros() as u64);

        match outcome.value() {
            Some(value) => {
                self.succeeded += 1;
                self.values.push(value);
            }
            None => self.failed += 1,
        }
    }

    /// Get latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        if self.latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Get min/mean/max of displayed values
    pub fn value_stats(&self) -> Option<ValueStats> {
        if self.values.is_empty() {
            return None;
        }

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.values.iter().sum::<f64>() / self.values.len() as f64;

        Some(ValueStats { min, mean, max })
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let latency = self.latency_stats();
        let elapsed = self.start_time.elapsed();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║           HOUSE PRICE PREDICTOR - SESSION SUMMARY            ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions: {:>5}  │  Succeeded: {:>5}  │  Failed: {:>5}     ║",
            self.attempted, self.succeeded, self.failed
        );
        info!(
            "║ Latency (μs): mean={:>7} p50={:>7} p95={:>7} max={:>7} ║",
            latency.mean_us, latency.p50_us, latency.p95_us, latency.max_us
        );
        if let Some(values) = self.value_stats() {
            info!(
                "║ Estimates: min={} mean={} max={}",
                crate::format::format_currency(values.min),
                crate::format::format_currency(values.mean),
                crate::format::format_currency(values.max)
            );
        }
        info!("║ Session length: {:.1}s", elapsed.as_secs_f64());
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Predict latency statistics
#[derive(Debug, Default, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

/// Spread of displayed estimates
#[derive(Debug, PartialEq)]
pub struct ValueStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;

    #[test]
    fn test_metrics_recording() {
        let mut metrics = SessionMetrics::new();

        let ok = PredictionOutcome::estimated(SchemaKind::Census, 2.0, 200000.0, "$200,000.00".into());
        let ok2 = PredictionOutcome::estimated(SchemaKind::Census, 4.0, 400000.0, "$400,000.00".into());
        let bad = PredictionOutcome::failed(SchemaKind::Census, "missing feature");

        metrics.record(&ok, Duration::from_micros(100));
        metrics.record(&bad, Duration::from_micros(50));
        metrics.record(&ok2, Duration::from_micros(300));

        assert_eq!(metrics.attempted, 3);
        assert_eq!(metrics.succeeded, 2);
        assert_eq!(metrics.failed, 1);

        let latency = metrics.latency_stats();
        assert_eq!(latency.count, 3);
        assert_eq!(latency.mean_us, 150);
        assert_eq!(latency.p50_us, 100);
        assert_eq!(latency.max_us, 300);

        let values = metrics.value_stats().unwrap();
        assert_eq!(values.min, 200000.0);
        assert_eq!(values.mean, 300000.0);
        assert_eq!(values.max, 400000.0);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.latency_stats(), LatencyStats::default());
        assert!(metrics.value_stats().is_none());
    }
}
