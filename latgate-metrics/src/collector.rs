//! Streaming latency accumulation without sample retention.

use crate::report::LatencySummary;
use hdrhistogram::Histogram;
use std::time::Duration;
use tracing::warn;

/// One latency series: exact running mean and max, histogram quantiles.
///
/// The histogram records in microseconds between 1µs and 60s at 3
/// significant figures, which bounds both memory and the relative quantile
/// error in a single pass over the stream. Mean and max are plain
/// accumulators and therefore exact.
#[derive(Debug, Clone)]
pub struct LatencySeries {
    histogram: Histogram<u64>,
    sum_secs: f64,
    max: Duration,
    count: u64,
}

impl LatencySeries {
    fn new() -> Self {
        Self {
            histogram: Histogram::new_with_bounds(1, 60_000_000, 3).unwrap(), // 1µs to 60s, 3 sig figs
            sum_secs: 0.0,
            max: Duration::ZERO,
            count: 0,
        }
    }

    fn record(&mut self, sample: Duration) {
        self.sum_secs += sample.as_secs_f64();
        if sample > self.max {
            self.max = sample;
        }
        self.count += 1;

        let micros = sample.as_micros() as u64;
        if let Err(e) = self.histogram.record(micros) {
            warn!("failed to record latency sample in histogram: {}", e);
        }
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean; `Duration::ZERO` before any sample.
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.sum_secs / self.count as f64)
        }
    }

    /// Running maximum; `Duration::ZERO` before any sample.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Streaming median estimate.
    pub fn p50(&self) -> Duration {
        self.quantile(0.5)
    }

    /// Streaming 95th-percentile estimate.
    pub fn p95(&self) -> Duration {
        self.quantile(0.95)
    }

    /// Streaming 99th-percentile estimate.
    pub fn p99(&self) -> Duration {
        self.quantile(0.99)
    }

    /// The {mean, p95, p99, max} snapshot reported at the end of a run.
    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            mean: self.mean(),
            p95: self.p95(),
            p99: self.p99(),
            max: self.max(),
        }
    }

    fn quantile(&self, q: f64) -> Duration {
        Duration::from_micros(self.histogram.value_at_quantile(q))
    }
}

/// Accumulates the two latency series of a run.
///
/// Total latency covers creation to completion (queueing plus service);
/// execution latency covers dispatch to completion (service only). The
/// consumer is the sole writer, one `collect` call per completed request;
/// the driver reads the series when assembling the final report.
#[derive(Debug, Clone)]
pub struct LatencyCollector {
    total: LatencySeries,
    exec: LatencySeries,
}

impl LatencyCollector {
    pub fn new() -> Self {
        Self {
            total: LatencySeries::new(),
            exec: LatencySeries::new(),
        }
    }

    /// Record one completed request.
    pub fn collect(&mut self, total_latency: Duration, exec_latency: Duration) {
        self.total.record(total_latency);
        self.exec.record(exec_latency);
    }

    /// The creation-to-completion series.
    pub fn total(&self) -> &LatencySeries {
        &self.total
    }

    /// The dispatch-to-completion series.
    pub fn exec(&self) -> &LatencySeries {
        &self.exec
    }

    /// Number of requests collected.
    pub fn count(&self) -> u64 {
        self.total.count()
    }
}

impl Default for LatencyCollector {
    fn default() -> Self {
        Self::new()
    }
}
