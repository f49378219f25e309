//! The end-of-run report.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The four statistics reported for one latency series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub mean: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

/// Everything a completed run reports.
///
/// Assembled once by the driver after the clock passes the horizon. The
/// text form matches the simulator's historical three-line output; the JSON
/// form carries the per-stage totals as well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Configured producer rate, requests per second.
    pub producer_rate: u64,
    /// Configured consumer rate, requests per second.
    pub consumer_rate: u64,
    /// Deepest the dispatcher's pending queue ever got.
    pub peak_queued: usize,
    /// Most requests ever concurrently in service.
    pub peak_in_flight: usize,
    /// Requests emitted by the producer.
    pub generated: u64,
    /// Requests admitted into the consumer.
    pub dispatched: u64,
    /// Requests completed and collected.
    pub processed: u64,
    /// Creation-to-completion statistics.
    pub total_latency: LatencySummary,
    /// Dispatch-to-completion statistics.
    pub exec_latency: LatencySummary,
}

impl SimulationReport {
    /// Serialize the report for machine consumers.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "producer rate: {} consumer rate: {} maximum queued: {} executing: {}",
            self.producer_rate, self.consumer_rate, self.peak_queued, self.peak_in_flight
        )?;
        writeln!(
            f,
            "total latencies: mean {:.6}  p95 {:.6}  p99 {:.6}  max {:.6}",
            self.total_latency.mean.as_secs_f64(),
            self.total_latency.p95.as_secs_f64(),
            self.total_latency.p99.as_secs_f64(),
            self.total_latency.max.as_secs_f64()
        )?;
        write!(
            f,
            "exec latencies:  mean {:.6}  p95 {:.6}  p99 {:.6}  max {:.6}",
            self.exec_latency.mean.as_secs_f64(),
            self.exec_latency.p95.as_secs_f64(),
            self.exec_latency.p99.as_secs_f64(),
            self.exec_latency.max.as_secs_f64()
        )
    }
}
