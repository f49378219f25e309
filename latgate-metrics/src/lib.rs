//! Latency statistics for pipeline simulation runs.
//!
//! A run can complete millions of requests, so nothing here retains raw
//! samples: [`LatencyCollector`] keeps exact running mean/max accumulators
//! plus a bounded-memory histogram per series for streaming quantiles, and
//! [`SimulationReport`] is the read-once summary the driver assembles when
//! the clock passes the horizon.

pub mod collector;
pub mod report;

pub use collector::{LatencyCollector, LatencySeries};
pub use report::{LatencySummary, SimulationReport};
