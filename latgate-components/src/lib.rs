//! The producer → dispatcher → consumer pipeline and its fixed-step driver.
//!
//! Synthetic [`Request`]s flow strictly downstream: the [`Producer`] emits
//! them on its arrival process, the [`Dispatcher`] holds them in an
//! unbounded pending queue and admits them under its concurrency limit, and
//! the [`Consumer`] is a single virtual server that completes them in FIFO
//! order and reports their latencies. The [`Simulation`] driver owns all
//! three plus the collector and advances logical time in fixed quanta.
//!
//! # Basic Usage
//!
//! ```rust
//! use latgate_components::{PipelineConfig, Simulation, StageConfig};
//! use latgate_core::ProcessKind;
//! use std::time::Duration;
//!
//! let mut config = PipelineConfig::new(
//!     Duration::from_secs(1),
//!     StageConfig::new(ProcessKind::Uniform, 1000),
//!     ProcessKind::Uniform,
//!     StageConfig::new(ProcessKind::Uniform, 1000),
//! );
//! config.latency_goal = Duration::from_micros(1000);
//! config.quantum = Duration::from_micros(10);
//!
//! let report = Simulation::new(config).expect("valid configuration").run();
//! assert!(report.processed > 0);
//! ```

pub mod config;
pub mod consumer;
pub mod dispatcher;
pub mod driver;
pub mod producer;
pub mod request;

pub use config::{
    PipelineConfig, StageConfig, DEFAULT_GOAL_FACTOR, DEFAULT_LATENCY_GOAL,
    DEFAULT_TICK_QUANTUM,
};
pub use consumer::Consumer;
pub use dispatcher::Dispatcher;
pub use driver::{SimState, Simulation};
pub use producer::Producer;
pub use request::{Request, RequestId};

pub use latgate_metrics::{LatencyCollector, LatencySummary, SimulationReport};
