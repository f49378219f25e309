//! Core primitives for the latgate pipeline simulator.
//!
//! This crate provides the building blocks shared by the pipeline components
//! and the metrics collector:
//!
//! - [`SimTime`]: simulation time (logical, not wall-clock) with nanosecond
//!   precision. The driver advances it in fixed quanta.
//! - [`StochasticProcess`]: interval generators for arrival, dispatch, and
//!   service processes, selected by [`ProcessKind`].
//! - [`ConfigError`]: every failure the simulator can produce; all of them
//!   are detected at construction time, before the first tick.
//! - [`logging`]: `tracing` subscriber setup for runs and tests.
//!
//! # Basic Usage
//!
//! ```rust
//! use latgate_core::{ProcessKind, StochasticProcess};
//! use std::time::Duration;
//!
//! let mut arrivals = StochasticProcess::with_seed(
//!     ProcessKind::Poisson,
//!     Duration::from_millis(1),
//!     latgate_core::DEFAULT_CAP_FACTOR,
//!     42,
//! )
//! .expect("valid configuration");
//!
//! let gap = arrivals.sample();
//! assert!(gap > Duration::ZERO);
//! ```

pub mod dists;
pub mod error;
pub mod logging;
pub mod time;

pub use dists::{ProcessKind, StochasticProcess, DEFAULT_CAP_FACTOR};
pub use error::ConfigError;
pub use logging::{init_logging, init_logging_with_level};
pub use time::SimTime;
