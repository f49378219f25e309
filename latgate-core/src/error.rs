//! Error types for simulator configuration.
//!
//! Every error here is detected while building a simulation, before the
//! first tick runs. Once construction succeeds, per-tick operations are
//! total functions over their state and cannot fail.

use std::time::Duration;
use thiserror::Error;

/// A configuration the simulator refuses to run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown process kind `{0}` (expected uniform, poisson, expdelay, or capdelay)")]
    UnknownProcessKind(String),

    #[error("process period must be positive, got {0:?}")]
    InvalidPeriod(Duration),

    #[error("stage rate must be positive, got {0}")]
    InvalidRate(u64),

    #[error("cap factor must be a finite value greater than 1.0, got {0}")]
    InvalidCapFactor(f64),

    #[error(
        "consumer rate too low relative to the latency goal: \
         admission limit is zero (goal {latency_goal:?} x factor {goal_factor} \
         with service interval {service_interval:?})"
    )]
    AdmissionLimitZero {
        latency_goal: Duration,
        goal_factor: f64,
        service_interval: Duration,
    },

    #[error("simulation horizon must be positive, got {0:?}")]
    InvalidHorizon(Duration),

    #[error("tick quantum must be positive, got {0:?}")]
    InvalidQuantum(Duration),
}
