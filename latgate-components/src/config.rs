//! Immutable configuration for a pipeline run.

use latgate_core::{ConfigError, ProcessKind, StochasticProcess, DEFAULT_CAP_FACTOR};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default admission window for the dispatcher.
pub const DEFAULT_LATENCY_GOAL: Duration = Duration::from_micros(500);

/// Default multiplier sizing the concurrency limit from the latency goal.
pub const DEFAULT_GOAL_FACTOR: f64 = 1.5;

/// How far the clock advances per step unless overridden.
///
/// The quantum must stay small relative to the fastest configured period or
/// event timing quietly loses resolution; the driver warns at construction
/// when it does not.
pub const DEFAULT_TICK_QUANTUM: Duration = Duration::from_micros(1);

/// One rate-driven stage: which process shape it samples, and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub kind: ProcessKind,
    /// Events per second.
    pub rate: u64,
}

impl StageConfig {
    pub fn new(kind: ProcessKind, rate: u64) -> Self {
        Self { kind, rate }
    }

    /// Mean interval between this stage's events.
    pub fn period(&self) -> Result<Duration, ConfigError> {
        if self.rate == 0 {
            return Err(ConfigError::InvalidRate(self.rate));
        }
        Ok(Duration::from_secs_f64(1.0 / self.rate as f64))
    }
}

/// Everything a run needs, fixed before the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How much logical time to simulate.
    pub horizon: Duration,
    /// Arrival process.
    pub producer: StageConfig,
    /// Dispatch-attempt cadence shape; its period is the latency goal.
    pub dispatcher_kind: ProcessKind,
    /// Service process.
    pub consumer: StageConfig,
    /// Admission window the dispatcher sizes its limit from.
    pub latency_goal: Duration,
    /// Concurrency multiplier applied to the latency goal.
    pub goal_factor: f64,
    /// Jitter ceiling for capdelay processes.
    pub cap_factor: f64,
    /// Clock step.
    pub quantum: Duration,
    /// Seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Emit a progress line roughly once per simulated second.
    pub progress: bool,
}

impl PipelineConfig {
    /// A configuration with the default goal, factors, and quantum.
    pub fn new(
        horizon: Duration,
        producer: StageConfig,
        dispatcher_kind: ProcessKind,
        consumer: StageConfig,
    ) -> Self {
        Self {
            horizon,
            producer,
            dispatcher_kind,
            consumer,
            latency_goal: DEFAULT_LATENCY_GOAL,
            goal_factor: DEFAULT_GOAL_FACTOR,
            cap_factor: DEFAULT_CAP_FACTOR,
            quantum: DEFAULT_TICK_QUANTUM,
            seed: None,
            progress: false,
        }
    }

    /// Build the interval generator for one stage.
    ///
    /// Stages derive distinct seeds from the configured one so a single knob
    /// reproduces a run without the producer, dispatcher, and consumer
    /// sharing a random stream.
    pub(crate) fn build_process(
        &self,
        kind: ProcessKind,
        period: Duration,
        stage: u64,
    ) -> Result<StochasticProcess, ConfigError> {
        match self.seed {
            Some(seed) => StochasticProcess::with_seed(
                kind,
                period,
                self.cap_factor,
                seed.wrapping_add(stage),
            ),
            None => StochasticProcess::new(kind, period, self.cap_factor),
        }
    }
}
