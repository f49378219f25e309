//! The fixed-step simulation driver.
//!
//! The driver is the only component aware of global time. Each step it
//! ticks the consumer, then the producer, then the dispatcher — completions
//! drain before new admissions are attempted, so a request can never be
//! admitted and completed at the same instant — and then advances the clock
//! by the configured quantum until it passes the horizon.

use crate::config::PipelineConfig;
use crate::consumer::Consumer;
use crate::dispatcher::Dispatcher;
use crate::producer::Producer;
use latgate_core::{ConfigError, SimTime};
use latgate_metrics::{LatencyCollector, SimulationReport};
use std::time::Duration;
use tracing::{debug, info, warn};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Where a simulation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// The clock has not yet passed the horizon.
    Running,
    /// Terminal; stepping does nothing further.
    Done,
}

/// A fully constructed pipeline run.
pub struct Simulation {
    config: PipelineConfig,
    horizon_end: SimTime,
    now: SimTime,
    state: SimState,
    producer: Producer,
    dispatcher: Dispatcher,
    consumer: Consumer,
    collector: LatencyCollector,
    peak_queued: usize,
    peak_in_flight: usize,
    next_progress: SimTime,
}

impl Simulation {
    /// Validate the configuration and wire up the pipeline.
    ///
    /// Every failure the simulator can produce surfaces here, before the
    /// first tick, so a run never emits a partial, misleading report.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        if config.horizon.is_zero() {
            return Err(ConfigError::InvalidHorizon(config.horizon));
        }
        if config.quantum.is_zero() {
            return Err(ConfigError::InvalidQuantum(config.quantum));
        }

        let producer_period = config.producer.period()?;
        let consumer_period = config.consumer.period()?;

        let arrivals = config.build_process(config.producer.kind, producer_period, 0)?;
        // The dispatch cadence runs at the latency goal, the same window its
        // admission limit is sized from.
        let cadence =
            config.build_process(config.dispatcher_kind, config.latency_goal, 1)?;
        let service = config.build_process(config.consumer.kind, consumer_period, 2)?;

        let producer = Producer::new(arrivals);
        let consumer = Consumer::new(service);
        let dispatcher = Dispatcher::new(
            config.latency_goal,
            config.goal_factor,
            consumer_period,
            cadence,
        )?;

        let fastest = producer_period
            .min(consumer_period)
            .min(config.latency_goal);
        if config.quantum > fastest / 10 {
            warn!(
                quantum = ?config.quantum,
                fastest_period = ?fastest,
                "tick quantum is coarse relative to the fastest configured period; \
                 event timing will lose accuracy"
            );
        }
        debug!(
            limit = dispatcher.limit(),
            horizon = ?config.horizon,
            quantum = ?config.quantum,
            "simulation constructed"
        );

        Ok(Self {
            horizon_end: SimTime::from_duration(config.horizon),
            now: SimTime::ZERO,
            state: SimState::Running,
            producer,
            dispatcher,
            consumer,
            collector: LatencyCollector::new(),
            peak_queued: 0,
            peak_in_flight: 0,
            next_progress: SimTime::from_duration(PROGRESS_INTERVAL),
            config,
        })
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Current logical time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Perform one clock step. Returns `false` once the horizon has passed.
    pub fn step(&mut self) -> bool {
        if self.state == SimState::Done {
            return false;
        }
        if self.now > self.horizon_end {
            self.state = SimState::Done;
            return false;
        }

        let now = self.now;
        self.consumer.tick(now, &mut self.collector);
        self.producer.tick(now, &mut self.dispatcher);
        self.dispatcher.tick(now, &mut self.consumer);

        self.peak_queued = self.peak_queued.max(self.dispatcher.queued());
        self.peak_in_flight = self.peak_in_flight.max(self.consumer.in_flight());

        if self.config.progress && now >= self.next_progress {
            self.emit_progress(now);
            self.next_progress = self.next_progress + PROGRESS_INTERVAL;
        }

        self.now = now + self.config.quantum;
        true
    }

    /// Run to the horizon and assemble the final report.
    pub fn run(&mut self) -> SimulationReport {
        info!(
            horizon = ?self.config.horizon,
            producer_rate = self.config.producer.rate,
            consumer_rate = self.config.consumer.rate,
            "starting simulation"
        );
        while self.step() {}
        let report = self.report();
        info!(
            generated = report.generated,
            processed = report.processed,
            peak_queued = report.peak_queued,
            "simulation completed"
        );
        report
    }

    /// Snapshot the statistics accumulated so far.
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            producer_rate: self.config.producer.rate,
            consumer_rate: self.config.consumer.rate,
            peak_queued: self.peak_queued,
            peak_in_flight: self.peak_in_flight,
            generated: self.producer.generated(),
            dispatched: self.dispatcher.dispatched(),
            processed: self.consumer.processed(),
            total_latency: self.collector.total().summary(),
            exec_latency: self.collector.exec().summary(),
        }
    }

    fn emit_progress(&self, now: SimTime) {
        let elapsed = now.as_secs_f64();
        info!(
            time = %now,
            queued = self.dispatcher.queued(),
            peak_queued = self.peak_queued,
            generated_per_sec = self.producer.generated() as f64 / elapsed,
            dispatched_per_sec = self.dispatcher.dispatched() as f64 / elapsed,
            processed_per_sec = self.consumer.processed() as f64 / elapsed,
            "progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use latgate_core::ProcessKind;

    fn base_config() -> PipelineConfig {
        let mut config = PipelineConfig::new(
            Duration::from_millis(100),
            StageConfig::new(ProcessKind::Uniform, 1000),
            ProcessKind::Uniform,
            StageConfig::new(ProcessKind::Uniform, 1000),
        );
        // 1ms goal x 1.5 against a 1ms service interval: limit 1.
        config.latency_goal = Duration::from_millis(1);
        config.quantum = Duration::from_micros(10);
        config
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let mut config = base_config();
        config.horizon = Duration::ZERO;
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn zero_quantum_is_rejected() {
        let mut config = base_config();
        config.quantum = Duration::ZERO;
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::InvalidQuantum(_))
        ));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut config = base_config();
        config.producer.rate = 0;
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::InvalidRate(0))
        ));
    }

    #[test]
    fn infeasible_goal_fails_at_construction() {
        let mut config = base_config();
        config.latency_goal = Duration::from_micros(500); // 750µs window, 1ms interval
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::AdmissionLimitZero { .. })
        ));
    }

    #[test]
    fn run_reaches_done_and_stays_there() {
        let mut sim = Simulation::new(base_config()).expect("valid configuration");
        assert_eq!(sim.state(), SimState::Running);

        let report = sim.run();
        assert_eq!(sim.state(), SimState::Done);
        assert!(!sim.step());

        // 100ms at 1000/s: about a hundred requests through the pipe.
        assert!(report.generated >= 100);
        assert!(report.processed > 90);
        assert!(report.dispatched >= report.processed);
        assert!(report.generated >= report.dispatched);
    }

    #[test]
    fn report_snapshot_is_consistent_mid_run() {
        let mut sim = Simulation::new(base_config()).expect("valid configuration");
        for _ in 0..1000 {
            if !sim.step() {
                break;
            }
        }
        let report = sim.report();
        assert!(report.generated >= report.dispatched);
        assert!(report.dispatched >= report.processed);
    }
}
