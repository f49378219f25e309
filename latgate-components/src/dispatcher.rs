//! Admission control between the producer and the consumer.

use crate::consumer::Consumer;
use crate::request::Request;
use latgate_core::{ConfigError, SimTime, StochasticProcess};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Holds pending requests and admits them under a concurrency limit.
///
/// The dispatcher is the sole gate between the producer and the consumer:
/// however fast requests arrive, no more than `limit` are ever concurrently
/// in service. The limit is how many service intervals fit into the latency
/// goal, scaled by the goal factor:
/// `floor(latency_goal * goal_factor / service_interval)`.
///
/// The pending queue is unbounded on purpose — overload shows up as queue
/// growth in the report instead of being dropped.
pub struct Dispatcher {
    cadence: StochasticProcess,
    next_attempt: SimTime,
    pending: VecDeque<Request>,
    limit: usize,
    dispatched: u64,
}

impl Dispatcher {
    /// Build a dispatcher for a consumer with the given mean service
    /// interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AdmissionLimitZero`] when not even one request
    /// fits inside the latency goal — such a system cannot meet the goal and
    /// is not worth simulating.
    pub fn new(
        latency_goal: Duration,
        goal_factor: f64,
        service_interval: Duration,
        cadence: StochasticProcess,
    ) -> Result<Self, ConfigError> {
        let limit = (latency_goal.as_secs_f64() * goal_factor
            / service_interval.as_secs_f64())
        .floor() as usize;
        if limit == 0 {
            return Err(ConfigError::AdmissionLimitZero {
                latency_goal,
                goal_factor,
                service_interval,
            });
        }
        debug!(
            limit,
            goal = ?latency_goal,
            goal_factor,
            "admission limit computed"
        );

        Ok(Self {
            cadence,
            next_attempt: SimTime::ZERO,
            pending: VecDeque::new(),
            limit,
            dispatched: 0,
        })
    }

    /// Append a request to the tail of the pending queue. Never fails.
    pub fn queue(&mut self, request: Request) {
        self.pending.push_back(request);
    }

    /// Attempt admission if a dispatch attempt has come due.
    ///
    /// On firing, admits head requests one at a time until the queue empties
    /// or the consumer reaches the concurrency limit.
    pub fn tick(&mut self, now: SimTime, consumer: &mut Consumer) {
        if now < self.next_attempt {
            return;
        }
        self.next_attempt = self.next_attempt + self.cadence.sample();

        while !self.pending.is_empty() && consumer.in_flight() < self.limit {
            if let Some(request) = self.pending.pop_front() {
                consumer.execute(now, request);
                self.dispatched += 1;
            }
        }
    }

    /// Current pending-queue depth.
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Requests admitted so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// The concurrency limit in force.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestId;
    use latgate_core::{ProcessKind, DEFAULT_CAP_FACTOR};
    use latgate_metrics::LatencyCollector;

    fn uniform(period: Duration) -> StochasticProcess {
        StochasticProcess::new(ProcessKind::Uniform, period, DEFAULT_CAP_FACTOR)
            .expect("valid configuration")
    }

    fn request(id: u64) -> Request {
        Request::new(RequestId(id), SimTime::ZERO)
    }

    #[test]
    fn limit_is_service_intervals_per_admission_window() {
        // 500µs goal x 1.5 = 750µs window; 100µs service interval: limit 7.
        let dispatcher = Dispatcher::new(
            Duration::from_micros(500),
            1.5,
            Duration::from_micros(100),
            uniform(Duration::from_micros(500)),
        )
        .expect("valid configuration");
        assert_eq!(dispatcher.limit(), 7);
    }

    #[test]
    fn zero_limit_is_a_configuration_error() {
        // 500µs goal x 1.5 = 750µs window against a 1ms service interval.
        let result = Dispatcher::new(
            Duration::from_micros(500),
            1.5,
            Duration::from_millis(1),
            uniform(Duration::from_micros(500)),
        );
        assert!(matches!(
            result,
            Err(ConfigError::AdmissionLimitZero { .. })
        ));
    }

    #[test]
    fn limit_of_one_admits_a_single_concurrent_request() {
        let goal = Duration::from_millis(1);
        let mut dispatcher = Dispatcher::new(
            goal,
            1.5,
            Duration::from_millis(1),
            uniform(goal),
        )
        .expect("valid configuration");
        assert_eq!(dispatcher.limit(), 1);

        let mut consumer = Consumer::new(uniform(Duration::from_millis(1)));
        for id in 0..3 {
            dispatcher.queue(request(id));
        }

        dispatcher.tick(SimTime::ZERO, &mut consumer);
        assert_eq!(consumer.in_flight(), 1);
        assert_eq!(dispatcher.queued(), 2);
        assert_eq!(dispatcher.dispatched(), 1);

        // Still full: a later attempt admits nothing more.
        dispatcher.tick(SimTime::from_millis(1), &mut consumer);
        assert_eq!(consumer.in_flight(), 1);
        assert_eq!(dispatcher.queued(), 2);
    }

    #[test]
    fn admission_resumes_as_capacity_frees() {
        let goal = Duration::from_millis(2);
        let mut dispatcher = Dispatcher::new(
            goal,
            1.0,
            Duration::from_millis(1),
            uniform(goal),
        )
        .expect("valid configuration");
        assert_eq!(dispatcher.limit(), 2);

        let mut consumer = Consumer::new(uniform(Duration::from_millis(1)));
        let mut collector = LatencyCollector::new();
        for id in 0..4 {
            dispatcher.queue(request(id));
        }

        dispatcher.tick(SimTime::ZERO, &mut consumer);
        assert_eq!(consumer.in_flight(), 2);
        assert_eq!(dispatcher.queued(), 2);

        // One completion at 1ms frees one slot; the next attempt at 2ms
        // tops the consumer back up to the limit.
        consumer.tick(SimTime::from_millis(1), &mut collector);
        assert_eq!(consumer.in_flight(), 1);
        dispatcher.tick(SimTime::from_millis(2), &mut consumer);
        assert_eq!(consumer.in_flight(), 2);
        assert_eq!(dispatcher.queued(), 1);
        assert_eq!(dispatcher.dispatched(), 3);
    }

    #[test]
    fn no_attempt_before_the_cadence_fires() {
        let mut dispatcher = Dispatcher::new(
            Duration::from_millis(1),
            1.5,
            Duration::from_millis(1),
            uniform(Duration::from_millis(5)),
        )
        .expect("valid configuration");
        let mut consumer = Consumer::new(uniform(Duration::from_millis(1)));

        dispatcher.queue(request(0));
        dispatcher.tick(SimTime::ZERO, &mut consumer);
        assert_eq!(consumer.in_flight(), 1);

        // The first attempt rescheduled to 5ms; earlier ticks do nothing.
        dispatcher.queue(request(1));
        dispatcher.tick(SimTime::from_millis(4), &mut consumer);
        assert_eq!(dispatcher.queued(), 1);
        dispatcher.tick(SimTime::from_millis(5), &mut consumer);
        assert_eq!(dispatcher.queued(), 1); // consumer already at limit 1
    }
}
