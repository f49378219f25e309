//! The single virtual server at the end of the pipeline.

use crate::request::Request;
use latgate_core::{SimTime, StochasticProcess};
use latgate_metrics::LatencyCollector;
use std::collections::VecDeque;

/// Serves admitted requests one at a time, in strict FIFO order.
///
/// This is one virtual server, not a pool: its achievable completion rate
/// is exactly the inverse of the mean service interval, and its in-flight
/// depth is bounded only by the dispatcher's admission limit. Completed
/// requests report their latencies to the collector and are dropped.
pub struct Consumer {
    service: StochasticProcess,
    in_flight: VecDeque<Request>,
    next_completion: SimTime,
    processed: u64,
}

impl Consumer {
    pub fn new(service: StochasticProcess) -> Self {
        Self {
            service,
            in_flight: VecDeque::new(),
            next_completion: SimTime::ZERO,
            processed: 0,
        }
    }

    /// Accept an admitted request into service.
    ///
    /// An idle server starts timing from `now`; a busy one keeps its current
    /// completion schedule and the request waits its turn in the FIFO.
    pub fn execute(&mut self, now: SimTime, mut request: Request) {
        if self.in_flight.is_empty() {
            self.next_completion = now + self.service.sample();
        }
        request.mark_dispatched(now);
        self.in_flight.push_back(request);
    }

    /// Complete every request whose service time has elapsed.
    pub fn tick(&mut self, now: SimTime, collector: &mut LatencyCollector) {
        while !self.in_flight.is_empty() && now >= self.next_completion {
            if let Some(mut request) = self.in_flight.pop_front() {
                request.complete(now);
                if let (Some(total), Some(exec)) =
                    (request.total_latency(), request.exec_latency())
                {
                    collector.collect(total, exec);
                }
                self.processed += 1;
                self.next_completion = self.next_completion + self.service.sample();
            }
        }
    }

    /// Requests currently in service or waiting in the server's FIFO.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Requests completed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}
