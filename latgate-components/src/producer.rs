//! Request emission on a configured arrival process.

use crate::dispatcher::Dispatcher;
use crate::request::{Request, RequestId};
use latgate_core::{SimTime, StochasticProcess};

/// Emits requests into the dispatcher's pending queue.
pub struct Producer {
    arrivals: StochasticProcess,
    next_emission: SimTime,
    generated: u64,
}

impl Producer {
    pub fn new(arrivals: StochasticProcess) -> Self {
        Self {
            arrivals,
            next_emission: SimTime::ZERO,
            generated: 0,
        }
    }

    /// Emit every request whose scheduled arrival has been reached.
    ///
    /// Requests are stamped with their scheduled emission time rather than
    /// `now`, and the loop catches up across multiple intervals, so
    /// throughput stays correct even when one tick spans several arrivals.
    pub fn tick(&mut self, now: SimTime, dispatcher: &mut Dispatcher) {
        while now >= self.next_emission {
            let request = Request::new(RequestId(self.generated), self.next_emission);
            dispatcher.queue(request);
            self.next_emission = self.next_emission + self.arrivals.sample();
            self.generated += 1;
        }
    }

    /// Requests emitted so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }
}
