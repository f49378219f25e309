//! The unit of synthetic work flowing through the pipeline.

use latgate_core::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unique identifier for requests, assigned in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// One request moving producer → dispatcher → consumer.
///
/// A request is owned by exactly one FIFO at a time — the dispatcher's
/// pending queue, then the consumer's in-flight queue — and moves by value
/// between them. Its three timestamps are stamped in lifecycle order:
/// created at emission, dispatched at admission into the consumer, completed
/// when service finishes, so `created_at <= dispatched_at <= completed_at`
/// holds once each is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Identifier, unique within a run.
    pub id: RequestId,
    /// Logical time the producer emitted this request.
    pub created_at: SimTime,
    /// Logical time the dispatcher admitted it; unset while queued.
    pub dispatched_at: Option<SimTime>,
    /// Logical time service finished; unset until completion.
    pub completed_at: Option<SimTime>,
}

impl Request {
    /// Create a request at its scheduled emission time.
    pub fn new(id: RequestId, created_at: SimTime) -> Self {
        Self {
            id,
            created_at,
            dispatched_at: None,
            completed_at: None,
        }
    }

    /// Stamp admission into the consumer.
    pub fn mark_dispatched(&mut self, at: SimTime) {
        debug_assert!(at >= self.created_at);
        self.dispatched_at = Some(at);
    }

    /// Stamp completion of service.
    pub fn complete(&mut self, at: SimTime) {
        debug_assert!(self.dispatched_at.map_or(true, |d| at >= d));
        self.completed_at = Some(at);
    }

    /// Whether the dispatcher has admitted this request.
    pub fn is_dispatched(&self) -> bool {
        self.dispatched_at.is_some()
    }

    /// Whether service has finished.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Creation-to-completion latency (queueing plus service), or `None`
    /// until the request completes.
    pub fn total_latency(&self) -> Option<Duration> {
        self.completed_at
            .map(|completed| completed.duration_since(self.created_at))
    }

    /// Dispatch-to-completion latency (service only), or `None` until the
    /// request has both been dispatched and completed.
    pub fn exec_latency(&self) -> Option<Duration> {
        match (self.dispatched_at, self.completed_at) {
            (Some(dispatched), Some(completed)) => {
                Some(completed.duration_since(dispatched))
            }
            _ => None,
        }
    }
}
