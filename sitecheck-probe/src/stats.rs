//! Visit counters shared across concurrent probes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counter sink for visit bookkeeping.
///
/// An attempt is recorded before every request a probe makes, including
/// retries and depth-1 link fetches. A success is recorded for every fetch
/// that classified as acceptable. Implementations must tolerate calls from
/// many tasks at once.
pub trait VisitStats: Send + Sync {
    /// Called once per outgoing request, before it is sent.
    fn record_attempt(&self);
    /// Called once per fetch whose status classified as acceptable.
    fn record_success(&self);
    /// Current totals.
    fn snapshot(&self) -> StatsSnapshot;
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub attempts: u64,
    pub success_visits: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempts:{} success_visits:{}",
            self.attempts, self.success_visits
        )
    }
}

/// Lock-free [`VisitStats`] backed by atomic counters.
#[derive(Debug, Default)]
pub struct AtomicVisitStats {
    attempts: AtomicU64,
    success_visits: AtomicU64,
}

impl AtomicVisitStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitStats for AtomicVisitStats {
    fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_success(&self) {
        self.success_visits.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            success_visits: self.success_visits.load(Ordering::Relaxed),
        }
    }
}
