//! Phase deadlines for Nightfall.
//!
//! Every phase of a session has a bounded wait. A [`PhaseTimer`] holds at
//! most one pending deadline; arming it again replaces the old one, and
//! disarming it leaves [`PhaseTimer::wait_for_deadline`] pending forever.
//!
//! # Integration
//!
//! The timer sits inside a session actor's `tokio::select!` loop, racing
//! the command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* submissions, skips, cancel */ }
//!         deadline = timer.wait_for_deadline() => {
//!             /* resolve the phase with default actions */
//!         }
//!     }
//! }
//! ```
//!
//! Because an expired deadline disarms the timer, the branch fires once per
//! arming even if the loop polls it again before the next phase opens.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Deadline info
// ---------------------------------------------------------------------------

/// A deadline that expired, returned by [`PhaseTimer::wait_for_deadline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    /// Which arming this was (starts at 1, bumped by every [`PhaseTimer::arm`]).
    pub generation: u64,
    /// The wait that was configured when the timer was armed.
    pub duration: Duration,
    /// How late the wakeup was relative to the scheduled instant.
    pub late_by: Duration,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters for one timer's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerMetrics {
    /// Times the timer was armed.
    pub armed: u64,
    /// Deadlines that actually expired.
    pub fired: u64,
    /// Deadlines dropped before expiring, by [`PhaseTimer::disarm`] or a
    /// re-arm.
    pub cancelled: u64,
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// A single cancellable deadline, owned by one session actor.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    /// When the pending deadline expires (Tokio instant for `sleep_until`).
    deadline: Option<Instant>,
    duration: Duration,
    generation: u64,
    metrics: TimerMetrics,
}

impl PhaseTimer {
    /// A disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a deadline `duration` from now, replacing any pending one.
    ///
    /// Returns the new generation.
    pub fn arm(&mut self, duration: Duration) -> u64 {
        if self.deadline.is_some() {
            self.metrics.cancelled += 1;
        }
        self.generation += 1;
        self.duration = duration;
        self.deadline = Some(Instant::now() + duration);
        self.metrics.armed += 1;
        debug!(
            generation = self.generation,
            secs = duration.as_secs_f64(),
            "phase deadline armed"
        );
        self.generation
    }

    /// Drops the pending deadline. Returns `false` if nothing was armed.
    pub fn disarm(&mut self) -> bool {
        if self.deadline.take().is_some() {
            self.metrics.cancelled += 1;
            debug!(generation = self.generation, "phase deadline disarmed");
            true
        } else {
            false
        }
    }

    /// Waits for the pending deadline to expire, then disarms.
    ///
    /// When disarmed this future pends forever, so a `tokio::select!` keeps
    /// serving its other branches.
    pub async fn wait_for_deadline(&mut self) -> Deadline {
        let Some(at) = self.deadline else {
            return std::future::pending().await;
        };

        time::sleep_until(at).await;

        let late_by = Instant::now().saturating_duration_since(at);
        self.deadline = None;
        self.metrics.fired += 1;
        trace!(generation = self.generation, ?late_by, "phase deadline expired");

        Deadline {
            generation: self.generation,
            duration: self.duration,
            late_by,
        }
    }

    /// Time left before the pending deadline, or `None` when disarmed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn metrics(&self) -> &TimerMetrics {
        &self.metrics
    }
}
