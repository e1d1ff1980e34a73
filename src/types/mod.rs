//! Shared state contract between the in-app timer and the display surface.
//!
//! Both replicas (the in-app controller and the out-of-process surface)
//! keep their own [`TimerSnapshot`] and mutate it through the transition
//! methods defined here. Keeping the transition rules in one place is what
//! stops the two state machines from drifting apart semantically.
//!
//! Unit convention: every timestamp is unix-epoch milliseconds and every
//! elapsed value is a duration in milliseconds. Nothing on the
//! command/event/query channel uses any other unit.

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerSnapshot
// ============================================================================

/// The minimal state needed to render and resume a stopwatch.
///
/// Exactly one of three phases holds at any time:
/// - not started: `start_time_ms` is `None`
/// - running: `start_time_ms` is set, `paused_at_ms` is `None`
/// - paused: both timestamps are set
///
/// While running the elapsed time is recomputed as `now - start_time_ms`;
/// while paused the frozen `elapsed_ms` is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// When the current running interval began, if ever started.
    pub start_time_ms: Option<u64>,
    /// When the most recent pause happened; `None` while running.
    pub paused_at_ms: Option<u64>,
    /// Accumulated running duration, authoritative only while paused.
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl TimerSnapshot {
    /// Returns true once a start has occurred, whether running or paused.
    pub fn is_started(&self) -> bool {
        self.start_time_ms.is_some()
    }

    /// Returns true while started and not paused.
    pub fn is_running(&self) -> bool {
        self.start_time_ms.is_some() && self.paused_at_ms.is_none()
    }

    /// Records the first start.
    ///
    /// Does nothing if a start has already occurred; resuming from pause is
    /// [`resume_at`](Self::resume_at).
    pub fn start_at(&mut self, now_ms: u64) {
        if self.start_time_ms.is_none() {
            self.start_time_ms = Some(now_ms);
            self.paused_at_ms = None;
            self.elapsed_ms = 0;
        }
    }

    /// Freezes the snapshot at `at_ms`.
    ///
    /// Only valid while running. The frozen elapsed value is
    /// `at_ms - start_time_ms` unless the caller supplies one computed on
    /// the other side of the channel, which is then trusted instead.
    pub fn pause_at(&mut self, at_ms: u64, elapsed_override_ms: Option<u64>) {
        if let (Some(start), None) = (self.start_time_ms, self.paused_at_ms) {
            self.paused_at_ms = Some(at_ms);
            self.elapsed_ms = elapsed_override_ms.unwrap_or_else(|| at_ms.saturating_sub(start));
        }
    }

    /// Leaves the paused phase.
    ///
    /// The start time is shifted forward by the length of the pause gap so
    /// that `now - start_time_ms` keeps measuring only running time.
    pub fn resume_at(&mut self, now_ms: u64) {
        if let (Some(start), Some(paused)) = (self.start_time_ms, self.paused_at_ms) {
            let gap = now_ms.saturating_sub(paused);
            self.start_time_ms = Some(start.saturating_add(gap));
            self.paused_at_ms = None;
        }
    }

    /// Returns to the not-started phase.
    pub fn clear(&mut self) {
        self.start_time_ms = None;
        self.paused_at_ms = None;
        self.elapsed_ms = 0;
    }

    /// Elapsed running time as observed at `now_ms`.
    ///
    /// Total over all phases: zero before the first start, recomputed while
    /// running, frozen while paused.
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        match (self.start_time_ms, self.paused_at_ms) {
            (Some(start), None) => now_ms.saturating_sub(start),
            (Some(_), Some(_)) => self.elapsed_ms,
            _ => 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
