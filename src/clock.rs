//! Wall-clock abstraction.
//!
//! Every "now" read in the crate goes through the [`Clock`] trait so that
//! state transitions can be driven deterministically in tests. Timestamps
//! are unix-epoch milliseconds, the single unit used across the whole
//! command/event channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

// ============================================================================
// Clock
// ============================================================================

/// Source of the current time in unix-epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Returns the current time as milliseconds since the unix epoch.
    fn now_ms(&self) -> u64;
}

// ============================================================================
// SystemClock
// ============================================================================

/// Production clock backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

// ============================================================================
// ManualClock
// ============================================================================

/// Manually driven clock for tests and deterministic demos.
///
/// The clock only moves when told to; `advance` and `set` are safe to call
/// from any thread.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock starting at the given timestamp.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Moves the clock forward by the given number of milliseconds.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Tests
// ============================================================================
