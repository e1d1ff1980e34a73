//! The in-app timer state machine.
//!
//! [`TimerController`] owns the authoritative answer to "is the timer
//! running, and what is the elapsed time". Every transition commits locally
//! first and then mirrors itself to the display surface through the bridge;
//! the mirror is best-effort and never load-bearing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::surface::{SurfaceBridge, SurfaceEvent, SurfaceEventKind};
use crate::types::TimerSnapshot;

// ============================================================================
// Constants
// ============================================================================

/// Default cadence of the display refresh task.
///
/// Sub-100ms so the decisecond digit looks smooth; not a correctness
/// requirement.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(32);

// ============================================================================
// TimerPhase
// ============================================================================

/// The three phases of the controller's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Never started, or reset.
    Idle,
    /// Counting.
    Running,
    /// Frozen, resumable.
    Paused,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats an elapsed duration as `MM:SS.d`.
///
/// Zero-padded minutes and seconds with a single decisecond digit; total
/// over any input, `00:00.0` for zero.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1_000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let deciseconds = (elapsed_ms % 1_000) / 100;
    format!("{:02}:{:02}.{}", minutes, seconds, deciseconds)
}

// ============================================================================
// TimerController
// ============================================================================

/// The in-app half of the timer, mirroring itself into the surface.
///
/// All mutation must be serialized through a single execution context; the
/// crate wires this up by keeping the controller behind an async mutex and
/// locking it for every REPL command, surface event, and reconciliation.
pub struct TimerController {
    clock: Arc<dyn Clock>,
    bridge: SurfaceBridge,
    snapshot: TimerSnapshot,
    display_tx: watch::Sender<String>,
    refresh: Option<JoinHandle<()>>,
    refresh_interval: Duration,
}

impl TimerController {
    /// Creates an idle controller.
    pub fn new(clock: Arc<dyn Clock>, bridge: SurfaceBridge) -> Self {
        let (display_tx, _display_rx) = watch::channel(format_elapsed(0));
        Self {
            clock,
            bridge,
            snapshot: TimerSnapshot::default(),
            display_tx,
            refresh: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Overrides the display refresh cadence.
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Subscribes to the continuously refreshed display value.
    ///
    /// The feed carries the formatted `MM:SS.d` string; while paused or
    /// idle it holds the last frozen value.
    pub fn display_feed(&self) -> watch::Receiver<String> {
        self.display_tx.subscribe()
    }

    /// Starts or resumes the timer.
    ///
    /// A no-op while already running: no downstream command is re-issued
    /// and the start time is untouched. Must be called from within a tokio
    /// runtime (the display refresh task is spawned here).
    pub fn play(&mut self) {
        if self.refresh.is_some() {
            // Already running.
            return;
        }

        let now = self.clock.now_ms();
        if !self.snapshot.is_started() {
            self.snapshot.start_at(now);
            self.bridge.start(&self.snapshot);
        } else if !self.snapshot.is_running() {
            self.snapshot.resume_at(now);
            self.bridge.resume(&self.snapshot);
        }

        self.start_refresh();
    }

    /// Pauses a running timer.
    ///
    /// `timestamp_ms`/`elapsed_ms` come from the surface when the pause was
    /// initiated there; a supplied elapsed value is trusted over the local
    /// recomputation to absorb clock skew between the two processes. A
    /// no-op unless running.
    pub fn pause(&mut self, timestamp_ms: Option<u64>, elapsed_ms: Option<u64>) {
        if !self.snapshot.is_running() {
            return;
        }

        self.stop_refresh();
        let at = timestamp_ms.unwrap_or_else(|| self.clock.now_ms());
        self.snapshot.pause_at(at, elapsed_ms);
        self.bridge.pause(&self.snapshot);
        self.push_display();
    }

    /// Resets to idle from any state and ends the surface lifecycle.
    pub fn reset(&mut self) {
        self.stop_refresh();
        self.snapshot.clear();
        self.bridge.stop();
        self.push_display();
    }

    /// The formatted display value for the current state, `MM:SS.d`.
    pub fn display_value(&self) -> String {
        format_elapsed(self.snapshot.elapsed_at(self.clock.now_ms()))
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> TimerPhase {
        if !self.snapshot.is_started() {
            TimerPhase::Idle
        } else if self.snapshot.is_running() {
            TimerPhase::Running
        } else {
            TimerPhase::Paused
        }
    }

    /// The controller's replica of the shared state.
    pub fn snapshot(&self) -> &TimerSnapshot {
        &self.snapshot
    }

    /// Applies a user interaction relayed from the surface.
    ///
    /// Events from an instance other than the bridge's current one come
    /// from a torn-down surface and are discarded without touching state.
    pub fn apply_event(&mut self, event: SurfaceEvent) {
        if !self.bridge.is_current(event.activity) {
            debug!(activity = %event.activity, "discarding event from torn-down surface");
            return;
        }

        match event.kind {
            SurfaceEventKind::Pause {
                timestamp_ms,
                elapsed_ms,
            } => self.pause(timestamp_ms, elapsed_ms),
            SurfaceEventKind::Resume => self.play(),
            SurfaceEventKind::Reset => self.reset(),
        }
    }

    /// Overwrites local state with the surface's replica.
    ///
    /// Run when the app returns to the foreground: the surface may have
    /// taken pause/resume taps while this process was suspended, so at
    /// resume time the external replica is the source of truth. If no
    /// surface exists, local state stands.
    pub fn resync(&mut self) {
        let Some(remote) = self.bridge.query() else {
            return;
        };

        if remote.is_running() {
            if self.snapshot.is_running()
                && self.snapshot.start_time_ms == remote.start_time_ms
                && self.refresh.is_some()
            {
                // Nothing diverged; keep the running refresh task.
                return;
            }

            info!("adopting running surface state");
            self.stop_refresh();
            self.snapshot.start_time_ms = remote.start_time_ms;
            self.snapshot.paused_at_ms = None;
            // No downstream command: the surface already shows this state.
            self.start_refresh();
        } else {
            info!("adopting paused surface state");
            self.stop_refresh();
            self.snapshot.start_time_ms = remote.start_time_ms;
            self.snapshot.elapsed_ms = remote.elapsed_ms;
            // Marks when the reconciliation observed the pause, not when
            // the pause happened on the surface.
            self.snapshot.paused_at_ms = Some(self.clock.now_ms());
            self.push_display();
        }
    }

    /// Cancels the refresh task; no side effects happen after this.
    pub fn shutdown(&mut self) {
        self.stop_refresh();
    }

    fn start_refresh(&mut self) {
        self.stop_refresh();

        let Some(start) = self.snapshot.start_time_ms else {
            return;
        };

        let clock = Arc::clone(&self.clock);
        let display_tx = self.display_tx.clone();
        let period = self.refresh_interval;
        self.refresh = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                display_tx.send_replace(format_elapsed(clock.now_ms().saturating_sub(start)));
            }
        }));
    }

    fn stop_refresh(&mut self) {
        if let Some(handle) = self.refresh.take() {
            handle.abort();
        }
    }

    fn push_display(&self) {
        self.display_tx.send_replace(self.display_value());
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.stop_refresh();
    }
}

// ============================================================================
// Tests
// ============================================================================
