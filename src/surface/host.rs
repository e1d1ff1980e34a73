//! The host contract for the display surface, plus two implementations.
//!
//! [`ActivityHost`] is the boundary the synchronization core depends on: a
//! capability check, the surface lifecycle verbs, and a query of the
//! surface's current replica. [`InProcessHost`] simulates the host inside
//! the application process. It owns the surface-side replica, applies
//! button presses to it with the shared transition rules, and emits the
//! corresponding events. [`RecordingHost`] records the lifecycle calls it
//! receives, for tests.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::types::TimerSnapshot;

use super::error::SurfaceError;
use super::events::{EventPublisher, SurfaceEvent, SurfaceEventKind};

// ============================================================================
// ActivityId
// ============================================================================

/// Opaque handle for one surface lifecycle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivityId(Uuid);

impl ActivityId {
    /// Generates a fresh instance id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// ActivityHost
// ============================================================================

/// What the synchronization core needs from the host-managed surface.
pub trait ActivityHost: Send + Sync {
    /// Whether the live-activity capability is currently permitted.
    ///
    /// Consulted before every create; when false the surface is simply
    /// never created and the in-app timer runs without its mirror.
    fn activities_enabled(&self) -> bool;

    /// Creates a surface instance showing the given snapshot.
    fn create(&self, snapshot: &TimerSnapshot) -> Result<ActivityId, SurfaceError>;

    /// Pushes a new snapshot to an existing instance.
    fn update(&self, id: ActivityId, snapshot: &TimerSnapshot) -> Result<(), SurfaceError>;

    /// Ends an instance. Idempotent: ending an unknown id does nothing.
    fn end(&self, id: ActivityId);

    /// Returns the surface's current replica, if an instance exists.
    fn query_active(&self) -> Option<TimerSnapshot>;
}

// ============================================================================
// InProcessHost
// ============================================================================

struct ActiveSurface {
    id: ActivityId,
    snapshot: TimerSnapshot,
}

/// Stand-in for the host-managed display surface, running in-process.
///
/// Used by the demo binary and by tests. It keeps its own [`TimerSnapshot`]
/// replica, independent from the controller's exactly like the real
/// out-of-process surface, and the `press_*` methods mutate that replica
/// before emitting the matching event, so taps are visible to the
/// reconciliation query even when nobody is consuming events.
pub struct InProcessHost {
    enabled: AtomicBool,
    active: Mutex<Option<ActiveSurface>>,
    events: EventPublisher,
    clock: Arc<dyn Clock>,
}

impl InProcessHost {
    /// Creates a host with the live-activity capability enabled.
    pub fn new(clock: Arc<dyn Clock>, events: EventPublisher) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            active: Mutex::new(None),
            events,
            clock,
        }
    }

    /// Creates a host with the capability disabled.
    ///
    /// Every create is refused; the in-app timer must keep working anyway.
    pub fn disabled(clock: Arc<dyn Clock>, events: EventPublisher) -> Self {
        let host = Self::new(clock, events);
        host.enabled.store(false, Ordering::Relaxed);
        host
    }

    /// Flips the capability at runtime.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Simulates a tap on the surface's pause button.
    ///
    /// The surface freezes its own replica with its own clock and reports
    /// both the press timestamp and the elapsed value it computed.
    pub fn press_pause(&self) {
        let mut guard = self.lock_active();
        if let Some(active) = guard.as_mut() {
            if active.snapshot.is_running() {
                let now = self.clock.now_ms();
                active.snapshot.pause_at(now, None);
                self.events.publish(SurfaceEvent {
                    activity: active.id,
                    kind: SurfaceEventKind::Pause {
                        timestamp_ms: Some(now),
                        elapsed_ms: Some(active.snapshot.elapsed_ms),
                    },
                });
            }
        }
    }

    /// Simulates a tap on the surface's resume button.
    pub fn press_resume(&self) {
        let mut guard = self.lock_active();
        if let Some(active) = guard.as_mut() {
            if active.snapshot.is_started() && !active.snapshot.is_running() {
                active.snapshot.resume_at(self.clock.now_ms());
                self.events.publish(SurfaceEvent {
                    activity: active.id,
                    kind: SurfaceEventKind::Resume,
                });
            }
        }
    }

    /// Simulates a tap on the surface's reset button.
    ///
    /// Only emits the event; tearing the instance down is the application's
    /// stop command, so a reset tapped while the app is suspended leaves
    /// the surface visible until the app reacts.
    pub fn press_reset(&self) {
        let guard = self.lock_active();
        if let Some(active) = guard.as_ref() {
            self.events.publish(SurfaceEvent {
                activity: active.id,
                kind: SurfaceEventKind::Reset,
            });
        }
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveSurface>> {
        // A poisoned lock still holds consistent replica data.
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ActivityHost for InProcessHost {
    fn activities_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn create(&self, snapshot: &TimerSnapshot) -> Result<ActivityId, SurfaceError> {
        if !self.activities_enabled() {
            return Err(SurfaceError::Disabled);
        }

        let id = ActivityId::new();
        let mut guard = self.lock_active();
        *guard = Some(ActiveSurface {
            id,
            snapshot: snapshot.clone(),
        });
        debug!(%id, "surface instance created");
        Ok(id)
    }

    fn update(&self, id: ActivityId, snapshot: &TimerSnapshot) -> Result<(), SurfaceError> {
        let mut guard = self.lock_active();
        match guard.as_mut() {
            Some(active) if active.id == id => {
                active.snapshot = snapshot.clone();
                Ok(())
            }
            _ => Err(SurfaceError::InstanceGone(id)),
        }
    }

    fn end(&self, id: ActivityId) {
        let mut guard = self.lock_active();
        if guard.as_ref().is_some_and(|active| active.id == id) {
            *guard = None;
            debug!(%id, "surface instance ended");
        }
    }

    fn query_active(&self) -> Option<TimerSnapshot> {
        self.lock_active().as_ref().map(|active| active.snapshot.clone())
    }
}

// ============================================================================
// RecordingHost
// ============================================================================

/// Lifecycle calls observed by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// A create with the snapshot it carried.
    Create(TimerSnapshot),
    /// An update with the snapshot it carried.
    Update(TimerSnapshot),
    /// An end.
    End,
}

/// Test double that records every lifecycle call it receives.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    active: Mutex<Option<ActiveSurface>>,
}

impl RecordingHost {
    /// Creates an empty recording host with the capability enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every call received so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Counts the creates received so far.
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Create(_)))
            .count()
    }

    /// Silently discards the active instance, simulating host-side loss.
    ///
    /// Subsequent updates addressed to the lost instance fail with
    /// [`SurfaceError::InstanceGone`].
    pub fn drop_active(&self) {
        *self.lock_active() = None;
    }

    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveSurface>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ActivityHost for RecordingHost {
    fn activities_enabled(&self) -> bool {
        true
    }

    fn create(&self, snapshot: &TimerSnapshot) -> Result<ActivityId, SurfaceError> {
        self.record(HostCall::Create(snapshot.clone()));
        let id = ActivityId::new();
        *self.lock_active() = Some(ActiveSurface {
            id,
            snapshot: snapshot.clone(),
        });
        Ok(id)
    }

    fn update(&self, id: ActivityId, snapshot: &TimerSnapshot) -> Result<(), SurfaceError> {
        self.record(HostCall::Update(snapshot.clone()));
        let mut guard = self.lock_active();
        match guard.as_mut() {
            Some(active) if active.id == id => {
                active.snapshot = snapshot.clone();
                Ok(())
            }
            _ => Err(SurfaceError::InstanceGone(id)),
        }
    }

    fn end(&self, id: ActivityId) {
        self.record(HostCall::End);
        let mut guard = self.lock_active();
        if guard.as_ref().is_some_and(|active| active.id == id) {
            *guard = None;
        }
    }

    fn query_active(&self) -> Option<TimerSnapshot> {
        self.lock_active().as_ref().map(|active| active.snapshot.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
