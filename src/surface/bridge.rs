//! Command façade from the controller to the display surface.
//!
//! All commands are best-effort: the controller's local state has already
//! committed by the time a command is sent, and a failing or disabled
//! surface never rolls a transition back. Failures are logged and
//! swallowed here.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::types::TimerSnapshot;

use super::host::{ActivityHost, ActivityId};

// ============================================================================
// SurfaceBridge
// ============================================================================

/// Sends lifecycle commands to the surface and remembers which instance is
/// the live one.
pub struct SurfaceBridge {
    host: Arc<dyn ActivityHost>,
    current: Option<ActivityId>,
}

impl SurfaceBridge {
    /// Creates a bridge over the given host.
    pub fn new(host: Arc<dyn ActivityHost>) -> Self {
        Self {
            host,
            current: None,
        }
    }

    /// Creates a surface instance showing a freshly started timer.
    ///
    /// Silent no-op when the capability is disabled; creation failures are
    /// swallowed and the timer runs without its mirror.
    pub fn start(&mut self, snapshot: &TimerSnapshot) {
        if !self.host.activities_enabled() {
            debug!("live-activity capability disabled, skipping start");
            return;
        }

        match self.host.create(snapshot) {
            Ok(id) => self.current = Some(id),
            Err(e) => warn!("failed to create surface instance: {}", e),
        }
    }

    /// Updates the surface to the running visual.
    pub fn resume(&mut self, snapshot: &TimerSnapshot) {
        self.update(snapshot);
    }

    /// Updates the surface to the paused visual with a frozen value.
    pub fn pause(&mut self, snapshot: &TimerSnapshot) {
        self.update(snapshot);
    }

    /// Ends the surface instance entirely. Idempotent.
    pub fn stop(&mut self) {
        if let Some(id) = self.current.take() {
            self.host.end(id);
        }
    }

    /// Pulls the surface's current replica, for reconciliation.
    pub fn query(&self) -> Option<TimerSnapshot> {
        self.host.query_active()
    }

    /// Whether `id` names the instance this bridge currently manages.
    ///
    /// Events from any other instance are stale and must be discarded.
    pub fn is_current(&self, id: ActivityId) -> bool {
        self.current == Some(id)
    }

    /// The instance this bridge currently manages, if any.
    pub fn current(&self) -> Option<ActivityId> {
        self.current
    }

    fn update(&mut self, snapshot: &TimerSnapshot) {
        let Some(id) = self.current else {
            debug!("no surface instance, skipping update");
            return;
        };

        if let Err(e) = self.host.update(id, snapshot) {
            warn!("failed to update surface instance: {}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
