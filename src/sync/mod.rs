//! Keeping the two replicas consistent.
//!
//! A single driver task serializes every inbound mutation onto the
//! controller's execution context: surface events are applied one at a
//! time under the controller lock, and when the hosting app returns to the
//! foreground the controller is reconciled against the surface replica
//! before any queued event is drained. While backgrounded nothing is
//! applied; a suspended app executes none of its own code.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::controller::TimerController;
use crate::surface::EventSubscription;

// ============================================================================
// AppLifecycle
// ============================================================================

/// The host's foreground/background signal.
///
/// The hosting platform flips this; the sync driver is its only consumer.
pub struct AppLifecycle {
    tx: watch::Sender<bool>,
}

impl AppLifecycle {
    /// Creates the signal in the foreground state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx }
    }

    /// Publishes a foreground/background transition.
    pub fn set_foreground(&self, foreground: bool) {
        self.tx.send_replace(foreground);
    }

    /// Subscribes to the signal.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for AppLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Runs the sync driver until the event channel or lifecycle signal closes.
///
/// Spawn this as a task and abort it to dispose: after the abort no event
/// can reach the controller.
pub async fn run(
    controller: Arc<Mutex<TimerController>>,
    mut events: EventSubscription,
    mut foreground: watch::Receiver<bool>,
) {
    let mut is_foreground = *foreground.borrow();

    loop {
        tokio::select! {
            changed = foreground.changed() => {
                if changed.is_err() {
                    return;
                }
                let now_foreground = *foreground.borrow();
                if now_foreground && !is_foreground {
                    // Reconcile before draining anything that queued up
                    // while we were suspended.
                    info!("foregrounded, reconciling with surface state");
                    controller.lock().await.resync();
                }
                is_foreground = now_foreground;
            }
            event = events.recv(), if is_foreground => {
                match event {
                    Some(event) => controller.lock().await.apply_event(event),
                    None => return,
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
