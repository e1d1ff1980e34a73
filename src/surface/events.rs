//! Inbound event channel from the display surface.
//!
//! The surface's buttons (pause/resume/reset) produce [`SurfaceEvent`]s that
//! flow back into the application through a typed, single-consumer channel.
//! The publisher half is handed to the surface host at construction; the
//! subscription half is owned by exactly one driver task. There is no
//! ambient global emitter.

use tokio::sync::mpsc;
use tracing::debug;

use super::host::ActivityId;

// ============================================================================
// SurfaceEvent
// ============================================================================

/// A user interaction performed directly on the display surface.
///
/// Every event carries the id of the surface instance that emitted it, so
/// that events from a torn-down instance can be detected and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceEvent {
    /// The surface instance the interaction happened on.
    pub activity: ActivityId,
    /// What the user did.
    pub kind: SurfaceEventKind,
}

/// The three interactions a surface can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEventKind {
    /// The pause button was pressed.
    ///
    /// The surface may attach the timestamp of the press and the elapsed
    /// value it computed with its own clock; both are in milliseconds.
    Pause {
        /// When the button was pressed, unix-epoch milliseconds.
        timestamp_ms: Option<u64>,
        /// Elapsed running time as computed on the surface side.
        elapsed_ms: Option<u64>,
    },
    /// The resume button was pressed.
    Resume,
    /// The reset button was pressed.
    Reset,
}

// ============================================================================
// Channel
// ============================================================================

/// Sending half, held by the surface host.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl EventPublisher {
    /// Publishes an event to the subscriber.
    ///
    /// Publishing after the subscriber is gone is harmless; the event is
    /// dropped.
    pub fn publish(&self, event: SurfaceEvent) {
        if let Err(unsent) = self.tx.send(event) {
            debug!(event = ?unsent.0, "no subscriber for surface event, dropping");
        }
    }
}

/// Receiving half, consumed by a single driver task.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<SurfaceEvent>,
}

impl EventSubscription {
    /// Waits for the next event.
    ///
    /// Returns `None` once every publisher has been dropped.
    pub async fn recv(&mut self) -> Option<SurfaceEvent> {
        self.rx.recv().await
    }

    /// Takes an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<SurfaceEvent> {
        self.rx.try_recv().ok()
    }
}

/// Creates a connected publisher/subscription pair.
pub fn event_channel() -> (EventPublisher, EventSubscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventPublisher { tx }, EventSubscription { rx })
}

// ============================================================================
// Tests
// ============================================================================
