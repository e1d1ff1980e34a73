//! Stopwatch Synchronization Core
//!
//! This library keeps an in-app stopwatch and an out-of-process
//! live-activity display surface consistent. It includes:
//! - The shared `TimerSnapshot` contract both replicas speak
//! - The `TimerController` state machine with its display refresh feed
//! - The `SurfaceBridge` command façade and `ActivityHost` boundary
//! - The typed inbound event channel for surface button presses
//! - The sync driver: event marshaling plus reconciliation on foreground
//! - CLI plumbing for the interactive demo binary
//!
//! Unit convention: all timestamps and elapsed values crossing the
//! command/event/query channel are `u64` milliseconds.

pub mod cli;
pub mod clock;
pub mod controller;
pub mod surface;
pub mod sync;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{format_elapsed, TimerController, TimerPhase};
pub use surface::{
    event_channel, ActivityHost, ActivityId, EventPublisher, EventSubscription, InProcessHost,
    RecordingHost, SurfaceBridge, SurfaceError, SurfaceEvent, SurfaceEventKind,
};
pub use sync::AppLifecycle;
pub use types::TimerSnapshot;
