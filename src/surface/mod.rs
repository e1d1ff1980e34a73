//! The live-activity surface boundary.
//!
//! This module contains everything that crosses the process-pair boundary:
//! - `host`: the [`ActivityHost`] contract plus in-process implementations
//! - `bridge`: the outbound command façade
//! - `events`: the inbound typed event channel
//! - `error`: the surface failure taxonomy

pub mod bridge;
pub mod error;
pub mod events;
pub mod host;

pub use bridge::SurfaceBridge;
pub use error::SurfaceError;
pub use events::{event_channel, EventPublisher, EventSubscription, SurfaceEvent, SurfaceEventKind};
pub use host::{ActivityHost, ActivityId, HostCall, InProcessHost, RecordingHost};
