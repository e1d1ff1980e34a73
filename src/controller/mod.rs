//! In-app timer control.
//!
//! - `timer`: the Idle/Running/Paused state machine and display formatting

pub mod timer;

pub use timer::{format_elapsed, TimerController, TimerPhase, DEFAULT_REFRESH_INTERVAL};
