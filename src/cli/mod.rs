//! CLI module for the stopwatch demo binary.
//!
//! This module contains:
//! - `commands`: binary flags and REPL line parsing
//! - `display`: formatted REPL output

pub mod commands;
pub mod display;

pub use commands::{Cli, ReplCommand};
pub use display::Display;
