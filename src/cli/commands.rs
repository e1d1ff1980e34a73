//! Command parsing for the interactive demo.
//!
//! Uses clap derive for the binary's flags; REPL lines are parsed by hand
//! into [`ReplCommand`]s.

use clap::Parser;

// ============================================================================
// CLI flags
// ============================================================================

/// Stopwatch demo: an in-app timer mirrored into a simulated
/// live-activity surface
#[derive(Parser, Debug)]
#[command(
    name = "stopwatch",
    version,
    about = "Interactive stopwatch with a mirrored live-activity surface",
    long_about = "Drives the stopwatch synchronization core from a line-based REPL.\n\
                  In-app actions (play/pause/reset) and simulated surface button\n\
                  taps flow through the same bidirectional protocol as in the\n\
                  real app; `bg`/`fg` exercise the reconciliation path."
)]
pub struct Cli {
    /// Display refresh interval in milliseconds
    #[arg(
        long,
        default_value = "32",
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    pub tick_ms: u64,

    /// Simulate the live-activity capability being disabled by the host
    #[arg(long)]
    pub no_surface: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// ReplCommand
// ============================================================================

/// One line of REPL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    /// Start or resume the timer.
    Play,
    /// Pause the timer.
    Pause,
    /// Reset the timer and end the surface.
    Reset,
    /// Print the current display value.
    Value,
    /// Print phase, value, and both replicas.
    Status,
    /// Simulated tap on the surface's pause button.
    TapPause,
    /// Simulated tap on the surface's resume button.
    TapResume,
    /// Simulated tap on the surface's reset button.
    TapReset,
    /// Simulate the app moving to the background.
    Background,
    /// Simulate the app returning to the foreground.
    Foreground,
    /// Print the command list.
    Help,
    /// Exit.
    Quit,
}

impl ReplCommand {
    /// Parses a REPL line.
    ///
    /// Returns `Ok(None)` for blank lines and `Err` with the offending
    /// word for anything unrecognized.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };

        let command = match (head, words.next()) {
            ("play" | "start" | "resume", None) => Self::Play,
            ("pause", None) => Self::Pause,
            ("reset", None) => Self::Reset,
            ("value", None) => Self::Value,
            ("status", None) => Self::Status,
            ("tap", Some("pause")) => Self::TapPause,
            ("tap", Some("resume")) => Self::TapResume,
            ("tap", Some("reset")) => Self::TapReset,
            ("bg" | "background", None) => Self::Background,
            ("fg" | "foreground", None) => Self::Foreground,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => return Err(line.trim().to_string()),
        };

        if words.next().is_some() {
            return Err(line.trim().to_string());
        }

        Ok(Some(command))
    }
}

// ============================================================================
// Tests
// ============================================================================
