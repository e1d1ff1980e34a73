//! Output formatting for the interactive demo.

use crate::controller::TimerPhase;
use crate::types::TimerSnapshot;

// ============================================================================
// Display
// ============================================================================

/// Println helpers for REPL output.
pub struct Display;

impl Display {
    /// Shows the prompt banner once at startup.
    pub fn show_banner(surface_enabled: bool) {
        println!("stopwatch demo, type `help` for commands");
        if !surface_enabled {
            println!("(live-activity capability disabled: running without the mirror)");
        }
    }

    /// Shows the current display value.
    pub fn show_value(value: &str) {
        println!("{}", value);
    }

    /// Shows phase, value, and both replicas.
    pub fn show_status(phase: TimerPhase, value: &str, local: &TimerSnapshot, surface: Option<&TimerSnapshot>) {
        println!("state: {}", phase.as_str());
        println!("value: {}", value);
        println!("local: {}", Self::snapshot_json(local));
        match surface {
            Some(surface) => println!("surface: {}", Self::snapshot_json(surface)),
            None => println!("surface: none"),
        }
    }

    /// Shows a confirmation for a lifecycle flip.
    pub fn show_lifecycle(foreground: bool) {
        if foreground {
            println!("app foregrounded (reconciling with surface)");
        } else {
            println!("app backgrounded (event handling suspended)");
        }
    }

    /// Shows the command list.
    pub fn show_help() {
        println!("commands:");
        println!("  play | pause | reset     in-app timer controls");
        println!("  value                    print the formatted elapsed time");
        println!("  status                   print state and both replicas");
        println!("  tap pause|resume|reset   press a button on the surface");
        println!("  bg | fg                  background / foreground the app");
        println!("  help | quit");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Shows the rejection for an unrecognized REPL line.
    pub fn show_unknown(line: &str) {
        eprintln!("unknown command: {} (try `help`)", line);
    }

    fn snapshot_json(snapshot: &TimerSnapshot) -> String {
        serde_json::to_string(snapshot).unwrap_or_else(|_| "<unserializable>".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
