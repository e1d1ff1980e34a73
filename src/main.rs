//! Stopwatch demo: the in-app timer mirrored into a simulated
//! live-activity surface.
//!
//! The REPL drives both sides of the synchronization protocol:
//! - `play`/`pause`/`reset` act in-app, like the application's own UI
//! - `tap ...` presses buttons on the simulated surface
//! - `bg`/`fg` suspend and resume the app, exercising reconciliation

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use stopwatch::cli::{Cli, Display, ReplCommand};
use stopwatch::clock::{Clock, SystemClock};
use stopwatch::controller::TimerController;
use stopwatch::surface::{event_channel, ActivityHost, InProcessHost, SurfaceBridge};
use stopwatch::sync::{self, AppLifecycle};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Run the REPL
    if let Err(e) = run(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Wires up both replicas and runs the REPL until quit or EOF.
async fn run(cli: Cli) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (publisher, subscription) = event_channel();
    let host = if cli.no_surface {
        Arc::new(InProcessHost::disabled(clock.clone(), publisher))
    } else {
        Arc::new(InProcessHost::new(clock.clone(), publisher))
    };

    let bridge = SurfaceBridge::new(host.clone());
    let controller = Arc::new(Mutex::new(
        TimerController::new(clock, bridge)
            .with_refresh_interval(Duration::from_millis(cli.tick_ms)),
    ));

    let lifecycle = AppLifecycle::new();
    let driver = tokio::spawn(sync::run(
        controller.clone(),
        subscription,
        lifecycle.watch(),
    ));

    Display::show_banner(!cli.no_surface);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                match line.context("failed to read from stdin")? {
                    None => break,
                    Some(line) => match ReplCommand::parse(&line) {
                        Ok(None) => {}
                        Ok(Some(command)) => {
                            if !execute(command, &controller, &host, &lifecycle).await {
                                break;
                            }
                        }
                        Err(unknown) => Display::show_unknown(&unknown),
                    },
                }
            }
        }
    }

    // Dispose: no events or refresh ticks may land after this point.
    driver.abort();
    controller.lock().await.shutdown();

    Ok(())
}

/// Executes one REPL command. Returns false when the REPL should exit.
async fn execute(
    command: ReplCommand,
    controller: &Arc<Mutex<TimerController>>,
    host: &Arc<InProcessHost>,
    lifecycle: &AppLifecycle,
) -> bool {
    match command {
        ReplCommand::Play => controller.lock().await.play(),
        ReplCommand::Pause => controller.lock().await.pause(None, None),
        ReplCommand::Reset => controller.lock().await.reset(),
        ReplCommand::Value => {
            let controller = controller.lock().await;
            Display::show_value(&controller.display_value());
        }
        ReplCommand::Status => {
            let controller = controller.lock().await;
            Display::show_status(
                controller.phase(),
                &controller.display_value(),
                controller.snapshot(),
                host.query_active().as_ref(),
            );
        }
        ReplCommand::TapPause => host.press_pause(),
        ReplCommand::TapResume => host.press_resume(),
        ReplCommand::TapReset => host.press_reset(),
        ReplCommand::Background => {
            lifecycle.set_foreground(false);
            Display::show_lifecycle(false);
        }
        ReplCommand::Foreground => {
            lifecycle.set_foreground(true);
            Display::show_lifecycle(true);
        }
        ReplCommand::Help => Display::show_help(),
        ReplCommand::Quit => return false,
    }

    true
}
