//! End-to-end tests for the controller/surface synchronization protocol.
//!
//! These cover the observable properties of the whole wiring: elapsed-time
//! accumulation across pause/resume cycles, the reset contract, redundant
//! play handling, both reconciliation directions, the backgrounded-tap
//! scenario, and stale-event discard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

use stopwatch::clock::ManualClock;
use stopwatch::controller::{TimerController, TimerPhase};
use stopwatch::surface::{
    event_channel, ActivityHost, InProcessHost, RecordingHost, SurfaceBridge,
};
use stopwatch::sync::{self, AppLifecycle};

// ============================================================================
// Test Helpers
// ============================================================================

/// The full wiring: controller + bridge over a simulated host + driver.
struct World {
    controller: Arc<Mutex<TimerController>>,
    host: Arc<InProcessHost>,
    clock: Arc<ManualClock>,
    lifecycle: AppLifecycle,
    driver: tokio::task::JoinHandle<()>,
}

impl World {
    fn spawn() -> Self {
        let clock = Arc::new(ManualClock::new(0));
        let (publisher, subscription) = event_channel();
        let host = Arc::new(InProcessHost::new(clock.clone(), publisher));
        let controller = Arc::new(Mutex::new(TimerController::new(
            clock.clone(),
            SurfaceBridge::new(host.clone()),
        )));
        let lifecycle = AppLifecycle::new();
        let driver = tokio::spawn(sync::run(
            controller.clone(),
            subscription,
            lifecycle.watch(),
        ));

        Self {
            controller,
            host,
            clock,
            lifecycle,
            driver,
        }
    }

    async fn phase(&self) -> TimerPhase {
        self.controller.lock().await.phase()
    }

    async fn value(&self) -> String {
        self.controller.lock().await.display_value()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Gives the driver task a moment to drain delivered events.
async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

// ============================================================================
// Accumulation and reset
// ============================================================================

#[tokio::test]
async fn test_paused_value_is_sum_of_running_intervals() {
    let world = World::spawn();

    // Three running intervals: 1s, 2s, 3s, with long gaps between.
    world.controller.lock().await.play();
    world.clock.set(1_000);
    world.controller.lock().await.pause(None, None);

    world.clock.set(100_000);
    world.controller.lock().await.play();
    world.clock.set(102_000);
    world.controller.lock().await.pause(None, None);

    world.clock.set(500_000);
    world.controller.lock().await.play();
    world.clock.set(503_000);
    world.controller.lock().await.pause(None, None);

    assert_eq!(world.value().await, "00:06.0");
}

#[tokio::test]
async fn test_scenario_one_minute_five_point_three() {
    let world = World::spawn();

    world.controller.lock().await.play();
    world.clock.set(65_300);
    world.controller.lock().await.pause(None, None);
    assert_eq!(world.value().await, "01:05.3");

    world.controller.lock().await.reset();
    assert_eq!(world.value().await, "00:00.0");
    assert_eq!(world.phase().await, TimerPhase::Idle);
}

#[tokio::test]
async fn test_reset_returns_to_idle_from_every_phase() {
    let world = World::spawn();

    // From idle.
    world.controller.lock().await.reset();
    assert_eq!(world.phase().await, TimerPhase::Idle);

    // From running.
    world.controller.lock().await.play();
    world.clock.set(5_000);
    world.controller.lock().await.reset();
    assert_eq!(world.phase().await, TimerPhase::Idle);
    assert_eq!(world.value().await, "00:00.0");
    assert!(world.host.query_active().is_none());

    // From paused.
    world.controller.lock().await.play();
    world.clock.advance(3_000);
    world.controller.lock().await.pause(None, None);
    world.controller.lock().await.reset();
    assert_eq!(world.phase().await, TimerPhase::Idle);
    assert_eq!(world.value().await, "00:00.0");
}

#[tokio::test]
async fn test_redundant_play_issues_no_second_start() {
    let clock = Arc::new(ManualClock::new(0));
    let host = Arc::new(RecordingHost::new());
    let mut controller = TimerController::new(clock.clone(), SurfaceBridge::new(host.clone()));

    controller.play();
    clock.set(4_000);
    controller.play();
    controller.play();

    assert_eq!(host.create_count(), 1);
    assert_eq!(controller.snapshot().start_time_ms, Some(0));
    controller.shutdown();
}

// ============================================================================
// Surface-initiated actions
// ============================================================================

#[tokio::test]
async fn test_surface_pause_resume_round() {
    let world = World::spawn();

    world.controller.lock().await.play();
    world.clock.set(2_000);
    world.host.press_pause();
    settle().await;
    assert_eq!(world.phase().await, TimerPhase::Paused);
    assert_eq!(world.value().await, "00:02.0");

    world.clock.set(10_000);
    world.host.press_resume();
    settle().await;
    assert_eq!(world.phase().await, TimerPhase::Running);

    // The 8s pause gap never shows up in the elapsed value.
    world.clock.set(13_000);
    world.controller.lock().await.pause(None, None);
    assert_eq!(world.value().await, "00:05.0");
}

#[tokio::test]
async fn test_surface_reset_tears_everything_down() {
    let world = World::spawn();

    world.controller.lock().await.play();
    world.clock.set(30_000);
    world.host.press_reset();
    settle().await;

    assert_eq!(world.phase().await, TimerPhase::Idle);
    assert_eq!(world.value().await, "00:00.0");
    // The controller's stop command removed the surface instance.
    assert!(world.host.query_active().is_none());
}

#[tokio::test]
async fn test_stale_pause_event_after_reset_is_discarded() {
    let world = World::spawn();

    world.controller.lock().await.play();

    // The app resets while the tap's event is still in flight.
    world.lifecycle.set_foreground(false);
    settle().await;
    world.clock.set(10_000);
    world.host.press_pause();
    world.controller.lock().await.reset();

    world.lifecycle.set_foreground(true);
    settle().await;

    // The queued event referenced the torn-down instance.
    assert_eq!(world.phase().await, TimerPhase::Idle);
    assert_eq!(world.value().await, "00:00.0");
}

// ============================================================================
// Reconciliation on foreground
// ============================================================================

#[tokio::test]
async fn test_backgrounded_pause_tap_reconciles_to_paused() {
    let world = World::spawn();

    // play() at t=0, then the app is suspended.
    world.controller.lock().await.play();
    world.lifecycle.set_foreground(false);
    settle().await;

    // Pause tapped on the surface at t=10s with elapsed=10s.
    world.clock.set(10_000);
    world.host.press_pause();
    settle().await;
    assert_eq!(world.phase().await, TimerPhase::Running);

    // Foregrounding reconciles before the queued event is drained.
    world.clock.set(15_000);
    world.lifecycle.set_foreground(true);
    settle().await;

    assert_eq!(world.phase().await, TimerPhase::Paused);
    assert_eq!(world.value().await, "00:10.0");
}

#[tokio::test]
async fn test_backgrounded_resume_tap_reconciles_to_running() {
    let world = World::spawn();

    world.controller.lock().await.play();
    world.clock.set(2_000);
    world.controller.lock().await.pause(None, None);

    world.lifecycle.set_foreground(false);
    settle().await;

    // Resume tapped at t=30s while suspended.
    world.clock.set(30_000);
    world.host.press_resume();
    settle().await;
    assert_eq!(world.phase().await, TimerPhase::Paused);

    world.clock.set(31_000);
    world.lifecycle.set_foreground(true);
    settle().await;

    assert_eq!(world.phase().await, TimerPhase::Running);
    // The controller adopted the surface's shifted start time.
    assert_eq!(
        world.controller.lock().await.snapshot().start_time_ms,
        world.host.query_active().unwrap().start_time_ms,
    );
}

#[tokio::test]
async fn test_foreground_without_surface_keeps_local_state() {
    let clock = Arc::new(ManualClock::new(0));
    let (publisher, subscription) = event_channel();
    let host = Arc::new(InProcessHost::disabled(clock.clone(), publisher));
    let controller = Arc::new(Mutex::new(TimerController::new(
        clock.clone(),
        SurfaceBridge::new(host.clone()),
    )));
    let lifecycle = AppLifecycle::new();
    let driver = tokio::spawn(sync::run(
        controller.clone(),
        subscription,
        lifecycle.watch(),
    ));

    // Capability disabled: no surface ever exists, timer works anyway.
    controller.lock().await.play();
    clock.set(7_500);

    lifecycle.set_foreground(false);
    settle().await;
    lifecycle.set_foreground(true);
    settle().await;

    let guard = controller.lock().await;
    assert_eq!(guard.phase(), TimerPhase::Running);
    assert_eq!(guard.display_value(), "00:07.5");
    drop(guard);

    driver.abort();
}

#[tokio::test]
async fn test_reconciliation_adopts_external_start_over_local() {
    let clock = Arc::new(ManualClock::new(0));
    let (publisher, _subscription) = event_channel();
    let host = Arc::new(InProcessHost::new(clock.clone(), publisher));

    // A surface instance exists with a start time the controller never saw.
    let mut remote = stopwatch::TimerSnapshot::default();
    remote.start_at(40_000);
    host.create(&remote).unwrap();

    let mut controller = TimerController::new(clock.clone(), SurfaceBridge::new(host));
    clock.set(60_000);
    controller.resync();

    assert_eq!(controller.phase(), TimerPhase::Running);
    assert_eq!(controller.snapshot().start_time_ms, Some(40_000));
    assert_eq!(controller.display_value(), "00:20.0");
    controller.shutdown();
}

// ============================================================================
// Degraded operation
// ============================================================================

#[tokio::test]
async fn test_timer_unaffected_by_disabled_capability() {
    let clock = Arc::new(ManualClock::new(0));
    let (publisher, _subscription) = event_channel();
    let host = Arc::new(InProcessHost::disabled(clock.clone(), publisher));
    let mut controller = TimerController::new(clock.clone(), SurfaceBridge::new(host.clone()));

    controller.play();
    clock.set(65_300);
    controller.pause(None, None);

    assert_eq!(controller.display_value(), "01:05.3");
    assert!(host.query_active().is_none());
    controller.shutdown();
}

#[tokio::test]
async fn test_commands_never_roll_back_on_host_loss() {
    let clock = Arc::new(ManualClock::new(0));
    let host = Arc::new(RecordingHost::new());
    let mut controller = TimerController::new(clock.clone(), SurfaceBridge::new(host.clone()));

    controller.play();
    // The host loses the instance without telling anyone; the next update
    // the bridge sends will fail.
    host.drop_active();

    clock.set(3_000);
    controller.pause(None, None);

    // Local state committed regardless of the failed mirror update.
    assert_eq!(controller.phase(), TimerPhase::Paused);
    assert_eq!(controller.display_value(), "00:03.0");
    controller.shutdown();
}
