//! Integration tests for the AppService → AlarmController → buzzer pipeline.
//!
//! These run on the host (x86_64) and verify the per-fix orchestration
//! (broadcast, evaluate, actuate, notify) against recording mocks.

use super::mock_hw::{MockHardware, RecordingSink};

use geoguard::app::commands::{AppCommand, StopSource};
use geoguard::app::events::AppEvent;
use geoguard::app::service::AppService;
use geoguard::config::GeoConfig;
use geoguard::fsm::context::ActuatorCommand;
use geoguard::geo::Position;

const INSIDE: Position = Position::new(1.8500, 103.0830);
const OUTSIDE: Position = Position::new(1.9000, 103.0830);

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    (
        AppService::new(GeoConfig::default()),
        MockHardware::new(),
        RecordingSink::new(),
    )
}

// ── Concrete campus scenario ─────────────────────────────────

#[test]
fn campus_scenario_drives_the_buzzer() {
    let (mut app, mut hw, mut sink) = make_app();

    let steps: [(u64, bool); 5] = [
        (0, false),
        (300_000, true),
        (359_999, true),
        (360_001, false),
        (660_000, true),
    ];
    for (t, expect_on) in steps {
        app.on_fix(OUTSIDE, t, &mut hw, &mut sink);
        assert_eq!(hw.level(), expect_on, "buzzer level wrong at t={t}");
        assert_eq!(app.snapshot().active, expect_on, "logical state wrong at t={t}");
    }

    // Writes only happen on ON/OFF, never on HOLD.
    assert_eq!(hw.writes, vec![true, false, true]);
    assert_eq!(sink.activations(), 2);
    assert_eq!(sink.position_updates(), 5);
    assert_eq!(app.fix_count(), 5);
    assert_eq!(app.alarm_state().active_since, 660_000);
}

#[test]
fn every_fix_is_broadcast_before_evaluation() {
    let (mut app, mut hw, mut sink) = make_app();
    app.on_fix(OUTSIDE, 0, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_000, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_500, &mut hw, &mut sink);

    // The activating fix reports the pre-activation state; the next one
    // sees the buzzer on.
    let actives: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PositionUpdate { snapshot, .. } => Some(snapshot.active),
            _ => None,
        })
        .collect();
    assert_eq!(actives, vec![false, false, true]);

    assert!(matches!(sink.events[1], AppEvent::PositionUpdate { .. }));
    assert!(matches!(
        sink.events[2],
        AppEvent::AlarmActivated { at: 300_000, .. }
    ));
}

// ── Zone entry ───────────────────────────────────────────────

#[test]
fn returning_inside_silences_and_resets() {
    let (mut app, mut hw, mut sink) = make_app();
    app.on_fix(OUTSIDE, 0, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_000, &mut hw, &mut sink);
    assert!(hw.level());

    let eval = app.on_fix(INSIDE, 310_000, &mut hw, &mut sink);
    assert_eq!(eval.command, ActuatorCommand::Off);
    assert!(!hw.level());
    let s = app.alarm_state();
    assert!(s.enabled && !s.manually_stopped && !s.active);
    assert_eq!(s.cycle_anchor, None);
}

#[test]
fn inside_fixes_keep_forcing_low() {
    let (mut app, mut hw, mut sink) = make_app();
    for t in 0..3 {
        app.on_fix(INSIDE, t * 1_000, &mut hw, &mut sink);
    }
    assert_eq!(hw.writes, vec![false, false, false]);
    assert_eq!(sink.activations(), 0);
}

// ── Stop / cooldown ──────────────────────────────────────────

#[test]
fn stop_then_cooldown_then_fresh_cycle() {
    let (mut app, mut hw, mut sink) = make_app();
    app.on_fix(OUTSIDE, 0, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_000, &mut hw, &mut sink);
    app.handle_command(
        AppCommand::Stop {
            source: StopSource::RemoteChat,
            at: 320_000,
        },
        &mut hw,
        &mut sink,
    );
    assert!(!hw.level());
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::AlarmStopped {
            source: StopSource::RemoteChat,
            at: 320_000
        })
    );

    // Suppressed for the whole window.
    for t in [320_001, 500_000, 619_999] {
        app.on_fix(OUTSIDE, t, &mut hw, &mut sink);
        assert!(!hw.level());
        assert!(app.snapshot().manually_stopped);
    }

    // Expiry re-enables without sounding.
    app.on_fix(OUTSIDE, 620_000, &mut hw, &mut sink);
    assert!(!hw.level());
    assert!(app.snapshot().enabled);
    assert!(!app.snapshot().manually_stopped);

    // Fresh dwell from the next sample.
    app.on_fix(OUTSIDE, 621_000, &mut hw, &mut sink);
    assert_eq!(app.alarm_state().cycle_anchor, Some(621_000));
    app.on_fix(OUTSIDE, 920_999, &mut hw, &mut sink);
    assert!(!hw.level());
    app.on_fix(OUTSIDE, 921_000, &mut hw, &mut sink);
    assert!(hw.level());
}

#[test]
fn stop_while_idle_still_starts_cooldown() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(
        AppCommand::Stop {
            source: StopSource::LocalSocket,
            at: 5,
        },
        &mut hw,
        &mut sink,
    );
    assert_eq!(hw.writes, vec![false]);
    let snap = app.snapshot();
    assert!(!snap.enabled && snap.manually_stopped && !snap.active);
}

// ── Actuator failure ─────────────────────────────────────────

#[test]
fn failed_pin_write_is_not_rolled_back() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.fail_writes = true;
    app.on_fix(OUTSIDE, 0, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_000, &mut hw, &mut sink);

    assert_eq!(hw.writes, vec![true]);
    assert!(!hw.level(), "pin never accepted the write");
    assert!(app.snapshot().active, "logical state is kept");
    assert_eq!(sink.activations(), 1, "notification still goes out");

    // Not retried on the next HOLD sample either.
    app.on_fix(OUTSIDE, 300_500, &mut hw, &mut sink);
    assert_eq!(hw.writes.len(), 1);
}
