//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`AlarmController`] built from the startup config.  It
//! exposes a hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//! PositionSource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                    │       AppService       │
//!   ActuatorPort ◀── │    AlarmController     │ ◀── AppCommand
//!                    └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::GeoConfig;
use crate::fsm::context::{ActuatorCommand, AlarmEvent, AlarmSnapshot, AlarmState, Millis};
use crate::fsm::{AlarmController, Evaluation};
use crate::geo::Position;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, EventSink, FixPoll, PositionSource};

/// Upper bound on fixes handled by one [`AppService::poll_fixes`] call, so
/// a chatty receiver cannot starve command handling.
pub const MAX_FIXES_PER_POLL: usize = 16;

/// Upper bound on source reads (kept or rejected) per
/// [`AppService::poll_fixes`] call.  Well above the fix queue depth, so a
/// run of rejected fixes never strands good ones behind it.
pub const MAX_READS_PER_POLL: usize = 4 * MAX_FIXES_PER_POLL;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    controller: AlarmController,
    fix_count: u64,
}

impl AppService {
    /// Construct the service from an already-validated configuration.
    pub fn new(config: GeoConfig) -> Self {
        let controller = AlarmController::new(&config);
        info!(
            "AppService ready: centre=({:.6},{:.6}) radius={}{} cycle={}ms active={}ms cooldown={}ms",
            config.zone.center.latitude,
            config.zone.center.longitude,
            config.zone.radius,
            config.metric.unit(),
            config.cycle_interval_ms,
            config.active_duration_ms,
            config.cooldown_ms
        );
        Self {
            controller,
            fix_count: 0,
        }
    }

    // ── Per-fix orchestration ─────────────────────────────────

    /// Handle one position fix: broadcast → evaluate → actuate → notify.
    ///
    /// The position broadcast carries the state in force when the fix
    /// arrived, i.e. before this evaluation.
    pub fn on_fix(
        &mut self,
        position: Position,
        now: Millis,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Evaluation {
        self.fix_count += 1;

        // 1. Position broadcast
        sink.emit(&AppEvent::PositionUpdate {
            position,
            snapshot: self.controller.snapshot(),
        });

        // 2. Alarm evaluation (pure state logic)
        let eval = self.controller.evaluate(position, now);

        // 3. Drive the buzzer
        self.apply_actuator(eval.command, hw);

        // 4. Notify
        if let Some(AlarmEvent::Activated { position, at }) = eval.event {
            sink.emit(&AppEvent::AlarmActivated { position, at });
        }

        eval
    }

    /// Drain up to [`MAX_FIXES_PER_POLL`] fixes from `source`, stamping each
    /// with the clock at the moment it is handled.  Rejected fixes are
    /// skipped without ending the drain.  Returns the number of fixes
    /// processed.
    pub fn poll_fixes(
        &mut self,
        source: &mut impl PositionSource,
        clock: &impl ClockPort,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut handled = 0;
        for _ in 0..MAX_READS_PER_POLL {
            match source.poll_fix() {
                FixPoll::Fix(position) => {
                    self.on_fix(position, clock.now_ms(), hw, sink);
                    handled += 1;
                    if handled == MAX_FIXES_PER_POLL {
                        break;
                    }
                }
                FixPoll::Rejected => {}
                FixPoll::Empty => break,
            }
        }
        handled
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (remote chat, local socket).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Stop { source, at } => {
                let event = self.controller.stop(at);
                self.apply_actuator(ActuatorCommand::Off, hw);
                if let AlarmEvent::Stopped { at } = event {
                    info!("Stop via {} applied at {}ms", source.label(), at);
                    sink.emit(&AppEvent::AlarmStopped { source, at });
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> AlarmSnapshot {
        self.controller.snapshot()
    }

    pub fn alarm_state(&self) -> &AlarmState {
        self.controller.state()
    }

    /// Total fixes evaluated since startup.
    pub fn fix_count(&self) -> u64 {
        self.fix_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the controller's command into a port call.  Failures are
    /// logged and not retried.
    fn apply_actuator(&self, cmd: ActuatorCommand, hw: &mut impl ActuatorPort) {
        let level = match cmd {
            ActuatorCommand::Hold => return,
            ActuatorCommand::On => true,
            ActuatorCommand::Off => false,
        };
        if let Err(e) = hw.set_buzzer(level) {
            warn!(
                "Buzzer write ({}) failed: {}; output may disagree with alarm state",
                if level { "on" } else { "off" },
                e
            );
        }
    }
}
