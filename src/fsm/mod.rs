//! Geofence alarm controller: a derived-phase, function-pointer state machine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  PhaseTable                                          │
//! │  ┌──────────────┬─────────────────────────────────┐  │
//! │  │ AlarmPhase   │ on_sample                       │  │
//! │  ├──────────────┼─────────────────────────────────┤  │
//! │  │ InsideZone   │ fn(ctx, sample) -> Command      │  │
//! │  │ Cooldown     │ fn(ctx, sample) -> Command      │  │
//! │  │ ArmedWaiting │ fn(ctx, sample) -> Command      │  │
//! │  │ Sounding     │ fn(ctx, sample) -> Command      │  │
//! │  └──────────────┴─────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The phase is never stored.  Each sample is classified from the current
//! [`AlarmState`] and the distance to the zone centre, in priority order:
//!
//! 1. inside the zone → `InsideZone`
//! 2. manually stopped → `Cooldown`
//! 3. buzzer on → `Sounding`
//! 4. otherwise → `ArmedWaiting`
//!
//! and the matching handler runs to completion.  [`AlarmController::evaluate`]
//! and [`AlarmController::stop`] are the only mutators of the state.

pub mod context;
pub mod states;

use context::{ActuatorCommand, AlarmContext, AlarmEvent, AlarmSnapshot, AlarmState, Millis, Sample};
use log::info;

use crate::config::GeoConfig;
use crate::geo::Position;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Derived alarm phases.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlarmPhase {
    InsideZone = 0,
    Cooldown = 1,
    ArmedWaiting = 2,
    Sounding = 3,
}

impl AlarmPhase {
    /// Total number of phases, used to size the table array.
    pub const COUNT: usize = 4;
}

// ---------------------------------------------------------------------------
// Phase descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Per-sample handler.  Returns the actuator command for this sample.
pub type PhaseSampleFn = fn(&mut AlarmContext, &Sample) -> ActuatorCommand;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: AlarmPhase,
    pub name: &'static str,
    pub on_sample: PhaseSampleFn,
}

// ---------------------------------------------------------------------------
// Evaluation result
// ---------------------------------------------------------------------------

/// Outcome of one [`AlarmController::evaluate`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Phase the sample was classified into (before its handler ran).
    pub phase: AlarmPhase,
    pub command: ActuatorCommand,
    /// At most one event per sample.
    pub event: Option<AlarmEvent>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the alarm state and the phase table.
pub struct AlarmController {
    table: [PhaseDescriptor; AlarmPhase::COUNT],
    ctx: AlarmContext,
    /// Phase of the previous sample, for transition logging only.
    last_phase: Option<AlarmPhase>,
}

impl AlarmController {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            table: states::build_phase_table(),
            ctx: AlarmContext::new(config),
            last_phase: None,
        }
    }

    /// Feed one position fix taken at monotonic time `now`.
    pub fn evaluate(&mut self, position: Position, now: Millis) -> Evaluation {
        let sample = self.ctx.sample(position, now);
        let phase = self.classify(&sample);

        if self.last_phase != Some(phase) {
            info!(
                "Alarm phase: {} -> {} (dist={:.6}{})",
                self.last_phase.map_or("Boot", |p| self.table[p as usize].name),
                self.table[phase as usize].name,
                sample.distance,
                self.ctx.metric.unit()
            );
            self.last_phase = Some(phase);
        }

        let command = (self.table[phase as usize].on_sample)(&mut self.ctx, &sample);
        Evaluation {
            phase,
            command,
            event: self.ctx.take_event(),
        }
    }

    /// Manual override from either command channel.
    ///
    /// Forces the buzzer off and (re)starts the cooldown window at `now`.
    /// Calling it again while stopped only refreshes the timestamp.
    pub fn stop(&mut self, now: Millis) -> AlarmEvent {
        let state = &mut self.ctx.state;
        state.enabled = false;
        state.manually_stopped = true;
        state.stop_timestamp = now;
        self.ctx.force_off();
        info!(
            "Alarm stopped at {}ms, cooldown {}ms",
            now, self.ctx.timings.cooldown_ms
        );
        AlarmEvent::Stopped { at: now }
    }

    /// Phase a fix at `position` would be classified into right now.
    pub fn phase_at(&self, position: Position) -> AlarmPhase {
        self.classify(&self.ctx.sample(position, 0))
    }

    pub fn state(&self) -> &AlarmState {
        &self.ctx.state
    }

    /// Whether the logical buzzer output is on.
    pub fn actuator_on(&self) -> bool {
        self.ctx.state.active
    }

    pub fn snapshot(&self) -> AlarmSnapshot {
        self.ctx.snapshot()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn classify(&self, sample: &Sample) -> AlarmPhase {
        let s = &self.ctx.state;
        if sample.distance <= self.ctx.zone.radius {
            AlarmPhase::InsideZone
        } else if s.manually_stopped {
            AlarmPhase::Cooldown
        } else if s.active {
            AlarmPhase::Sounding
        } else {
            AlarmPhase::ArmedWaiting
        }
    }
}
