//! Alarm state and the context threaded through every phase handler.
//!
//! `AlarmContext` is the single struct that phase handlers read from and
//! write to.  It holds the mutable [`AlarmState`], the immutable geofence
//! and timing parameters, and the event slot a handler fills when it wants
//! to notify the outside world.

use crate::config::GeoConfig;
use crate::geo::{DistanceMetric, Position, Zone};

/// Monotonic milliseconds since boot.
pub type Millis = u64;

// ---------------------------------------------------------------------------
// Alarm state (the only mutable entity)
// ---------------------------------------------------------------------------

/// Everything the controller remembers between samples.
///
/// Invariant: `active` implies `enabled && !manually_stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmState {
    /// Whether the alarm may sound at all.
    pub enabled: bool,
    /// True while a post-stop cooldown suppresses sounding.
    pub manually_stopped: bool,
    /// Whether the buzzer is currently driven on.
    pub active: bool,
    /// When the last manual/remote stop happened.
    pub stop_timestamp: Millis,
    /// When the buzzer was last switched on.
    pub active_since: Millis,
    /// Start of the current outside-zone dwell period; `None` = not armed.
    pub cycle_anchor: Option<Millis>,
}

impl AlarmState {
    /// State at power-on.
    pub const fn boot() -> Self {
        Self {
            enabled: true,
            manually_stopped: false,
            active: false,
            stop_timestamp: 0,
            active_since: 0,
            cycle_anchor: None,
        }
    }
}

impl Default for AlarmState {
    fn default() -> Self {
        Self::boot()
    }
}

// ---------------------------------------------------------------------------
// Actuator command (written by phase handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Drive signal for the buzzer produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    /// Drive the buzzer on.
    On,
    /// Force the buzzer off (even if it already is).
    Off,
    /// Leave the output as it is.
    Hold,
}

impl ActuatorCommand {
    /// Output level after applying this command to `current`.
    pub const fn resolve(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Hold => current,
        }
    }
}

// ---------------------------------------------------------------------------
// Events raised by the controller
// ---------------------------------------------------------------------------

/// Notifications produced by the controller itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlarmEvent {
    /// The buzzer was switched on while outside the zone.
    Activated { position: Position, at: Millis },
    /// A stop request was applied.
    Stopped { at: Millis },
}

/// `enabled`, `active` and `manually_stopped` read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmSnapshot {
    pub enabled: bool,
    pub active: bool,
    pub manually_stopped: bool,
}

// ---------------------------------------------------------------------------
// Timing parameters
// ---------------------------------------------------------------------------

/// The three durations that drive the cycle/cooldown policy (ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTimings {
    pub cooldown_ms: Millis,
    pub cycle_interval_ms: Millis,
    pub active_duration_ms: Millis,
}

impl From<&GeoConfig> for AlarmTimings {
    fn from(config: &GeoConfig) -> Self {
        Self {
            cooldown_ms: config.cooldown_ms,
            cycle_interval_ms: config.cycle_interval_ms,
            active_duration_ms: config.active_duration_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One (position, now) input, with its distance to the zone centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Position,
    pub now: Millis,
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// AlarmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler.
pub struct AlarmContext {
    /// Mutable alarm state.
    pub state: AlarmState,

    // -- Configuration --
    pub zone: Zone,
    pub metric: DistanceMetric,
    pub timings: AlarmTimings,

    /// Event raised by the last handler, taken by the controller.
    pending: Option<AlarmEvent>,
}

impl AlarmContext {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            state: AlarmState::boot(),
            zone: config.zone,
            metric: config.metric,
            timings: AlarmTimings::from(config),
            pending: None,
        }
    }

    /// Build the sample for `position` at `now`.
    pub fn sample(&self, position: Position, now: Millis) -> Sample {
        Sample {
            position,
            now,
            distance: self.zone.distance_to(position, self.metric),
        }
    }

    /// Queue an event for the current evaluation.  One per sample.
    pub fn raise(&mut self, event: AlarmEvent) {
        debug_assert!(self.pending.is_none(), "one event per sample");
        self.pending = Some(event);
    }

    pub(super) fn take_event(&mut self) -> Option<AlarmEvent> {
        self.pending.take()
    }

    /// Switch the buzzer off in the logical state.
    pub fn force_off(&mut self) {
        self.state.active = false;
    }

    pub fn snapshot(&self) -> AlarmSnapshot {
        AlarmSnapshot {
            enabled: self.state.enabled,
            active: self.state.active,
            manually_stopped: self.state.manually_stopped,
        }
    }
}
