//! Mock hardware and sinks for integration tests.
//!
//! Records every buzzer write and every emitted event so tests can assert
//! on the full history without touching real GPIO.

use geoguard::app::events::AppEvent;
use geoguard::app::ports::{ActuatorPort, EventSink};
use geoguard::error::ActuatorError;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Every level written, in order (including failed attempts).
    pub writes: Vec<bool>,
    /// When set, every write fails and the pin keeps its level.
    pub fail_writes: bool,
    level: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            fail_writes: false,
            level: false,
        }
    }

    pub fn last_write(&self) -> Option<bool> {
        self.writes.last().copied()
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_buzzer(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.writes.push(on);
        if self.fail_writes {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.level = on;
        Ok(())
    }

    fn is_buzzer_on(&self) -> bool {
        self.level
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlarmActivated { .. }))
            .count()
    }

    pub fn position_updates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::PositionUpdate { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
