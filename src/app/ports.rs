//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (position receiver, buzzer, event sinks, config storage,
//! clock) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the alarm core never touches hardware
//! directly.

use crate::config::GeoConfig;
use crate::error::ActuatorError;
use crate::fsm::context::Millis;
use crate::geo::Position;

// ───────────────────────────────────────────────────────────────
// Position port (driven adapter: receiver → domain)
// ───────────────────────────────────────────────────────────────

/// Outcome of one [`PositionSource::poll_fix`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixPoll {
    /// A fix ready for evaluation.
    Fix(Position),
    /// A fix was read and dropped; more may be queued behind it.
    Rejected,
    /// Nothing pending.
    Empty,
}

impl FixPoll {
    /// The fix, if this poll produced one.
    pub fn fix(self) -> Option<Position> {
        match self {
            Self::Fix(p) => Some(p),
            Self::Rejected | Self::Empty => None,
        }
    }
}

/// Read-side port: yields position fixes in arrival order.
///
/// The sequence is unbounded and survives receiver reconnects; a source
/// that has nothing new returns [`FixPoll::Empty`].
pub trait PositionSource {
    /// Next pending fix, if any.  Never blocks.
    fn poll_fix(&mut self) -> FixPoll;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the buzzer.
pub trait ActuatorPort {
    /// Drive the buzzer on or off.
    ///
    /// A failed write is reported but the domain does not retry it; the
    /// physical output may then disagree with the logical alarm state.
    fn set_buzzer(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Last level successfully written to the buzzer.
    fn is_buzzer_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → log / socket / chat)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, socket
/// broadcast, chat message).  Delivery is best-effort.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: storage → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the startup configuration.
///
/// Configuration is read once and never written back; implementations
/// MUST run [`GeoConfig::validate`] and reject invalid values with
/// [`ConfigError::ValidationFailed`] rather than clamping them.
pub trait ConfigPort {
    /// Returns [`GeoConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<GeoConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("stored config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
