//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, broadcast to socket
//! clients, send a chat message.

use crate::fsm::context::Millis;
use crate::geo::Position;

use super::commands::StopSource;

pub use crate::fsm::context::AlarmSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// A fix arrived.  Carries the alarm state in force *before* the fix
    /// was evaluated.
    PositionUpdate {
        position: Position,
        snapshot: AlarmSnapshot,
    },

    /// The buzzer was switched on outside the zone.
    AlarmActivated { position: Position, at: Millis },

    /// A stop request was applied.
    AlarmStopped { source: StopSource, at: Millis },
}
