//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (remote chat,
//! local socket clients) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::fsm::context::Millis;

/// Which channel a stop request arrived on.
///
/// Only selects the acknowledgment text; both channels have the same
/// effect on the alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopSource {
    /// `/stopbuzzer` from the remote chat.
    RemoteChat,
    /// `STOP_BUZZER` from a local socket client.
    LocalSocket,
}

impl StopSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RemoteChat => "chat",
            Self::LocalSocket => "socket",
        }
    }
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Silence the buzzer and start the cooldown window at `at`.
    Stop { source: StopSource, at: Millis },
}
