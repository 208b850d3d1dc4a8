//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `broadcast`    | EventSink          | Local socket clients (JSON)  |
//! | `chat`         | EventSink          | Remote chat (Bot API)        |
//! | `config_store` | ConfigPort         | Build-time JSON blob         |
//! | `hardware`     | ActuatorPort       | Buzzer GPIO                  |
//! | `local_socket` | -                  | Socket → command channel     |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `position`     | PositionSource     | Fix channel / replay track   |
//! | `time`         | ClockPort          | ESP32 system timer           |

pub mod broadcast;
pub mod chat;
pub mod config_store;
pub mod hardware;
pub mod local_socket;
pub mod log_sink;
pub mod position;
pub mod time;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Tee: forwards every event to both sinks, `A` first.
pub struct FanOut<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: EventSink, B: EventSink> FanOut<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink, B: EventSink> EventSink for FanOut<A, B> {
    fn emit(&mut self, event: &AppEvent) {
        self.first.emit(event);
        self.second.emit(event);
    }
}
