//! Local socket command adapter.
//!
//! Clients on the local network (the live map page) can silence the
//! buzzer by sending the text frame `STOP_BUZZER`.  Only complete,
//! unfragmented text frames are considered; anything else is ignored.
//! A recognised frame becomes a stop request on the [`CommandChannel`]
//! and never touches the alarm state directly.

use log::{debug, info};

use crate::app::commands::StopSource;
use crate::channels::{submit_stop, CommandChannel};
use crate::fsm::context::Millis;

/// The only inbound socket command.
pub const STOP_MESSAGE: &[u8] = b"STOP_BUZZER";

/// Framing metadata for one received data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Last fragment of the message.
    pub fin: bool,
    /// Byte offset of this fragment within the message.
    pub offset: usize,
    /// Total message length announced by the sender.
    pub total_len: usize,
    /// Text (as opposed to binary) opcode.
    pub text: bool,
}

impl FrameInfo {
    /// A single complete text frame of `len` bytes.
    pub const fn whole_text(len: usize) -> Self {
        Self {
            fin: true,
            offset: 0,
            total_len: len,
            text: true,
        }
    }

    /// Whether `payload` is the entire message in one text frame.
    pub fn is_complete_text(&self, payload: &[u8]) -> bool {
        self.fin && self.offset == 0 && self.text && self.total_len == payload.len()
    }
}

/// Whether `payload` is the stop command (exact, case-sensitive).
pub fn is_stop_message(payload: &[u8]) -> bool {
    payload == STOP_MESSAGE
}

/// Turns incoming socket frames into stop requests.
pub struct LocalSocketHandler<'a> {
    commands: &'a CommandChannel,
}

impl<'a> LocalSocketHandler<'a> {
    pub fn new(commands: &'a CommandChannel) -> Self {
        Self { commands }
    }

    /// Handle one data frame received at `now`.  Returns `true` if a stop
    /// request was queued.
    pub fn on_frame(&mut self, info: FrameInfo, payload: &[u8], now: Millis) -> bool {
        if !info.is_complete_text(payload) {
            debug!("Socket: ignoring partial/binary frame ({} bytes)", payload.len());
            return false;
        }
        if !is_stop_message(payload) {
            debug!("Socket: ignoring {:?}", String::from_utf8_lossy(payload));
            return false;
        }
        info!("Socket: STOP_BUZZER");
        submit_stop(self.commands, StopSource::LocalSocket, now)
    }
}
