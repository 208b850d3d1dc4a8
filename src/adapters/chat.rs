//! Remote chat adapter (Telegram Bot API shape).
//!
//! Two directions, both best-effort:
//!
//! - **Outbound**: [`ChatNotifier`] turns alarm events into human-readable
//!   texts and queues them on a [`ChatOutbox`].  [`ChatClient::flush_outbox`]
//!   hands them to the transport.
//! - **Inbound**: [`ChatClient::poll_commands`] fetches `getUpdates` with
//!   `offset = last_update_id + 1`, keeps fetching while new updates arrive,
//!   and turns every exact `/stopbuzzer` text into a stop request on the
//!   [`CommandChannel`].  The offset always moves past what was read, even
//!   when an update (or a whole body) cannot be decoded, so one bad update
//!   never blocks the ones queued behind it.
//!
//! The HTTP/TLS side is behind [`ChatTransport`]; only
//! [`NullChatTransport`] ships with the firmware.

use core::fmt::Write;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::app::commands::StopSource;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::channels::{
    submit_stop, ChatMessage, ChatOutbox, CommandChannel, CHAT_TEXT_CAPACITY,
};
use crate::config::GeoConfig;
use crate::error::NotifyError;
use crate::fsm::context::Millis;

/// The only inbound chat command.
pub const STOP_COMMAND: &str = "/stopbuzzer";

/// Initial capacity of the `getUpdates` body buffer; transports grow it.
pub const UPDATES_BUF_LEN: usize = 4096;

/// `limit` passed to `getUpdates`, bounding the size of one body.
pub const UPDATES_PER_FETCH: u8 = 10;

/// Upper bound on `getUpdates` round trips per poll.
const MAX_FETCH_ROUNDS: usize = 8;

// ───────────────────────────────────────────────────────────────
// Transport
// ───────────────────────────────────────────────────────────────

/// Bot API transport.
pub trait ChatTransport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Deliver `text` to `chat_id`.
    fn send_message(&mut self, chat_id: &str, text: &str) -> Result<(), Self::Error>;

    /// Append the raw `getUpdates` JSON body for `offset` (at most `limit`
    /// updates) to `body`, which arrives empty.  Leaving it empty means
    /// nothing to read.
    fn get_updates(&mut self, offset: i64, limit: u8, body: &mut Vec<u8>) -> Result<(), Self::Error>;
}

/// A transport that discards every message and never has updates.
pub struct NullChatTransport;

impl ChatTransport for NullChatTransport {
    type Error = ();

    fn send_message(&mut self, _chat_id: &str, _text: &str) -> Result<(), ()> {
        Ok(())
    }

    fn get_updates(&mut self, _offset: i64, _limit: u8, _body: &mut Vec<u8>) -> Result<(), ()> {
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// getUpdates parsing
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UpdatesEnvelope {
    ok: bool,
    #[serde(default)]
    result: Vec<serde_json::Value>,
}

/// One entry of a `getUpdates` result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Parse a `getUpdates` response body.
///
/// Entries are decoded one by one.  An entry with a readable `update_id`
/// but an unexpected shape comes back without a message, so its id still
/// advances the offset; entries without an id are dropped.
pub fn parse_updates(body: &[u8]) -> Result<Vec<Update>, NotifyError> {
    let env: UpdatesEnvelope = serde_json::from_slice(body).map_err(|_| NotifyError::Malformed)?;
    if !env.ok {
        return Err(NotifyError::Transport);
    }
    Ok(env.result.into_iter().filter_map(decode_update).collect())
}

fn decode_update(entry: serde_json::Value) -> Option<Update> {
    let update_id = entry.get("update_id").and_then(serde_json::Value::as_i64)?;
    match serde_json::from_value::<Update>(entry) {
        Ok(update) => Some(update),
        Err(e) => {
            warn!("Chat: update {} not understood ({}), skipping", update_id, e);
            Some(Update {
                update_id,
                message: None,
            })
        }
    }
}

/// Highest `"update_id": N` that can be read from a body too damaged to
/// parse (typically cut off mid-transfer).
pub fn salvage_update_id(body: &[u8]) -> Option<i64> {
    const KEY: &[u8] = b"\"update_id\"";
    let mut best: Option<i64> = None;
    let mut rest = body;
    while let Some(at) = rest.windows(KEY.len()).position(|w| w == KEY) {
        rest = &rest[at + KEY.len()..];
        let value = rest
            .iter()
            .position(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b':'))
            .map_or(&[][..], |start| &rest[start..]);
        let digits = value.iter().take_while(|b| b.is_ascii_digit()).count();
        let id = core::str::from_utf8(&value[..digits])
            .ok()
            .and_then(|d| d.parse::<i64>().ok());
        if let Some(id) = id {
            best = Some(best.map_or(id, |b| b.max(id)));
        }
    }
    best
}

impl Update {
    /// Whether this update is the stop command.  When `allowed_chat` is
    /// set, messages from any other chat are ignored.
    pub fn is_stop_command(&self, allowed_chat: Option<i64>) -> bool {
        let Some(msg) = &self.message else {
            return false;
        };
        if let Some(allowed) = allowed_chat {
            if msg.chat.map(|c| c.id) != Some(allowed) {
                return false;
            }
        }
        msg.text.as_deref() == Some(STOP_COMMAND)
    }
}

// ───────────────────────────────────────────────────────────────
// Client (polling + delivery)
// ───────────────────────────────────────────────────────────────

/// Drives one [`ChatTransport`]: delivers queued texts and polls commands.
pub struct ChatClient<'a, T: ChatTransport> {
    transport: T,
    chat_id: heapless::String<32>,
    allowed_chat: Option<i64>,
    last_update_id: i64,
    commands: &'a CommandChannel,
    outbox: &'a ChatOutbox,
    body: Vec<u8>,
}

impl<'a, T: ChatTransport> ChatClient<'a, T> {
    pub fn new(
        transport: T,
        config: &GeoConfig,
        commands: &'a CommandChannel,
        outbox: &'a ChatOutbox,
    ) -> Self {
        Self {
            transport,
            chat_id: config.chat_id.clone(),
            allowed_chat: config.chat_id.parse().ok(),
            last_update_id: 0,
            commands,
            outbox,
            body: Vec::with_capacity(UPDATES_BUF_LEN),
        }
    }

    /// Highest update id seen so far.
    pub fn last_update_id(&self) -> i64 {
        self.last_update_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch pending updates and queue a stop request for every
    /// `/stopbuzzer`.  Returns the number of stop requests queued.
    ///
    /// A body that does not parse still moves the offset past the highest
    /// update id it mentions; only a body with no readable id at all is
    /// reported as [`NotifyError::Malformed`].
    pub fn poll_commands(&mut self, now: Millis) -> Result<usize, NotifyError> {
        let mut queued = 0;
        for _ in 0..MAX_FETCH_ROUNDS {
            let offset = self.last_update_id + 1;
            self.body.clear();
            self.transport
                .get_updates(offset, UPDATES_PER_FETCH, &mut self.body)
                .map_err(|e| {
                    warn!("getUpdates(offset={}) failed: {:?}", offset, e);
                    NotifyError::Transport
                })?;
            if self.body.is_empty() {
                break;
            }
            let updates = match parse_updates(&self.body) {
                Ok(updates) => updates,
                Err(NotifyError::Malformed) => match salvage_update_id(&self.body) {
                    Some(id) if id > self.last_update_id => {
                        warn!(
                            "Chat: unreadable getUpdates body ({} bytes), skipping to update {}",
                            self.body.len(),
                            id
                        );
                        self.last_update_id = id;
                        continue;
                    }
                    _ => return Err(NotifyError::Malformed),
                },
                Err(e) => return Err(e),
            };
            if updates.is_empty() {
                break;
            }
            for update in &updates {
                self.last_update_id = self.last_update_id.max(update.update_id);
                if update.is_stop_command(self.allowed_chat) {
                    info!("Chat: {} (update {})", STOP_COMMAND, update.update_id);
                    if submit_stop(self.commands, StopSource::RemoteChat, now) {
                        queued += 1;
                    }
                } else {
                    debug!("Chat: ignoring update {}", update.update_id);
                }
            }
        }
        Ok(queued)
    }

    /// Hand every queued text to the transport.  Returns how many were
    /// delivered; failures are logged and dropped.
    pub fn flush_outbox(&mut self) -> usize {
        let mut sent = 0;
        while let Ok(msg) = self.outbox.try_receive() {
            if self.chat_id.is_empty() {
                debug!("Chat disabled, dropping: {}", msg.text);
                continue;
            }
            match self.transport.send_message(&self.chat_id, &msg.text) {
                Ok(()) => sent += 1,
                Err(e) => warn!("Chat send failed: {:?}", e),
            }
        }
        sent
    }
}

// ───────────────────────────────────────────────────────────────
// Notifier (events → texts)
// ───────────────────────────────────────────────────────────────

/// Render a duration for humans: whole minutes, else whole seconds, else ms.
pub fn human_duration(ms: Millis) -> heapless::String<24> {
    let mut out = heapless::String::new();
    let (n, unit) = if ms >= 60_000 && ms % 60_000 == 0 {
        (ms / 60_000, "minute")
    } else if ms >= 1_000 && ms % 1_000 == 0 {
        (ms / 1_000, "second")
    } else {
        (ms, "millisecond")
    };
    // Fits for every duration `GeoConfig::validate` accepts.
    let _ = write!(out, "{} {}{}", n, unit, if n == 1 { "" } else { "s" });
    out
}

/// [`EventSink`] that queues alert texts for the remote chat.
pub struct ChatNotifier<'a> {
    outbox: &'a ChatOutbox,
    zone_name: heapless::String<32>,
    active_for: heapless::String<24>,
    cooldown_for: heapless::String<24>,
}

impl<'a> ChatNotifier<'a> {
    pub fn new(outbox: &'a ChatOutbox, config: &GeoConfig) -> Self {
        Self {
            outbox,
            zone_name: config.zone_name.clone(),
            active_for: human_duration(config.active_duration_ms),
            cooldown_for: human_duration(config.cooldown_ms),
        }
    }

    /// Text for `event`, or `None` if the chat does not hear about it.
    pub fn render(&self, event: &AppEvent) -> Result<Option<heapless::String<CHAT_TEXT_CAPACITY>>, NotifyError> {
        let mut text = heapless::String::new();
        let written = match event {
            AppEvent::PositionUpdate { .. } => return Ok(None),
            AppEvent::AlarmActivated { position, .. } => write!(
                text,
                "🚨 Still outside {}! Buzzer ON for {}.\nLat: {:.6}\nLon: {:.6}",
                self.zone_name, self.active_for, position.latitude, position.longitude
            ),
            AppEvent::AlarmStopped {
                source: StopSource::RemoteChat,
                ..
            } => write!(
                text,
                "🛑 Buzzer manually stopped. Cooldown for {}.",
                self.cooldown_for
            ),
            AppEvent::AlarmStopped {
                source: StopSource::LocalSocket,
                ..
            } => write!(
                text,
                "🛑 Buzzer stopped via web. Cooldown for {}.",
                self.cooldown_for
            ),
        };
        written.map_err(|_| NotifyError::Overflow)?;
        Ok(Some(text))
    }
}

impl EventSink for ChatNotifier<'_> {
    fn emit(&mut self, event: &AppEvent) {
        let text = match self.render(event) {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                warn!("Chat text not rendered: {}", e);
                return;
            }
        };
        if self.outbox.try_send(ChatMessage { text }).is_err() {
            warn!("Chat outbox full, alert dropped");
        }
    }
}
