//! Inter-task communication channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the asynchronous
//! producers (socket handler, chat poller, receiver task) with the
//! synchronous control loop.  All tasks share these static channels
//! without heap allocation.  Producers never touch the alarm state; the
//! control loop is the only consumer of commands and fixes.
//!
//! ```text
//! ┌───────────────┐  StopRequest   ┌──────────────┐  BroadcastFrame  ┌──────────────┐
//! │ socket / chat │──────────────▶│              │────────────────▶│ socket task  │
//! └───────────────┘               │ Control Loop │                 └──────────────┘
//! ┌───────────────┐    Position    │   (sync)     │   ChatMessage    ┌──────────────┐
//! │ receiver task │──────────────▶│              │────────────────▶│ chat client  │
//! └───────────────┘               └──────────────┘                 └──────────────┘
//! ```
//!
//! Every send is `try_send`: a full queue drops the message with a
//! warning instead of blocking the sender.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::{AppCommand, StopSource};
use crate::fsm::context::Millis;
use crate::geo::Position;

/// Capacity of one socket broadcast frame.
pub const FRAME_CAPACITY: usize = 96;
/// Capacity of one outgoing chat message.
pub const CHAT_TEXT_CAPACITY: usize = 192;

/// Channel depth for inbound stop requests.
const COMMAND_DEPTH: usize = 8;
/// Channel depth for inbound position fixes.
const FIX_DEPTH: usize = 8;
/// Channel depth for outbound socket frames.
const BROADCAST_DEPTH: usize = 8;
/// Channel depth for outbound chat messages.
const CHAT_DEPTH: usize = 4;

/// Stop request from either command channel, stamped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopRequest {
    pub source: StopSource,
    pub received_at: Millis,
}

impl From<StopRequest> for AppCommand {
    fn from(req: StopRequest) -> Self {
        AppCommand::Stop {
            source: req.source,
            at: req.received_at,
        }
    }
}

/// Serialised state frame for local socket clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastFrame {
    pub payload: heapless::String<FRAME_CAPACITY>,
}

/// Human-readable message for the remote chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: heapless::String<CHAT_TEXT_CAPACITY>,
}

pub type CommandChannel = Channel<CriticalSectionRawMutex, StopRequest, COMMAND_DEPTH>;
pub type FixChannel = Channel<CriticalSectionRawMutex, Position, FIX_DEPTH>;
pub type BroadcastChannel = Channel<CriticalSectionRawMutex, BroadcastFrame, BROADCAST_DEPTH>;
pub type ChatOutbox = Channel<CriticalSectionRawMutex, ChatMessage, CHAT_DEPTH>;

/// Inbound stop requests: socket handler / chat poller → control loop.
pub static COMMAND_CHANNEL: CommandChannel = Channel::new();

/// Inbound position fixes: receiver task → control loop.
pub static FIX_CHANNEL: FixChannel = Channel::new();

/// Outbound state frames: control loop → socket task.
pub static BROADCAST_CHANNEL: BroadcastChannel = Channel::new();

/// Outbound chat texts: control loop → chat client.
pub static CHAT_OUTBOX: ChatOutbox = Channel::new();

/// Queue a stop request.  Returns `false` if the queue was full.
pub fn submit_stop(channel: &CommandChannel, source: StopSource, received_at: Millis) -> bool {
    let req = StopRequest {
        source,
        received_at,
    };
    if channel.try_send(req).is_err() {
        warn!("Command queue full, dropping stop from {}", source.label());
        return false;
    }
    true
}

/// Queue a position fix.  Returns `false` if the queue was full.
pub fn submit_fix(channel: &FixChannel, position: Position) -> bool {
    if channel.try_send(position).is_err() {
        warn!(
            "Fix queue full, dropping ({:.6},{:.6})",
            position.latitude, position.longitude
        );
        return false;
    }
    true
}
