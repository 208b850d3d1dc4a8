//! Socket broadcast adapter.
//!
//! Every position update becomes one compact JSON text frame for the
//! local socket clients (the live map page):
//!
//! ```text
//! {"lat":1.900000,"lon":103.083000,"buzzer":1}
//! ```
//!
//! `buzzer` is `1` while the alarm is enabled, `0` while a manual stop is
//! suppressing it.  Coordinates are fixed at six decimals.  Frames are
//! queued on a [`BroadcastChannel`]; the socket task fans them out to
//! whoever is connected.

use core::fmt::Write;

use log::warn;

use crate::app::events::{AlarmSnapshot, AppEvent};
use crate::app::ports::EventSink;
use crate::channels::{BroadcastChannel, BroadcastFrame, FRAME_CAPACITY};
use crate::error::NotifyError;
use crate::geo::Position;

/// Render the state frame for one fix.
pub fn encode_state_frame(
    position: Position,
    snapshot: AlarmSnapshot,
) -> Result<heapless::String<FRAME_CAPACITY>, NotifyError> {
    let mut out = heapless::String::new();
    write!(
        out,
        "{{\"lat\":{:.6},\"lon\":{:.6},\"buzzer\":{}}}",
        position.latitude,
        position.longitude,
        u8::from(snapshot.enabled)
    )
    .map_err(|_| NotifyError::Overflow)?;
    Ok(out)
}

/// [`EventSink`] that queues state frames for socket clients.
pub struct BroadcastSink<'a> {
    outbox: &'a BroadcastChannel,
    dropped: u32,
}

impl<'a> BroadcastSink<'a> {
    pub fn new(outbox: &'a BroadcastChannel) -> Self {
        Self { outbox, dropped: 0 }
    }

    /// Frames lost to a full queue or an encoding overflow.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn publish(&mut self, position: Position, snapshot: AlarmSnapshot) -> Result<(), NotifyError> {
        let payload = encode_state_frame(position, snapshot)?;
        self.outbox
            .try_send(BroadcastFrame { payload })
            .map_err(|_| NotifyError::QueueFull)
    }
}

impl EventSink for BroadcastSink<'_> {
    fn emit(&mut self, event: &AppEvent) {
        // Socket clients only track position + enabled.
        if let AppEvent::PositionUpdate { position, snapshot } = event {
            if let Err(e) = self.publish(*position, *snapshot) {
                self.dropped = self.dropped.saturating_add(1);
                warn!("Broadcast frame dropped: {} ({} total)", e, self.dropped);
            }
        }
    }
}
