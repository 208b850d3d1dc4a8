//! Position source adapters.
//!
//! | Source                   | Feeds from                              |
//! |--------------------------|-----------------------------------------|
//! | `ChannelPositionSource`  | `FIX_CHANNEL` (receiver task on device) |
//! | `ReplayPositionSource`   | a scripted track (simulation, tests)    |
//! | `FiniteFixFilter<S>`     | wraps any source, drops malformed fixes |

use log::warn;

use crate::app::ports::{FixPoll, PositionSource};
use crate::channels::FixChannel;
use crate::geo::Position;

// ── Channel-fed ───────────────────────────────────────────────

/// Drains fixes queued by the receiver task.
pub struct ChannelPositionSource<'a> {
    channel: &'a FixChannel,
}

impl<'a> ChannelPositionSource<'a> {
    pub fn new(channel: &'a FixChannel) -> Self {
        Self { channel }
    }
}

impl PositionSource for ChannelPositionSource<'_> {
    fn poll_fix(&mut self) -> FixPoll {
        match self.channel.try_receive() {
            Ok(p) => FixPoll::Fix(p),
            Err(_) => FixPoll::Empty,
        }
    }
}

// ── Replay ────────────────────────────────────────────────────

/// Plays back a fixed track, optionally looping.
pub struct ReplayPositionSource {
    track: Vec<Position>,
    next: usize,
    looping: bool,
}

impl ReplayPositionSource {
    /// Play `track` once.
    pub fn new(track: Vec<Position>) -> Self {
        Self {
            track,
            next: 0,
            looping: false,
        }
    }

    /// Play `track` forever.
    pub fn looping(track: Vec<Position>) -> Self {
        Self {
            looping: true,
            ..Self::new(track)
        }
    }

    /// Fixes not yet played in the current pass.
    pub fn remaining(&self) -> usize {
        self.track.len().saturating_sub(self.next)
    }
}

impl PositionSource for ReplayPositionSource {
    fn poll_fix(&mut self) -> FixPoll {
        if self.next >= self.track.len() {
            if !self.looping || self.track.is_empty() {
                return FixPoll::Empty;
            }
            self.next = 0;
        }
        let p = self.track[self.next];
        self.next += 1;
        FixPoll::Fix(p)
    }
}

// ── Filter ────────────────────────────────────────────────────

/// Drops fixes with non-finite or out-of-range coordinates so they never
/// reach the alarm controller.  Each dropped fix is reported as
/// [`FixPoll::Rejected`], leaving the caller free to keep draining.
pub struct FiniteFixFilter<S> {
    inner: S,
    rejected: u32,
}

impl<S: PositionSource> FiniteFixFilter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, rejected: 0 }
    }

    /// Total fixes dropped since construction.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}

impl<S: PositionSource> PositionSource for FiniteFixFilter<S> {
    fn poll_fix(&mut self) -> FixPoll {
        match self.inner.poll_fix() {
            FixPoll::Fix(p) if !p.is_well_formed() => {
                self.rejected = self.rejected.saturating_add(1);
                warn!(
                    "Rejected malformed fix lat={} lon={} ({} total)",
                    p.latitude, p.longitude, self.rejected
                );
                FixPoll::Rejected
            }
            other => other,
        }
    }
}
