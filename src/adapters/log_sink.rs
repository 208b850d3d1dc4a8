//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger
//! (UART on the device).  Position updates go out at `debug` so a 1 Hz
//! receiver does not flood the console.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::PositionUpdate { position, snapshot } => {
                debug!(
                    "FIX   | lat={:.6} lon={:.6} | enabled={} active={} stopped={}",
                    position.latitude,
                    position.longitude,
                    snapshot.enabled,
                    snapshot.active,
                    snapshot.manually_stopped
                );
            }
            AppEvent::AlarmActivated { position, at } => {
                info!(
                    "ALARM | buzzer on at {}ms | lat={:.6} lon={:.6}",
                    at, position.latitude, position.longitude
                );
            }
            AppEvent::AlarmStopped { source, at } => {
                info!("STOP  | via {} at {}ms", source.label(), at);
            }
        }
    }
}
