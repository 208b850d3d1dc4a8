//! System configuration parameters
//!
//! All tunable parameters for the GeoGuard alarm.  Set once at startup
//! and never mutated afterwards.  Values can be overridden by a JSON blob
//! (see [`crate::adapters::config_store`]); missing fields keep their
//! defaults.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::geo::{DistanceMetric, Position, Zone};
use crate::pins;

/// Longest accepted duration for any timing parameter (24 h).
const MAX_DURATION_MS: u64 = 86_400_000;
/// Shortest accepted duration for any timing parameter (1 s).
const MIN_DURATION_MS: u64 = 1_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    // --- Geofence ---
    /// Zone centre and radius (radius unit follows `metric`)
    pub zone: Zone,
    /// Distance strategy used for the inside/outside decision
    pub metric: DistanceMetric,

    // --- Alarm timing (milliseconds) ---
    /// Suppression window after a manual stop
    pub cooldown_ms: u64,
    /// Dwell time outside the zone before the buzzer sounds
    pub cycle_interval_ms: u64,
    /// How long the buzzer stays on once activated
    pub active_duration_ms: u64,

    // --- Hardware ---
    /// GPIO driving the buzzer (active HIGH)
    pub buzzer_gpio: i32,

    // --- Notifications ---
    /// Zone name used in alert texts
    pub zone_name: heapless::String<32>,
    /// Chat the alert texts are sent to (empty = chat notifications off)
    pub chat_id: heapless::String<32>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            // Geofence: UTHM campus, planar degrees
            zone: Zone::new(Position::new(1.8500, 103.0830), 0.005),
            metric: DistanceMetric::Planar,

            // Timing
            cooldown_ms: 300_000,        // 5 min after STOP
            cycle_interval_ms: 300_000,  // sound every 5 min outside
            active_duration_ms: 60_000,  // 1 min on

            // Hardware
            buzzer_gpio: pins::BUZZER_GPIO,

            // Notifications
            zone_name: zone_name("UTHM"),
            chat_id: heapless::String::new(),
        }
    }
}

/// Fixed-capacity zone name, truncated at the capacity.
fn zone_name(name: &str) -> heapless::String<32> {
    let mut s = heapless::String::new();
    for c in name.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
    s
}

impl GeoConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.zone.center;
        if !c.is_well_formed() {
            return Err(ConfigError::ValidationFailed(
                "zone.center must be finite, lat within ±90 and lon within ±180",
            ));
        }
        if !self.zone.radius.is_finite() || self.zone.radius <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "zone.radius must be finite and > 0",
            ));
        }
        for (value, msg) in [
            (self.cooldown_ms, "cooldown_ms must be 1000–86400000"),
            (self.cycle_interval_ms, "cycle_interval_ms must be 1000–86400000"),
            (self.active_duration_ms, "active_duration_ms must be 1000–86400000"),
        ] {
            if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&value) {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }
        if !pins::is_output_capable(self.buzzer_gpio) {
            return Err(ConfigError::ValidationFailed(
                "buzzer_gpio must be an output-capable GPIO (0-5, 12-33)",
            ));
        }
        if self.zone_name.is_empty() {
            return Err(ConfigError::ValidationFailed("zone_name must not be empty"));
        }
        if !self.chat_id.is_empty() && self.chat_id.parse::<i64>().is_err() {
            return Err(ConfigError::ValidationFailed("chat_id must be a numeric chat id"));
        }
        Ok(())
    }

    /// Whether chat alerts have somewhere to go.
    pub fn chat_enabled(&self) -> bool {
        !self.chat_id.is_empty()
    }
}
