//! GPIO / peripheral pin assignments for the GeoGuard tracker board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------

/// Digital output: HIGH = buzzer sounding.
pub const BUZZER_GPIO: i32 = 22;

/// Whether `gpio` can drive an output on the ESP32: GPIO 0..=33, minus
/// 6..=11 which are wired to the SPI flash.  34..=39 are input-only.
pub const fn is_output_capable(gpio: i32) -> bool {
    matches!(gpio, 0..=5 | 12..=33)
}

// ---------------------------------------------------------------------------
// GPS receiver (UART1, NMEA @ 9600 8N1)
// ---------------------------------------------------------------------------

/// ESP32 RX ← receiver TX.
pub const GPS_RX_GPIO: i32 = 16;
/// ESP32 TX → receiver RX.
pub const GPS_TX_GPIO: i32 = 17;
/// Receiver baud rate.
pub const GPS_BAUD: u32 = 9_600;
