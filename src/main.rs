//! GeoGuard Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single synchronous control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   BroadcastSink   ChatNotifier │
//! │  (ActuatorPort)    (EventSink)    (EventSink)     (EventSink)  │
//! │  ChannelPositionSource  JsonConfigStore  MonotonicClock        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  AlarmController · phase table                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  COMMAND_CHANNEL · FIX_CHANNEL ──▶ loop ──▶ BROADCAST · CHAT   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
use log::{debug, error, info, warn};

use geoguard::adapters::broadcast::BroadcastSink;
use geoguard::adapters::chat::{ChatClient, ChatNotifier, NullChatTransport};
use geoguard::adapters::config_store::{load_or_default, JsonConfigStore};
use geoguard::adapters::hardware::HardwareAdapter;
use geoguard::adapters::log_sink::LogEventSink;
use geoguard::adapters::position::{ChannelPositionSource, FiniteFixFilter};
use geoguard::adapters::time::MonotonicClock;
use geoguard::adapters::FanOut;
use geoguard::app::ports::ClockPort;
use geoguard::app::service::AppService;
use geoguard::channels::{BROADCAST_CHANNEL, CHAT_OUTBOX, COMMAND_CHANNEL, FIX_CHANNEL};
use geoguard::error::Error;

/// Control loop period.
const LOOP_INTERVAL_MS: u32 = 1_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GeoGuard v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (build-time JSON or defaults) ───────────────
    let config = load_or_default(&JsonConfigStore::from_build_env());

    // ── 3. Buzzer ─────────────────────────────────────────────
    // SAFETY: `GeoConfig::validate` only admits output-capable GPIOs
    // (`pins::is_output_capable`), and no other driver in this firmware
    // claims the buzzer pin.
    let pin = PinDriver::output(unsafe { AnyOutputPin::new(config.buzzer_gpio) }).map_err(|e| {
        error!("Buzzer GPIO {} unusable: {:?}", config.buzzer_gpio, e);
        Error::Init("buzzer GPIO")
    })?;
    let mut hw = HardwareAdapter::from_pin(pin)?;

    // ── 4. Adapters ───────────────────────────────────────────
    let clock = MonotonicClock::new();
    // Fixes enter through `channels::submit_fix` and socket frames through
    // `LocalSocketHandler`; the board's receiver and socket tasks own those
    // calls.  This loop only consumes the queues.
    let mut fixes = FiniteFixFilter::new(ChannelPositionSource::new(&FIX_CHANNEL));
    let mut sink = FanOut::new(
        LogEventSink::new(),
        FanOut::new(
            BroadcastSink::new(&BROADCAST_CHANNEL),
            ChatNotifier::new(&CHAT_OUTBOX, &config),
        ),
    );
    let mut chat = ChatClient::new(NullChatTransport, &config, &COMMAND_CHANNEL, &CHAT_OUTBOX);
    let chat_enabled = config.chat_enabled();

    // ── 5. App service ────────────────────────────────────────
    let mut app = AppService::new(config);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        // Stop requests before fixes.
        while let Ok(req) = COMMAND_CHANNEL.try_receive() {
            app.handle_command(req.into(), &mut hw, &mut sink);
        }

        app.poll_fixes(&mut fixes, &clock, &mut hw, &mut sink);

        chat.flush_outbox();
        if chat_enabled {
            if let Err(e) = chat.poll_commands(clock.now_ms()) {
                warn!("Chat poll failed: {}", e);
            }
        }

        // No socket server on this build; discard frames nobody reads.
        while let Ok(frame) = BROADCAST_CHANNEL.try_receive() {
            debug!("WS    | {}", frame.payload);
        }

        FreeRtos::delay_ms(LOOP_INTERVAL_MS);
    }
}
