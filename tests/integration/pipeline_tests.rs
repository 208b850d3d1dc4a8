//! End-to-end: fixes through the channel, service, and every outbound sink.

use super::mock_hw::MockHardware;

use geoguard::adapters::broadcast::BroadcastSink;
use geoguard::adapters::chat::ChatNotifier;
use geoguard::adapters::log_sink::LogEventSink;
use geoguard::adapters::position::{ChannelPositionSource, FiniteFixFilter, ReplayPositionSource};
use geoguard::adapters::time::ManualClock;
use geoguard::adapters::FanOut;
use geoguard::app::service::{AppService, MAX_FIXES_PER_POLL};
use geoguard::channels::{submit_fix, BroadcastChannel, ChatOutbox, FixChannel};
use geoguard::config::GeoConfig;
use geoguard::geo::Position;

const INSIDE: Position = Position::new(1.8500, 103.0830);
const OUTSIDE: Position = Position::new(1.9000, 103.0830);

#[test]
fn channel_fixes_reach_socket_and_chat() {
    let fixes_ch = FixChannel::new();
    let frames = BroadcastChannel::new();
    let chat = ChatOutbox::new();
    let config = GeoConfig::default();

    let mut app = AppService::new(config.clone());
    let mut hw = MockHardware::new();
    let mut sink = FanOut::new(
        LogEventSink::new(),
        FanOut::new(BroadcastSink::new(&frames), ChatNotifier::new(&chat, &config)),
    );
    let mut source = FiniteFixFilter::new(ChannelPositionSource::new(&fixes_ch));
    let clock = ManualClock::new(0);

    for t in [0, 300_000] {
        clock.set(t);
        assert!(submit_fix(&fixes_ch, OUTSIDE));
        assert_eq!(app.poll_fixes(&mut source, &clock, &mut hw, &mut sink), 1);
    }
    assert!(hw.level());

    let f1 = frames.try_receive().unwrap();
    assert_eq!(f1.payload.as_str(), r#"{"lat":1.900000,"lon":103.083000,"buzzer":1}"#);
    assert!(frames.try_receive().is_ok());
    assert!(frames.try_receive().is_err());

    let alert = chat.try_receive().unwrap();
    assert!(alert.text.starts_with("🚨 Still outside UTHM! Buzzer ON for 1 minute."));
    assert!(alert.text.ends_with("Lat: 1.900000\nLon: 103.083000"));
    assert!(chat.try_receive().is_err());
}

#[test]
fn malformed_fixes_never_reach_the_controller() {
    let fixes_ch = FixChannel::new();
    let mut app = AppService::new(GeoConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogEventSink::new();
    let mut source = FiniteFixFilter::new(ChannelPositionSource::new(&fixes_ch));
    let clock = ManualClock::new(1_000);

    submit_fix(&fixes_ch, Position::new(f64::NAN, 103.0));
    submit_fix(&fixes_ch, Position::new(1.85, 500.0));
    submit_fix(&fixes_ch, OUTSIDE);

    assert_eq!(app.poll_fixes(&mut source, &clock, &mut hw, &mut sink), 1);
    assert_eq!(app.fix_count(), 1);
    assert_eq!(source.rejected(), 2);
    assert_eq!(app.alarm_state().cycle_anchor, Some(1_000));
}

#[test]
fn good_fixes_queued_behind_garbage_are_handled_in_the_same_poll() {
    let mut track = vec![Position::new(f64::NAN, 103.0); 10];
    track.extend([OUTSIDE, OUTSIDE]);
    let mut source = FiniteFixFilter::new(ReplayPositionSource::new(track));

    let mut app = AppService::new(GeoConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogEventSink::new();
    let clock = ManualClock::new(2_000);

    assert_eq!(app.poll_fixes(&mut source, &clock, &mut hw, &mut sink), 2);
    assert_eq!(source.rejected(), 10);
    assert_eq!(app.alarm_state().cycle_anchor, Some(2_000));
}

#[test]
fn poll_is_bounded_per_call() {
    let mut app = AppService::new(GeoConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogEventSink::new();
    let mut source = ReplayPositionSource::looping(vec![INSIDE, OUTSIDE]);
    let clock = ManualClock::new(0);

    assert_eq!(
        app.poll_fixes(&mut source, &clock, &mut hw, &mut sink),
        MAX_FIXES_PER_POLL
    );
    assert_eq!(app.fix_count(), MAX_FIXES_PER_POLL as u64);
}

#[test]
fn replayed_commute_sounds_once_per_cycle() {
    // One fix per minute: 12 minutes outside, then back inside.
    let mut track = vec![OUTSIDE; 12];
    track.push(INSIDE);
    let mut source = ReplayPositionSource::new(track);

    let mut app = AppService::new(GeoConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = super::mock_hw::RecordingSink::new();
    let clock = ManualClock::new(0);

    while app.poll_fixes(&mut source, &clock, &mut hw, &mut sink) > 0 {
        clock.advance(60_000);
    }
    // The first poll drains the whole track at t=0.
    assert_eq!(app.fix_count(), 13);
    assert_eq!(sink.activations(), 0);

    // Same track with the clock moving per fix.
    let mut track = vec![OUTSIDE; 12];
    track.push(INSIDE);
    let mut app = AppService::new(GeoConfig::default());
    let mut sink = super::mock_hw::RecordingSink::new();
    let clock = ManualClock::new(0);
    for p in track {
        let mut one = ReplayPositionSource::new(vec![p]);
        app.poll_fixes(&mut one, &clock, &mut hw, &mut sink);
        clock.advance(60_000);
    }
    // Outside at t = 0..=660 000: activations at 300 000 and 600 000.
    assert_eq!(sink.activations(), 2);
    assert!(!hw.level(), "back inside, buzzer off");
}
