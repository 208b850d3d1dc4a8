//! Both command channels (remote chat, local socket) must have the same
//! effect on the alarm; only the acknowledgment text differs.

use super::mock_hw::{MockHardware, RecordingSink};

use geoguard::adapters::chat::{ChatClient, ChatNotifier, ChatTransport};
use geoguard::adapters::local_socket::{FrameInfo, LocalSocketHandler};
use geoguard::app::commands::StopSource;
use geoguard::app::events::AppEvent;
use geoguard::app::ports::EventSink;
use geoguard::app::service::AppService;
use geoguard::channels::{ChatOutbox, CommandChannel};
use geoguard::config::GeoConfig;
use geoguard::geo::Position;

const OUTSIDE: Position = Position::new(1.9000, 103.0830);

/// Hands out one canned `getUpdates` body, then nothing.
struct OneShotUpdates(Option<&'static str>);

impl ChatTransport for OneShotUpdates {
    type Error = ();

    fn send_message(&mut self, _chat_id: &str, _text: &str) -> Result<(), ()> {
        Ok(())
    }

    fn get_updates(&mut self, _offset: i64, _limit: u8, body: &mut Vec<u8>) -> Result<(), ()> {
        if let Some(canned) = self.0.take() {
            body.extend_from_slice(canned.as_bytes());
        }
        Ok(())
    }
}

const STOP_UPDATE: &str =
    r#"{"ok":true,"result":[{"update_id":7,"message":{"chat":{"id":1032611418},"text":"/stopbuzzer"}}]}"#;

fn config() -> GeoConfig {
    let mut c = GeoConfig::default();
    c.chat_id.push_str("1032611418").unwrap();
    c
}

/// Bring an app to the sounding phase.
fn sounding_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(config());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.on_fix(OUTSIDE, 0, &mut hw, &mut sink);
    app.on_fix(OUTSIDE, 300_000, &mut hw, &mut sink);
    assert!(hw.level());
    (app, hw, sink)
}

fn drain(commands: &CommandChannel, app: &mut AppService, hw: &mut MockHardware, sink: &mut impl EventSink) -> usize {
    let mut n = 0;
    while let Ok(req) = commands.try_receive() {
        app.handle_command(req.into(), hw, sink);
        n += 1;
    }
    n
}

#[test]
fn chat_and_socket_stops_yield_identical_state() {
    let stop_at = 310_000;

    // Remote chat path.
    let chat_cmds = CommandChannel::new();
    let outbox = ChatOutbox::new();
    let (mut app_a, mut hw_a, mut sink_a) = sounding_app();
    let mut client = ChatClient::new(OneShotUpdates(Some(STOP_UPDATE)), &config(), &chat_cmds, &outbox);
    assert_eq!(client.poll_commands(stop_at), Ok(1));
    assert_eq!(drain(&chat_cmds, &mut app_a, &mut hw_a, &mut sink_a), 1);

    // Local socket path.
    let sock_cmds = CommandChannel::new();
    let (mut app_b, mut hw_b, mut sink_b) = sounding_app();
    let mut handler = LocalSocketHandler::new(&sock_cmds);
    assert!(handler.on_frame(FrameInfo::whole_text(11), b"STOP_BUZZER", stop_at));
    assert_eq!(drain(&sock_cmds, &mut app_b, &mut hw_b, &mut sink_b), 1);

    assert_eq!(app_a.alarm_state(), app_b.alarm_state());
    assert_eq!(hw_a.level(), hw_b.level());
    assert!(!hw_a.level());

    assert_eq!(
        sink_a.events.last(),
        Some(&AppEvent::AlarmStopped {
            source: StopSource::RemoteChat,
            at: stop_at
        })
    );
    assert_eq!(
        sink_b.events.last(),
        Some(&AppEvent::AlarmStopped {
            source: StopSource::LocalSocket,
            at: stop_at
        })
    );
}

#[test]
fn acknowledgment_text_follows_source() {
    let outbox = ChatOutbox::new();
    let mut notifier = ChatNotifier::new(&outbox, &config());
    notifier.emit(&AppEvent::AlarmStopped {
        source: StopSource::RemoteChat,
        at: 1,
    });
    notifier.emit(&AppEvent::AlarmStopped {
        source: StopSource::LocalSocket,
        at: 1,
    });

    let first = outbox.try_receive().unwrap();
    let second = outbox.try_receive().unwrap();
    assert!(first.text.contains("manually stopped"));
    assert!(second.text.contains("via web"));
}

#[test]
fn repeated_stops_across_channels_restart_cooldown() {
    let cmds = CommandChannel::new();
    let (mut app, mut hw, mut sink) = sounding_app();
    let mut handler = LocalSocketHandler::new(&cmds);

    handler.on_frame(FrameInfo::whole_text(11), b"STOP_BUZZER", 310_000);
    drain(&cmds, &mut app, &mut hw, &mut sink);

    let outbox = ChatOutbox::new();
    let mut client = ChatClient::new(OneShotUpdates(Some(STOP_UPDATE)), &config(), &cmds, &outbox);
    client.poll_commands(400_000).unwrap();
    drain(&cmds, &mut app, &mut hw, &mut sink);

    assert_eq!(app.alarm_state().stop_timestamp, 400_000);

    // 310 000 + cooldown has passed, 400 000 + cooldown has not.
    app.on_fix(OUTSIDE, 610_000, &mut hw, &mut sink);
    assert!(app.snapshot().manually_stopped);
    app.on_fix(OUTSIDE, 700_000, &mut hw, &mut sink);
    assert!(!app.snapshot().manually_stopped);
}
