//! Fuzz target: `LocalSocketHandler::on_frame`
//!
//! Drives arbitrary frame headers and payloads into the socket handler.
//! Invariants checked:
//! - No panics under any byte sequence
//! - A stop request is queued only for one complete `STOP_BUZZER` text frame
//! - Every queued request carries the local socket source
//!
//! cargo fuzz run fuzz_socket_message

#![no_main]

use geoguard::adapters::local_socket::{FrameInfo, LocalSocketHandler, STOP_MESSAGE};
use geoguard::app::commands::StopSource;
use geoguard::channels::CommandChannel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // First byte = flags, second = offset, third = length skew, rest = payload.
    let (header, payload) = data.split_at(3);
    let info = FrameInfo {
        fin: header[0] & 1 != 0,
        text: header[0] & 2 != 0,
        offset: header[1] as usize,
        total_len: payload.len().wrapping_add(header[2] as usize),
    };

    let commands = CommandChannel::new();
    let mut handler = LocalSocketHandler::new(&commands);
    let queued = handler.on_frame(info, payload, 7);

    let expected = info.fin
        && info.text
        && info.offset == 0
        && info.total_len == payload.len()
        && payload == STOP_MESSAGE;
    assert_eq!(queued, expected);

    match commands.try_receive() {
        Ok(req) => {
            assert!(queued);
            assert_eq!(req.source, StopSource::LocalSocket);
            assert_eq!(req.received_at, 7);
        }
        Err(_) => assert!(!queued),
    }
});
