//! Fuzz target: `parse_updates` + `Update::is_stop_command`
//!
//! Feeds arbitrary bytes as a `getUpdates` response body.  Neither the
//! parser nor the salvage scan may panic, and a stop command is only ever
//! recognised for the exact command text from the allowed chat.
//!
//! cargo fuzz run fuzz_chat_updates

#![no_main]

use geoguard::adapters::chat::{parse_updates, salvage_update_id, STOP_COMMAND};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = salvage_update_id(data);

    let Ok(updates) = parse_updates(data) else {
        return;
    };

    for update in &updates {
        let open = update.is_stop_command(None);
        let msg_text = update.message.as_ref().and_then(|m| m.text.as_deref());
        assert_eq!(open, msg_text == Some(STOP_COMMAND));

        // Restricting the chat can only ever narrow what is accepted.
        if let Some(chat) = update.message.as_ref().and_then(|m| m.chat) {
            assert_eq!(update.is_stop_command(Some(chat.id)), open);
            assert!(!update.is_stop_command(Some(chat.id.wrapping_add(1))));
        } else {
            assert!(!update.is_stop_command(Some(0)));
        }
    }
});
