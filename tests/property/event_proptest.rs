//! Property-based tests for client frames

use proptest::prelude::*;
use uuid::Uuid;

use huddle::shared::{ClientFrame, EventType};

proptest! {
    #[test]
    fn test_target_is_read_from_frame_data(text in ".*") {
        let target = Uuid::new_v4();
        let raw = serde_json::json!({
            "event": "newMessage",
            "data": { "targetUserId": target, "text": text }
        });
        let frame: ClientFrame = serde_json::from_value(raw).unwrap();
        prop_assert_eq!(frame.target_user_id(), Some(target));
        prop_assert!(frame.event.is_relayable());
    }

    #[test]
    fn test_malformed_target_is_none(target in "[a-z]{0,12}") {
        let raw = serde_json::json!({
            "event": "messageDeleted",
            "data": { "targetUserId": target }
        });
        let frame: ClientFrame = serde_json::from_value(raw).unwrap();
        prop_assert_eq!(frame.target_user_id(), None);
    }
}

#[test]
fn test_presence_is_server_only() {
    assert!(!EventType::FriendOnlineStatus.is_relayable());
    assert!(EventType::MessageDeleted.is_relayable());
}
