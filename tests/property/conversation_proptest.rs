//! Property-based tests for conversation visibility and read-state

use proptest::prelude::*;
use uuid::Uuid;

use huddle::shared::messaging::{ChatMessage, Conversation, Participants};

/// A conversation between two fresh users; `senders[i]` picks who sent message i
fn conversation(senders: &[bool]) -> (Conversation, Uuid, Uuid) {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut conversation = Conversation::new(Participants::new(a, b).unwrap());
    for (i, from_a) in senders.iter().enumerate() {
        let sender = if *from_a { a } else { b };
        conversation.messages.push(ChatMessage::new(sender, format!("m{i}"), Vec::new()));
    }
    (conversation, a, b)
}

proptest! {
    #[test]
    fn test_participants_ignore_order(_seed in any::<u8>()) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        prop_assert_eq!(Participants::new(a, b).unwrap(), Participants::new(b, a).unwrap());
        prop_assert!(Participants::new(a, a).is_err());
    }

    #[test]
    fn test_unread_counts_only_the_other_side(senders in prop::collection::vec(any::<bool>(), 0..40)) {
        let (conversation, a, b) = conversation(&senders);
        let from_a = senders.iter().filter(|s| **s).count();
        prop_assert_eq!(conversation.unread_count_for(b), from_a);
        prop_assert_eq!(conversation.unread_count_for(a), senders.len() - from_a);
    }

    #[test]
    fn test_mark_all_read_clears_reader_and_keeps_peer(senders in prop::collection::vec(any::<bool>(), 0..40)) {
        let (mut conversation, a, b) = conversation(&senders);
        let before_a = conversation.unread_count_for(a);

        let flipped = conversation.mark_all_read(b);
        prop_assert_eq!(flipped, senders.iter().filter(|s| **s).count());
        prop_assert_eq!(conversation.unread_count_for(b), 0);
        prop_assert_eq!(conversation.unread_count_for(a), before_a);
        prop_assert_eq!(conversation.mark_all_read(b), 0);
    }

    #[test]
    fn test_hiding_is_per_viewer(
        senders in prop::collection::vec(any::<bool>(), 1..30),
        hide in prop::collection::vec(any::<bool>(), 30),
    ) {
        let (mut conversation, a, b) = conversation(&senders);
        let mut hidden = 0;
        for (message, hide) in conversation.messages.iter_mut().zip(&hide) {
            if *hide {
                message.hide_for(a);
                hidden += 1;
            }
        }
        prop_assert_eq!(conversation.visible_messages(a).len(), senders.len() - hidden);
        prop_assert_eq!(conversation.visible_messages(b).len(), senders.len());
    }

    #[test]
    fn test_whole_conversation_delete_needs_both(senders in prop::collection::vec(any::<bool>(), 0..20)) {
        let (mut conversation, a, b) = conversation(&senders);
        conversation.hide_all_for(a);
        prop_assert!(conversation.visible_messages(a).is_empty());
        prop_assert!(!conversation.is_deleted_for_all());

        conversation.hide_all_for(b);
        prop_assert!(conversation.is_deleted_for_all());
        prop_assert!(conversation
            .messages
            .iter()
            .all(|m| m.is_hidden_for_all(&conversation.participants)));
    }

    #[test]
    fn test_archive_toggle_is_an_involution(flips in 1usize..10) {
        let (mut conversation, a, b) = conversation(&[]);
        for _ in 0..flips {
            conversation.toggle_archive(a);
        }
        prop_assert_eq!(conversation.is_archived_for(a), flips % 2 == 1);
        prop_assert!(!conversation.is_archived_for(b));
    }
}
