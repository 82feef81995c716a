//! Property-based tests for paging arithmetic

use proptest::prelude::*;
use huddle::shared::messaging::{message_window, PageRequest};

proptest! {
    #[test]
    fn test_history_pages_cover_every_message_once(total in 0usize..200, limit in 1u32..30) {
        let mut seen = vec![0u8; total];
        let mut page = 1u32;
        loop {
            let window = message_window(total, PageRequest::new(Some(page), Some(limit), 20));
            prop_assert!(window.start <= window.end);
            prop_assert!(window.end - window.start <= limit as usize);
            for slot in &mut seen[window.start..window.end] {
                *slot += 1;
            }
            if !window.has_more {
                break;
            }
            page += 1;
        }
        prop_assert!(seen.iter().all(|count| *count == 1));
    }

    #[test]
    fn test_first_page_ends_at_newest(total in 1usize..200, limit in 1u32..30) {
        let window = message_window(total, PageRequest::new(None, Some(limit), 20));
        prop_assert_eq!(window.end, total);
    }

    #[test]
    fn test_next_page_flag_matches_total_pages(total in 0u64..500, page in 1u32..40, limit in 1u32..30) {
        let request = PageRequest::new(Some(page), Some(limit), 10);
        prop_assert_eq!(request.has_next_page(total), (page as u64) < request.total_pages(total));
    }

    #[test]
    fn test_zero_page_and_limit_fall_back(default in 1u32..50) {
        let request = PageRequest::new(Some(0), Some(0), default);
        prop_assert_eq!(request.page, 1);
        prop_assert_eq!(request.limit, default);
    }
}
