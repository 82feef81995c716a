//! Page arithmetic for conversation lists and message history.

/// Normalised page request: pages start at 1, limits are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            limit: limit.filter(|l| *l > 0).unwrap_or(default_limit).max(1),
        }
    }

    /// Offset of the first item for forward pagination
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }

    pub fn has_next_page(&self, total: u64) -> bool {
        (self.page as u64) * (self.limit as u64) < total
    }
}

/// A slice `[start, end)` of a message history, counted from the oldest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageWindow {
    pub start: usize,
    pub end: usize,
    /// Older messages exist before `start`
    pub has_more: bool,
}

/// Reverse-chronological window: page 1 holds the newest `limit` messages and
/// each following page walks further back in history.
pub fn message_window(total: usize, request: PageRequest) -> MessageWindow {
    let page = request.page as usize;
    let limit = request.limit as usize;
    let end = total.saturating_sub((page - 1).saturating_mul(limit));
    let start = total.saturating_sub(page.saturating_mul(limit));
    MessageWindow {
        start,
        end,
        has_more: start > 0,
    }
}
