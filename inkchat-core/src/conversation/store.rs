//! Bounded conversation history
//!
//! A ring buffer of wrapped messages with two limits: a slot capacity `N`
//! and a budget on the total number of stored lines. Both are enforced on
//! insert by evicting the oldest messages.

use heapless::{Deque, Vec};

use super::entry::ConversationEntry;

/// Vertical bubble sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BubbleMetrics {
    /// Padding above and below the content
    pub padding_y: u16,
    /// Gap between consecutive bubbles
    pub gap_y: u16,
    pub user_avatar_height: u16,
    pub counterpart_avatar_height: u16,
}

impl BubbleMetrics {
    fn avatar_height(&self, entry: &ConversationEntry) -> u16 {
        if entry.is_user() {
            self.user_avatar_height
        } else {
            self.counterpart_avatar_height
        }
    }
}

/// An entry selected for drawing, with its precomputed geometry
#[derive(Debug, Clone, Copy)]
pub struct VisibleEntry<'a> {
    pub entry: &'a ConversationEntry,
    /// Height of the text block
    pub text_height: u16,
    /// Full bubble height including padding
    pub bubble_height: u16,
}

/// Ring-buffered conversation history holding at most `N` messages
#[derive(Debug)]
pub struct ConversationStore<const N: usize> {
    entries: Deque<ConversationEntry, N>,
    total_lines: usize,
    max_history_lines: usize,
}

impl<const N: usize> ConversationStore<N> {
    /// Create an empty store that keeps at most `max_history_lines` lines
    pub const fn new(max_history_lines: usize) -> Self {
        Self {
            entries: Deque::new(),
            total_lines: 0,
            max_history_lines,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines stored across all entries
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn max_history_lines(&self) -> usize {
        self.max_history_lines
    }

    /// Change the line budget, evicting the oldest messages until it holds
    ///
    /// Returns how many messages were evicted.
    pub fn set_max_history_lines(&mut self, max_history_lines: usize) -> usize {
        self.max_history_lines = max_history_lines;
        let mut evicted = 0;
        while self.total_lines > self.max_history_lines && self.evict_oldest() {
            evicted += 1;
        }
        evicted
    }

    /// Entries oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_lines = 0;
    }

    fn evict_oldest(&mut self) -> bool {
        match self.entries.pop_front() {
            Some(old) => {
                self.total_lines -= old.line_count();
                true
            }
            None => false,
        }
    }

    /// Append a message, returning how many old messages were evicted
    ///
    /// A message longer than the whole line budget evicts everything,
    /// itself included.
    pub fn insert(&mut self, entry: ConversationEntry) -> usize {
        let mut evicted = 0;

        if self.entries.is_full() && self.evict_oldest() {
            evicted += 1;
        }

        let lines = entry.line_count();
        if self.entries.push_back(entry).is_ok() {
            self.total_lines += lines;
        }

        while self.total_lines > self.max_history_lines && self.evict_oldest() {
            evicted += 1;
        }

        evicted
    }

    /// Newest entries that fit in `budget_px`, in top-to-bottom draw order
    ///
    /// Walks newest to oldest and stops at the first entry that would
    /// overflow; the result is returned oldest first.
    pub fn visible_from_newest(
        &self,
        budget_px: u16,
        line_height: u16,
        metrics: &BubbleMetrics,
    ) -> Vec<VisibleEntry<'_>, N> {
        let mut visible: Vec<VisibleEntry<'_>, N> = Vec::new();
        let mut used: u32 = 0;

        for entry in self.entries.iter().rev() {
            let lines = entry.line_count().max(1) as u32;
            let text_height = lines * u32::from(line_height);
            let content = text_height.max(u32::from(metrics.avatar_height(entry)));
            let bubble_height = 2 * u32::from(metrics.padding_y) + content;

            let gap = if visible.is_empty() { 0 } else { u32::from(metrics.gap_y) };
            if used + gap + bubble_height > u32::from(budget_px) {
                break;
            }
            used += gap + bubble_height;

            let _ = visible.push(VisibleEntry {
                entry,
                text_height: text_height.min(u32::from(u16::MAX)) as u16,
                bubble_height: bubble_height.min(u32::from(u16::MAX)) as u16,
            });
        }

        visible.reverse();
        visible
    }
}
