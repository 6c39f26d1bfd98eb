//! Recent generations strip
//!
//! A fixed-capacity FIFO, newest first. Only lives for the session.

use std::collections::VecDeque;

/// Maximum number of entries kept in the strip
pub const HISTORY_CAPACITY: usize = 6;

/// A single recent generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub image_url: String,
    pub prompt: String,
}

/// Ordered list of recent generations
#[derive(Debug, Clone)]
pub struct HistoryStrip {
    entries: VecDeque<HistoryItem>,
    capacity: usize,
}

impl Default for HistoryStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStrip {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend an entry, evicting the oldest ones beyond capacity
    pub fn push(&mut self, image_url: impl Into<String>, prompt: impl Into<String>) {
        self.entries.push_front(HistoryItem {
            image_url: image_url.into(),
            prompt: prompt.into(),
        });
        self.entries.truncate(self.capacity);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.entries.get(index)
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(strip: &HistoryStrip) -> Vec<&str> {
        strip.iter().map(|h| h.image_url.as_str()).collect()
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut strip = HistoryStrip::new();
        strip.push("/a.png", "first");
        strip.push("/b.png", "second");
        assert_eq!(urls(&strip), vec!["/b.png", "/a.png"]);
        assert_eq!(strip.get(0).map(|h| h.prompt.as_str()), Some("second"));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut strip = HistoryStrip::new();
        for i in 0..20 {
            strip.push(format!("/{}.png", i), format!("prompt {}", i));
            assert!(strip.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(strip.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_seventh_entry_evicts_oldest() {
        let mut strip = HistoryStrip::new();
        for i in 1..=7 {
            strip.push(format!("/{}.png", i), format!("prompt {}", i));
        }
        assert_eq!(
            urls(&strip),
            vec!["/7.png", "/6.png", "/5.png", "/4.png", "/3.png", "/2.png"]
        );
        assert!(strip.iter().all(|h| h.image_url != "/1.png"));
    }

    #[test]
    fn test_custom_capacity() {
        let mut strip = HistoryStrip::with_capacity(2);
        strip.push("/a.png", "a");
        strip.push("/b.png", "b");
        strip.push("/c.png", "c");
        assert_eq!(urls(&strip), vec!["/c.png", "/b.png"]);
        assert_eq!(strip.capacity(), 2);
    }
}
