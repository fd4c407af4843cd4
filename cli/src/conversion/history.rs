//! # UnitXchange Conversion History
//!
//! File: cli/src/conversion/history.rs
//!
//! An insertion-ordered log of formatted conversions. The full list is kept until
//! `clear` is called; `recent` only exposes the most recent entries, newest first.
//!

/// Number of entries shown in the "Recent Conversions" panel.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<String>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// At most `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&str> {
        self.entries
            .iter()
            .rev()
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
