use crate::config::DEFAULT_MAX_ENTRIES;
use std::collections::HashSet;
use tracing::debug;

/// Executed command lines, oldest first, each distinct line kept once at
/// the position it was most recently executed.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<String>,
    max_entries: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store that keeps at most `max_entries` lines.
    pub fn with_capacity(max_entries: usize) -> Self {
        HistoryStore {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record an executed line as the newest entry.
    ///
    /// Returns `false` and leaves the store untouched for an empty line.
    pub fn add(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|e| e == line) {
            self.entries.remove(pos);
        }
        self.entries.push(line.to_string());
        self.truncate_oldest();
        debug!("history add: {line:?} ({} entries)", self.entries.len());
        true
    }

    /// Append many lines, oldest first, with the same rules as [`HistoryStore::add`].
    pub fn extend<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut combined = std::mem::take(&mut self.entries);
        let before = combined.len();
        combined.extend(lines.into_iter().filter(|l| !l.is_empty()));
        let added = combined.len() - before;

        // Keep the newest occurrence of each line.
        let mut seen = HashSet::new();
        let mut newest_first: Vec<String> = combined
            .into_iter()
            .rev()
            .filter(|line| seen.insert(line.clone()))
            .collect();
        newest_first.reverse();
        self.entries = newest_first;
        self.truncate_oldest();
        debug!("history extend: {added} lines ({} entries)", self.entries.len());
        added
    }

    fn truncate_oldest(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// The most recently executed line.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
