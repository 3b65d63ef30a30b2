//! Submission history
//!
//! A bounded list of past submissions, newest first. Pushing past the
//! capacity evicts the oldest entry. A navigation cursor walks the list for
//! Up/Down recall and is reset by any edit or submission.
//!
//! On disk a history is one entry per line, oldest first. Newlines and
//! backslashes inside an entry are written as `\n` and `\\` so a
//! multi-line entry stays on one line.

use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 32;

/// Error type for history persistence
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for history persistence
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Outcome of stepping toward newer entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// A newer entry to show
    Entry(&'a str),
    /// Stepped past the newest entry: back to the live (empty) line
    Live,
    /// Not navigating; nothing changes
    Unchanged,
}

/// Bounded newest-first history
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    /// Index of the entry being shown, `None` when not navigating
    current: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Create an empty history holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            current: None,
        }
    }

    /// Record a submission
    ///
    /// Trailing spaces, tabs and line endings are trimmed. Entries that are
    /// empty after trimming are not recorded. Returns whether the entry was
    /// kept.
    pub fn push(&mut self, line: &str) -> bool {
        self.current = None;

        let trimmed = line.trim_end_matches([' ', '\t', '\r', '\n']);
        if trimmed.is_empty() || self.capacity == 0 {
            return false;
        }

        self.entries.push_front(trimmed.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    /// Step one entry toward older submissions
    ///
    /// Returns the entry to show, or `None` when already at the oldest
    /// entry (or the history is empty).
    pub fn older(&mut self) -> Option<&str> {
        let next = match self.current {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return None;
        }
        self.current = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step one entry toward newer submissions
    pub fn newer(&mut self) -> Recall<'_> {
        match self.current {
            None => Recall::Unchanged,
            Some(0) => {
                self.current = None;
                Recall::Live
            },
            Some(i) => {
                self.current = Some(i - 1);
                self.entries
                    .get(i - 1)
                    .map_or(Recall::Live, |e| Recall::Entry(e.as_str()))
            },
        }
    }

    /// Stop navigating
    pub fn reset_cursor(&mut self) {
        self.current = None;
    }

    /// Index of the entry being shown, if navigating
    pub fn cursor(&self) -> Option<usize> {
        self.current
    }

    /// Get an entry by age (0 is the newest)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Iterate oldest first (file order)
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    /// Load entries from a file, oldest first
    ///
    /// A missing or unreadable file is treated as an empty history. Returns
    /// the number of entries recorded.
    pub fn load(&mut self, path: &Path) -> usize {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("No history loaded from {}: {}", path.display(), e);
                return 0;
            },
        };

        let mut loaded = 0;
        for line in data.split(|&b| b == b'\n') {
            if self.push(&String::from_utf8_lossy(&unescape(line))) {
                loaded += 1;
            }
        }
        tracing::debug!("Loaded {} history entries from {}", loaded, path.display());
        loaded
    }

    /// Write every entry to a file, oldest first
    pub fn save(&self, path: &Path) -> HistoryResult<()> {
        let mut file = fs::File::create(path)?;
        for entry in self.iter_oldest_first() {
            file.write_all(&escape(entry.as_bytes()))?;
            file.write_all(b"\n")?;
        }
        file.flush()?;
        tracing::debug!("Saved {} history entries to {}", self.len(), path.display());
        Ok(())
    }
}

/// Encode an entry as a single file line
fn escape(entry: &[u8]) -> Vec<u8> {
    let mut line = Vec::with_capacity(entry.len());
    for &b in entry {
        match b {
            b'\\' => line.extend_from_slice(b"\\\\"),
            b'\n' => line.extend_from_slice(b"\\n"),
            _ => line.push(b),
        }
    }
    line
}

/// Decode a file line written by [`escape`]
///
/// Unknown escapes and a trailing backslash are kept as they are.
fn unescape(line: &[u8]) -> Vec<u8> {
    let mut entry = Vec::with_capacity(line.len());
    let mut bytes = line.iter().copied();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            entry.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => entry.push(b'\n'),
            Some(b'\\') => entry.push(b'\\'),
            Some(other) => entry.extend_from_slice(&[b'\\', other]),
            None => entry.push(b'\\'),
        }
    }
    entry
}
