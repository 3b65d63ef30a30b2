//! Growable byte buffer for one line of input

use std::ops::Range;

/// The bytes of the line being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty line
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(64),
        }
    }

    /// Number of bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bytes of the line
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte at an offset
    pub fn get(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    /// Insert a byte at an offset
    ///
    /// # Panics
    ///
    /// Panics if `at > len()`.
    pub fn insert(&mut self, at: usize, byte: u8) {
        assert!(at <= self.bytes.len(), "insert at {} past end of line", at);
        self.bytes.insert(at, byte);
    }

    /// Erase the byte at an offset, if there is one
    pub fn erase(&mut self, at: usize) -> Option<u8> {
        (at < self.bytes.len()).then(|| self.bytes.remove(at))
    }

    /// Remove a range of bytes
    pub fn drain(&mut self, range: Range<usize>) {
        self.bytes.drain(range);
    }

    /// Cut the line at an offset
    pub fn truncate(&mut self, at: usize) {
        self.bytes.truncate(at);
    }

    /// Replace the contents
    pub fn set(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }

    /// Remove every byte
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Take the contents, leaving the line empty
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.bytes, Vec::with_capacity(64))
    }
}
