//! Text storage for the multi-line editor
//!
//! All text lives in one contiguous byte buffer. A table of
//! [`LineDescriptor`]s locates each logical line inside it: line `i` starts
//! at `offset` and spans `length` bytes, not counting the `'\n'` that ends
//! every line but the last. So for `i > 0`:
//!
//! ```text
//! lines[i].offset == lines[i - 1].offset + lines[i - 1].length + 1
//! ```
//!
//! and there is always exactly one more line than there are newlines.
//!
//! Every mutation edits the bytes and then shifts only the descriptors after
//! the edited line, so the table is never observed out of step with the
//! bytes. Positions outside the text are programmer errors and panic.

use serde::{Deserialize, Serialize};

/// Location of one logical line in the text buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDescriptor {
    /// Byte offset of the first byte of the line
    pub offset: usize,
    /// Bytes in the line, excluding the trailing newline
    pub length: usize,
}

impl LineDescriptor {
    /// Offset one past the last byte of the line
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A byte buffer with a line table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: Vec<u8>,
    lines: Vec<LineDescriptor>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer holding a single empty line
    pub fn new() -> Self {
        let mut lines = Vec::with_capacity(32);
        lines.push(LineDescriptor::default());
        Self {
            bytes: Vec::with_capacity(256),
            lines,
        }
    }

    /// Build a buffer from existing text
    pub fn from_bytes(text: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.bytes.extend_from_slice(text);
        buffer.lines.clear();

        let mut offset = 0;
        for line in text.split(|&b| b == b'\n') {
            buffer.lines.push(LineDescriptor {
                offset,
                length: line.len(),
            });
            offset += line.len() + 1;
        }
        buffer.check();
        buffer
    }

    /// The whole text
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total number of bytes, newlines included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer holds no text
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of logical lines (at least one)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line table
    pub fn lines(&self) -> &[LineDescriptor] {
        &self.lines
    }

    /// Descriptor of a line
    pub fn descriptor(&self, row: usize) -> Option<LineDescriptor> {
        self.lines.get(row).copied()
    }

    /// Bytes of a line, without its newline
    pub fn line(&self, row: usize) -> Option<&[u8]> {
        self.lines.get(row).map(|d| &self.bytes[d.offset..d.end()])
    }

    /// Length of a line, or 0 past the end
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |d| d.length)
    }

    /// Absolute byte offset of a (row, column) position
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the text.
    pub fn offset_of(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.lines.len(),
            "row {} out of range ({} lines)",
            row,
            self.lines.len()
        );
        let line = self.lines[row];
        assert!(
            col <= line.length,
            "column {} out of range (line {} has {} bytes)",
            col,
            row,
            line.length
        );
        line.offset + col
    }

    /// Insert a byte other than `'\n'` at a position
    pub fn insert(&mut self, row: usize, col: usize, byte: u8) {
        debug_assert!(byte != b'\n', "newlines go through split()");
        let at = self.offset_of(row, col);
        self.bytes.insert(at, byte);
        self.lines[row].length += 1;
        self.shift_after(row, 1);
        self.check();
    }

    /// Break a line in two at a position
    ///
    /// The row keeps the bytes before `col`; a new row after it receives
    /// the rest.
    pub fn split(&mut self, row: usize, col: usize) {
        let at = self.offset_of(row, col);
        self.bytes.insert(at, b'\n');

        let rest = self.lines[row].length - col;
        self.lines[row].length = col;
        self.lines.insert(
            row + 1,
            LineDescriptor {
                offset: at + 1,
                length: rest,
            },
        );
        self.shift_after(row + 1, 1);
        self.check();
    }

    /// Remove the byte at a position within a line
    ///
    /// Returns the removed byte.
    ///
    /// # Panics
    ///
    /// Panics if `col` is at or past the end of the line.
    pub fn remove(&mut self, row: usize, col: usize) -> u8 {
        let at = self.offset_of(row, col);
        assert!(
            col < self.lines[row].length,
            "no byte at column {} of line {}",
            col,
            row
        );
        let byte = self.bytes.remove(at);
        self.lines[row].length -= 1;
        self.shift_after(row, -1);
        self.check();
        byte
    }

    /// Join a line with the one after it by removing the newline between
    /// them
    ///
    /// Returns the length the row had before the join.
    ///
    /// # Panics
    ///
    /// Panics if `row` is the last line.
    pub fn join(&mut self, row: usize) -> usize {
        assert!(
            row + 1 < self.lines.len(),
            "line {} has no successor to join",
            row
        );
        let line = self.lines[row];
        self.bytes.remove(line.end());

        let next = self.lines.remove(row + 1);
        self.lines[row].length += next.length;
        self.shift_after(row, -1);
        self.check();
        line.length
    }

    /// Remove all text, leaving a single empty line
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.lines.clear();
        self.lines.push(LineDescriptor::default());
    }

    /// Take the text out of the buffer, leaving it empty
    pub fn take(&mut self) -> Vec<u8> {
        let bytes = std::mem::replace(&mut self.bytes, Vec::with_capacity(256));
        self.clear();
        bytes
    }

    /// Shift the offsets of every line after `row`
    fn shift_after(&mut self, row: usize, delta: isize) {
        for line in &mut self.lines[row + 1..] {
            line.offset = line.offset.wrapping_add_signed(delta);
        }
    }

    /// Verify the line table against the bytes (debug builds only)
    fn check(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(self.lines[0].offset, 0);
            for pair in self.lines.windows(2) {
                debug_assert_eq!(pair[1].offset, pair[0].end() + 1);
                debug_assert_eq!(self.bytes[pair[0].end()], b'\n');
            }
            let last = self.lines[self.lines.len() - 1];
            debug_assert_eq!(last.end(), self.bytes.len());
        }
    }
}
