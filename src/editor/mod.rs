//! Multi-line buffer editor
//!
//! An [`Editor`] owns a [`TextBuffer`] and tracks two positions on top of
//! it: the cursor, relative to the visible text area, and the viewport
//! offset, the scroll position of that area. The absolute position in the
//! text is always `offset + cursor`.
//!
//! Every operation that moves the cursor goes through one placement step
//! which scrolls the viewport so the cursor stays visible, so after any
//! call:
//!
//! - `offset.y + cursor.y < line_count()`
//! - `offset.x + cursor.x <= line length`
//! - `cursor.y < visible rows`, `cursor.x <= visible columns`
//!
//! Horizontal scrolling moves in steps of [`SCROLL_STEP`] columns and keeps
//! a margin of [`SCROLL_MARGIN`] columns at the right edge.

mod render;
mod snapshot;
mod text;

use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::term::WindowSize;

pub use snapshot::EditorSnapshot;
pub use text::{LineDescriptor, TextBuffer};

/// Width of the line-number gutter
pub const GUTTER: usize = 4;
/// Screen rows above the text: the title bar and a blank row
pub const HEADER: usize = 2;
/// Columns scrolled at a time when the cursor leaves the view
pub const SCROLL_STEP: usize = 20;
/// Columns kept free at the right edge of the view
pub const SCROLL_MARGIN: usize = 2;
/// Tab stops for the Tab key
pub const TAB_WIDTH: usize = 4;

/// A column/row pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A span of one line rendered with emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    /// Logical line
    pub line: usize,
    /// First highlighted column
    pub column: usize,
    /// Number of highlighted columns
    pub length: usize,
}

/// Result of feeding a key to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Keep editing
    Continue,
    /// Return was pressed (the newline has been inserted)
    Submit,
    /// Ctrl-D was pressed
    Cancelled,
    /// Up was pressed on the first line
    Top,
    /// Down was pressed on the last line
    Bottom,
}

/// A multi-line text editor with a scrolling viewport
#[derive(Debug, Clone)]
pub struct Editor {
    title: String,
    text: TextBuffer,
    /// Cursor relative to the viewport
    cursor: Point,
    /// Scroll position of the viewport
    offset: Point,
    size: WindowSize,
    highlight: Option<HighlightSpan>,
}

impl Editor {
    /// Create an empty editor for a window of the given size
    pub fn new(title: impl Into<String>, size: WindowSize) -> Self {
        Self {
            title: title.into(),
            text: TextBuffer::new(),
            cursor: Point::default(),
            offset: Point::default(),
            size,
            highlight: None,
        }
    }

    /// Editor title shown in the title bar
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The text buffer
    pub fn buffer(&self) -> &TextBuffer {
        &self.text
    }

    /// The whole text
    pub fn text(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Bytes of a line, without its newline
    pub fn line(&self, row: usize) -> Option<&[u8]> {
        self.text.line(row)
    }

    /// Number of logical lines
    pub fn line_count(&self) -> usize {
        self.text.line_count()
    }

    /// Cursor relative to the viewport
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Viewport scroll position
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Absolute cursor position as (row, column)
    pub fn position(&self) -> (usize, usize) {
        (self.offset.y + self.cursor.y, self.offset.x + self.cursor.x)
    }

    /// Window size the editor lays itself out for
    pub fn size(&self) -> WindowSize {
        self.size
    }

    /// The highlighted span, if any
    pub fn highlight(&self) -> Option<HighlightSpan> {
        self.highlight
    }

    /// Set or clear the highlighted span
    pub fn set_highlight(&mut self, span: Option<HighlightSpan>) {
        self.highlight = span;
    }

    /// Rows available for text
    pub fn text_rows(&self) -> usize {
        self.size.lines().saturating_sub(HEADER).max(1)
    }

    /// Columns available for text
    pub fn text_columns(&self) -> usize {
        self.size.columns().saturating_sub(GUTTER).max(1)
    }

    /// Insert a byte at the cursor
    pub fn insert_char(&mut self, byte: u8) {
        if byte == b'\n' {
            self.insert_newline();
            return;
        }
        let (row, col) = self.position();
        self.text.insert(row, col, byte);
        self.place(row, col + 1);
    }

    /// Break the line at the cursor and move to the start of the new line
    pub fn insert_newline(&mut self) {
        let (row, col) = self.position();
        self.text.split(row, col);
        self.place(row + 1, 0);
    }

    /// Insert text at the cursor
    pub fn insert_str(&mut self, text: &[u8]) {
        for &byte in text {
            self.insert_char(byte);
        }
    }

    /// Erase the byte before the cursor, joining with the previous line at
    /// column 0
    pub fn backspace(&mut self) {
        let (row, col) = self.position();
        if col > 0 {
            self.text.remove(row, col - 1);
            self.place(row, col - 1);
        } else if row > 0 {
            let joined_at = self.text.join(row - 1);
            self.place(row - 1, joined_at);
        }
    }

    /// Erase the byte under the cursor, joining with the next line at the
    /// end of a line
    pub fn delete_forward(&mut self) {
        let (row, col) = self.position();
        if col < self.text.line_len(row) {
            self.text.remove(row, col);
        } else if row + 1 < self.text.line_count() {
            self.text.join(row);
        }
        self.place(row, col);
    }

    /// Remove all text and reset the cursor and viewport
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = Point::default();
        self.offset = Point::default();
    }

    /// Take the text out of the editor, leaving it empty
    pub fn flush(&mut self) -> Vec<u8> {
        let text = self.text.take();
        self.cursor = Point::default();
        self.offset = Point::default();
        text
    }

    /// Replace the whole text, leaving the cursor at its end
    pub fn replace(&mut self, text: &[u8]) {
        self.clear();
        self.insert_str(text);
    }

    /// Move to an absolute position, clamped to the text
    pub fn move_to(&mut self, row: usize, col: usize) {
        let row = row.min(self.text.line_count() - 1);
        let col = col.min(self.text.line_len(row));
        self.place(row, col);
    }

    /// Move up one line; returns false on the first line
    pub fn move_up(&mut self) -> bool {
        let (row, col) = self.position();
        if row == 0 {
            return false;
        }
        self.move_to(row - 1, col);
        true
    }

    /// Move down one line; returns false on the last line
    pub fn move_down(&mut self) -> bool {
        let (row, col) = self.position();
        if row + 1 >= self.text.line_count() {
            return false;
        }
        self.move_to(row + 1, col);
        true
    }

    /// Move left, wrapping to the end of the previous line
    pub fn move_left(&mut self) {
        let (row, col) = self.position();
        if col > 0 {
            self.place(row, col - 1);
        } else if row > 0 {
            self.place(row - 1, self.text.line_len(row - 1));
        }
    }

    /// Move right, wrapping to the start of the next line
    pub fn move_right(&mut self) {
        let (row, col) = self.position();
        if col < self.text.line_len(row) {
            self.place(row, col + 1);
        } else if row + 1 < self.text.line_count() {
            self.place(row + 1, 0);
        }
    }

    /// Move to the start of the line
    pub fn home(&mut self) {
        let (row, _) = self.position();
        self.place(row, 0);
    }

    /// Move to the end of the line
    pub fn end(&mut self) {
        let (row, _) = self.position();
        self.place(row, self.text.line_len(row));
    }

    /// Move up one screen
    pub fn page_up(&mut self) {
        let (row, col) = self.position();
        self.move_to(row.saturating_sub(self.text_rows()), col);
    }

    /// Move down one screen
    pub fn page_down(&mut self) {
        let (row, col) = self.position();
        self.move_to(row + self.text_rows(), col);
    }

    /// Scroll the viewport so the cursor is visible
    pub fn keep_in_view(&mut self) {
        let (row, col) = self.position();
        self.place(row, col);
    }

    /// Lay the editor out for a new window size
    pub fn resize(&mut self, size: WindowSize) {
        self.size = size;
        self.keep_in_view();
    }

    /// Apply one key
    pub fn update(&mut self, key: Key) -> Status {
        match key {
            Key::Return => {
                self.insert_newline();
                return Status::Submit;
            },
            Key::Ctrl(b'd') => return Status::Cancelled,
            Key::Up => {
                if !self.move_up() {
                    return Status::Top;
                }
            },
            Key::Down => {
                if !self.move_down() {
                    return Status::Bottom;
                }
            },
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.home(),
            Key::End => self.end(),
            Key::PageUp => self.page_up(),
            Key::PageDown => self.page_down(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Tab => {
                let (_, col) = self.position();
                for _ in 0..TAB_WIDTH - col % TAB_WIDTH {
                    self.insert_char(b' ');
                }
            },
            Key::Char(byte) => self.insert_char(byte),
            Key::Ctrl(_) | Key::Escape | Key::Unknown => {},
        }
        Status::Continue
    }

    /// Capture the editor state
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot::from_editor(self)
    }

    /// Put the cursor at an absolute position and scroll to keep it visible
    fn place(&mut self, row: usize, col: usize) {
        debug_assert!(row < self.text.line_count());
        debug_assert!(col <= self.text.line_len(row));

        let rows = self.text_rows();
        if row < self.offset.y {
            self.offset.y = row;
        } else if row >= self.offset.y + rows {
            self.offset.y = row + 1 - rows;
        }

        let max_x = self.text_columns().saturating_sub(SCROLL_MARGIN).max(1);
        if col > self.offset.x + max_x {
            let overflow = col - self.offset.x - max_x;
            self.offset.x += overflow.div_ceil(SCROLL_STEP) * SCROLL_STEP;
        } else if col < self.offset.x {
            let underflow = self.offset.x - col;
            self.offset.x = self
                .offset
                .x
                .saturating_sub(underflow.div_ceil(SCROLL_STEP) * SCROLL_STEP);
        }
        // A step larger than the view can overshoot
        self.offset.x = self.offset.x.min(col).max(col.saturating_sub(max_x));

        self.cursor = Point::new(col - self.offset.x, row - self.offset.y);
    }
}
