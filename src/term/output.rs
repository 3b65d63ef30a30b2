//! Escape sequence output
//!
//! An [`Output`] is an in-memory frame of bytes destined for the terminal.
//! Every primitive appends to the frame and cannot fail; the frame is
//! written out in a single call by [`super::Term::present`].

use std::fmt;

use crate::style::{emit_style, Attribute};

/// A frame of terminal output
#[derive(Debug, Clone)]
pub struct Output {
    buf: Vec<u8>,
    /// Whether style attributes are emitted
    colors: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create an empty frame with styling enabled
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
            colors: true,
        }
    }

    /// Create an empty frame that drops style attributes
    pub fn plain() -> Self {
        Self {
            colors: false,
            ..Self::new()
        }
    }

    /// Enable or disable style attributes
    pub fn set_colors(&mut self, colors: bool) {
        self.colors = colors;
    }

    /// Get the bytes of this frame
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Take the bytes of this frame, leaving it empty
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Check if the frame is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard the frame contents
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append raw bytes
    pub fn put(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte
    pub fn put_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append a string
    pub fn put_str(&mut self, s: &str) {
        self.put(s.as_bytes());
    }

    /// Apply a style attribute (no-op when styling is disabled)
    pub fn style(&mut self, attr: Attribute) {
        if self.colors {
            // Writing into a Vec cannot fail
            let _ = emit_style(&mut self.buf, attr);
        }
    }

    fn csi(&mut self, n: usize, final_byte: char) {
        let _ = fmt::Write::write_fmt(self, format_args!("\x1b[{}{}", n, final_byte));
    }

    /// Move the cursor up by `n` rows (CUU)
    pub fn cursor_up(&mut self, n: usize) {
        if n > 0 {
            self.csi(n, 'A');
        }
    }

    /// Move the cursor down by `n` rows (CUD)
    pub fn cursor_down(&mut self, n: usize) {
        if n > 0 {
            self.csi(n, 'B');
        }
    }

    /// Move the cursor right by `n` columns (CUF)
    pub fn cursor_right(&mut self, n: usize) {
        if n > 0 {
            self.csi(n, 'C');
        }
    }

    /// Move the cursor left by `n` columns (CUB)
    pub fn cursor_left(&mut self, n: usize) {
        if n > 0 {
            self.csi(n, 'D');
        }
    }

    /// Move the cursor relative to its current position
    pub fn move_by(&mut self, dx: isize, dy: isize) {
        if dx < 0 {
            self.cursor_left(dx.unsigned_abs());
        } else {
            self.cursor_right(dx.unsigned_abs());
        }
        if dy < 0 {
            self.cursor_up(dy.unsigned_abs());
        } else {
            self.cursor_down(dy.unsigned_abs());
        }
    }

    /// Move the cursor to a 0-indexed column and row (CUP)
    pub fn move_to(&mut self, x: usize, y: usize) {
        let _ = fmt::Write::write_fmt(self, format_args!("\x1b[{};{}H", y + 1, x + 1));
    }

    /// Move the cursor to the top left corner
    pub fn home(&mut self) {
        self.put(b"\x1b[H");
    }

    /// Return to the first column
    pub fn carriage_return(&mut self) {
        self.put_byte(b'\r');
    }

    /// Start a new line in raw mode (CR LF)
    pub fn newline(&mut self) {
        self.put(b"\r\n");
    }

    /// Erase the whole current line (EL 2)
    pub fn clear_line(&mut self) {
        self.put(b"\x1b[2K");
    }

    /// Erase from the cursor to the end of the line (EL 0)
    pub fn clear_to_eol(&mut self) {
        self.put(b"\x1b[0K");
    }

    /// Erase the whole screen (ED 2)
    pub fn clear_screen(&mut self) {
        self.put(b"\x1b[2J");
    }

    /// Switch to or from the alternate screen buffer
    pub fn alternate_screen(&mut self, enabled: bool) {
        if enabled {
            self.put(b"\x1b[?1049h");
        } else {
            self.put(b"\x1b[?1049l");
        }
    }
}

impl fmt::Write for Output {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s);
        Ok(())
    }
}
