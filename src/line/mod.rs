//! Single-line editor
//!
//! A readline-style editor for one line of input. Keys are mapped to
//! [`Action`]s by [`binding`] and applied to a [`LineBuffer`].
//!
//! Output is kept minimal: an edit at the cursor repaints only the tail of
//! the line from the cursor onwards, followed by one erase-to-end-of-line,
//! and then steps the terminal cursor back. The cost of a keystroke does
//! not grow with the distance of the cursor from the start of the line.
//!
//! Control bytes in the line are shown as `^X` and take two columns.

mod binding;
mod buffer;

use std::io::Write;

use crate::history::{History, Recall};
use crate::input::Key;
use crate::style::{Attribute, Color};
use crate::term::{ByteSource, Output, Term, TermError, TermResult};

pub use binding::{binding, Action};
pub use buffer::LineBuffer;

/// Result of feeding a key to the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep editing
    Continue,
    /// A line was submitted; it ends with `'\n'`
    Submit(String),
    /// End of input
    Done,
}

/// Columns a byte occupies on screen
fn width(byte: u8) -> usize {
    if is_control(byte) {
        2
    } else {
        1
    }
}

fn is_control(byte: u8) -> bool {
    byte < 0x20 || byte == 0x7f
}

fn width_of(bytes: &[u8]) -> usize {
    bytes.iter().map(|&b| width(b)).sum()
}

/// Write bytes as they appear on screen
fn put_display(out: &mut Output, bytes: &[u8]) {
    for &byte in bytes {
        if is_control(byte) {
            out.style(Attribute::Fg(Color::BrightBlack));
            out.put_byte(b'^');
            out.put_byte(byte ^ 0x40);
            out.style(Attribute::Fg(Color::Default));
        } else {
            out.put_byte(byte);
        }
    }
}

/// A single-line editor with history
#[derive(Debug, Clone)]
pub struct LineEditor {
    prompt: String,
    buffer: LineBuffer,
    /// Byte offset of the cursor in the buffer
    cursor: usize,
    history: History,
    /// Record submitted lines in the history
    auto_history: bool,
}

impl LineEditor {
    /// Create an editor with the default history capacity
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_history(prompt, History::default())
    }

    /// Create an editor using an existing history
    pub fn with_history(prompt: impl Into<String>, history: History) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: LineBuffer::new(),
            cursor: 0,
            history,
            auto_history: true,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Enable or disable recording submitted lines
    pub fn set_auto_history(&mut self, enabled: bool) {
        self.auto_history = enabled;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// The line being edited
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Byte offset of the cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start a new line: reset the state and draw the prompt
    pub fn begin(&mut self, out: &mut Output) {
        self.buffer.clear();
        self.cursor = 0;
        self.history.reset_cursor();
        out.put_str(&self.prompt);
    }

    /// Apply one key, writing the screen update to `out`
    pub fn feed(&mut self, key: Key, out: &mut Output) -> Outcome {
        let action = binding(key, self.buffer.is_empty());
        if action.is_edit() {
            self.history.reset_cursor();
        }

        match action {
            Action::Insert(byte) => {
                self.buffer.insert(self.cursor, byte);
                let from = self.cursor;
                self.cursor += 1;
                self.repaint_from(out, from);
            },
            Action::Submit => return Outcome::Submit(self.submit(out)),
            Action::Done => {
                out.put_str("^D");
                out.newline();
                return Outcome::Done;
            },
            Action::Clear => {
                out.put_str("^C");
                out.newline();
                self.begin(out);
            },
            Action::Refresh => self.refresh(out),
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    if let Some(byte) = self.buffer.erase(self.cursor) {
                        out.cursor_left(width(byte));
                    }
                    self.repaint_from(out, self.cursor);
                }
            },
            Action::Delete => {
                if self.buffer.erase(self.cursor).is_some() {
                    self.repaint_from(out, self.cursor);
                }
            },
            Action::Left => {
                if let Some(byte) = self.cursor.checked_sub(1).and_then(|i| self.buffer.get(i)) {
                    out.cursor_left(width(byte));
                    self.cursor -= 1;
                }
            },
            Action::Right => {
                if let Some(byte) = self.buffer.get(self.cursor) {
                    out.cursor_right(width(byte));
                    self.cursor += 1;
                }
            },
            Action::Home => {
                out.cursor_left(width_of(&self.buffer.as_bytes()[..self.cursor]));
                self.cursor = 0;
            },
            Action::End => {
                out.cursor_right(width_of(&self.buffer.as_bytes()[self.cursor..]));
                self.cursor = self.buffer.len();
            },
            Action::KillToEnd => {
                self.buffer.truncate(self.cursor);
                out.clear_to_eol();
            },
            Action::KillToStart => {
                out.cursor_left(width_of(&self.buffer.as_bytes()[..self.cursor]));
                self.buffer.drain(0..self.cursor);
                self.cursor = 0;
                self.repaint_from(out, 0);
            },
            Action::HistoryPrev => {
                if let Some(entry) = self.history.older().map(|e| e.as_bytes().to_vec()) {
                    self.replace_line(out, &entry);
                }
            },
            Action::HistoryNext => match self.history.newer() {
                Recall::Entry(entry) => {
                    let entry = entry.as_bytes().to_vec();
                    self.replace_line(out, &entry);
                },
                Recall::Live => self.replace_line(out, b""),
                Recall::Unchanged => {},
            },
            Action::Ignore => {},
        }
        Outcome::Continue
    }

    /// Read one line from a terminal
    ///
    /// Returns `None` at end of input. Raw mode is held for the duration of
    /// the call when the terminal is interactive.
    pub fn read_line<S: ByteSource, W: Write>(
        &mut self,
        term: &mut Term<S, W>,
    ) -> TermResult<Option<String>> {
        let _guard = term.enter_raw()?;
        let mut out = term.frame();
        self.begin(&mut out);
        term.present(&mut out)?;

        loop {
            let outcome = match term.read_key() {
                Ok(key) => self.feed(key, &mut out),
                // Input ended without a Return: submit what was typed
                Err(TermError::Closed) if !self.buffer.is_empty() => {
                    Outcome::Submit(self.submit(&mut out))
                },
                Err(TermError::Closed) => Outcome::Done,
                Err(e) => return Err(e),
            };
            term.present(&mut out)?;

            match outcome {
                Outcome::Continue => {},
                Outcome::Submit(line) => return Ok(Some(line)),
                Outcome::Done => return Ok(None),
            }
        }
    }

    fn submit(&mut self, out: &mut Output) -> String {
        out.newline();
        self.cursor = 0;
        let mut bytes = self.buffer.take();
        bytes.push(b'\n');
        let line = String::from_utf8_lossy(&bytes).into_owned();
        if self.auto_history {
            self.history.push(&line);
        }
        self.history.reset_cursor();
        line
    }

    /// Redraw the prompt and the whole line
    fn refresh(&mut self, out: &mut Output) {
        out.carriage_return();
        out.clear_line();
        out.put_str(&self.prompt);
        put_display(out, self.buffer.as_bytes());
        out.cursor_left(width_of(&self.buffer.as_bytes()[self.cursor..]));
    }

    /// Swap in new line contents with the cursor at the end
    fn replace_line(&mut self, out: &mut Output, bytes: &[u8]) {
        out.cursor_left(width_of(&self.buffer.as_bytes()[..self.cursor]));
        self.buffer.set(bytes);
        self.cursor = self.buffer.len();
        self.repaint_from(out, 0);
    }

    /// Repaint the line from byte `from`, where the terminal cursor is,
    /// and leave the terminal cursor at `self.cursor`
    fn repaint_from(&self, out: &mut Output, from: usize) {
        debug_assert!(from <= self.cursor);
        let bytes = self.buffer.as_bytes();
        put_display(out, &bytes[from..]);
        out.clear_to_eol();
        out.cursor_left(width_of(&bytes[self.cursor..]));
    }
}
