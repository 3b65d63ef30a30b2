//! Terminal I/O layer
//!
//! Everything that touches the controlling terminal lives here: raw mode,
//! window size queries, unbuffered byte input and the escape sequences used
//! to move the cursor and clear the screen.
//!
//! The editors never write to the terminal directly. They build an
//! [`Output`] frame and hand it to [`Term::present`], and they receive input
//! as decoded [`Key`]s from [`Term::read_key`]. A `Term` can be built over
//! any [`ByteSource`] and any writer, which is how the tests drive the
//! editors with scripted keystrokes.

mod output;
mod raw;
mod source;

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crate::input::{Key, KeyReader};

pub use output::Output;
pub use raw::{enter_raw, exit_raw, is_raw, RawModeGuard};
pub use source::{ByteSource, StdinSource};

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("Terminal size is unavailable")]
    Unavailable,

    #[error("Standard input is not a terminal")]
    NotATty,

    #[error("Failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] nix::Error),

    #[error("Failed to poll terminal: {0}")]
    Poll(#[source] nix::Error),

    #[error("Input stream closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for terminal operations
pub type TermResult<T> = Result<T, TermError>;

/// Terminal window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub cols: u16,
    pub rows: u16,
}

impl WindowSize {
    /// Create a new window size
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Columns as a `usize`
    pub fn columns(&self) -> usize {
        usize::from(self.cols)
    }

    /// Rows as a `usize`
    pub fn lines(&self) -> usize {
        usize::from(self.rows)
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Query the size of the terminal attached to stdout
///
/// Fails with [`TermError::Unavailable`] when stdout is not a terminal or
/// the terminal reports a zero size.
pub fn query_size() -> TermResult<WindowSize> {
    let mut ws = nix::libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size and `ws`
    // outlives the call
    let result =
        unsafe { nix::libc::ioctl(nix::libc::STDOUT_FILENO, nix::libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Ok(WindowSize::new(ws.ws_col, ws.ws_row))
    } else {
        Err(TermError::Unavailable)
    }
}

/// A terminal: a key source, an output stream and a notion of size
pub struct Term<S, W> {
    keys: KeyReader<S>,
    out: W,
    /// Whether this is the real controlling terminal
    interactive: bool,
    /// Whether styling escapes should be emitted
    colors: bool,
    /// Size assumed when the terminal cannot report one
    fallback: WindowSize,
}

impl Term<StdinSource, io::Stdout> {
    /// The process' standard input and output
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal();
        let colors = crate::style::has_colors(&io::stdout());
        Self {
            keys: KeyReader::new(StdinSource::new()),
            out: io::stdout(),
            interactive,
            colors,
            fallback: WindowSize::default(),
        }
    }
}

impl<S: ByteSource, W: Write> Term<S, W> {
    /// A non-interactive terminal over an arbitrary source and writer
    ///
    /// Raw mode is never touched and the size is always the fallback.
    pub fn new(source: S, out: W) -> Self {
        Self {
            keys: KeyReader::new(source),
            out,
            interactive: false,
            colors: false,
            fallback: WindowSize::default(),
        }
    }

    /// Set the size used when the terminal does not report one
    pub fn with_fallback_size(mut self, size: WindowSize) -> Self {
        self.fallback = size;
        self
    }

    /// Set how long to wait for the rest of an escape sequence
    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.keys.set_escape_timeout(timeout);
        self
    }

    /// Whether this is the real controlling terminal
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Whether styling escapes are emitted
    pub fn has_colors(&self) -> bool {
        self.colors
    }

    /// Block until one logical key is available
    pub fn read_key(&mut self) -> TermResult<Key> {
        self.keys.read_key()
    }

    /// Query the real terminal size
    pub fn query_size(&self) -> TermResult<WindowSize> {
        if !self.interactive {
            return Err(TermError::Unavailable);
        }
        query_size()
    }

    /// The terminal size, or the fallback when it cannot be queried
    pub fn size(&self) -> WindowSize {
        match self.query_size() {
            Ok(size) => size,
            Err(e) => {
                tracing::trace!("Using fallback size {:?}: {}", self.fallback, e);
                self.fallback
            },
        }
    }

    /// Enter raw mode if this is a real terminal
    ///
    /// Returns `None` for non-interactive terminals, where there is no mode
    /// to change.
    pub fn enter_raw(&self) -> TermResult<Option<RawModeGuard>> {
        if !self.interactive {
            return Ok(None);
        }
        enter_raw().map(Some)
    }

    /// An empty frame configured for this terminal
    pub fn frame(&self) -> Output {
        let mut out = Output::new();
        out.set_colors(self.colors);
        out
    }

    /// Write a frame to the terminal and flush it
    pub fn present(&mut self, frame: &mut Output) -> TermResult<()> {
        if !frame.is_empty() {
            self.out.write_all(frame.as_bytes())?;
            frame.clear();
        }
        self.out.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Get a mutable reference to the underlying writer
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Get a mutable reference to the key reader
    pub fn keys_mut(&mut self) -> &mut KeyReader<S> {
        &mut self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_window_size() {
        let size = WindowSize::new(80, 24);
        assert_eq!(size.cols, 80);
        assert_eq!(size.rows, 24);
        assert_eq!(size.columns(), 80);
        assert_eq!(WindowSize::default(), size);
    }

    #[test]
    fn test_scripted_term_uses_fallback_size() {
        let term = Term::new(Cursor::new(Vec::new()), Vec::new())
            .with_fallback_size(WindowSize::new(40, 10));
        assert!(!term.is_interactive());
        assert!(matches!(term.query_size(), Err(TermError::Unavailable)));
        assert_eq!(term.size(), WindowSize::new(40, 10));
    }

    #[test]
    fn test_scripted_term_never_enters_raw_mode() {
        let term = Term::new(Cursor::new(Vec::new()), Vec::new());
        assert!(term.enter_raw().unwrap().is_none());
        assert!(!is_raw());
    }

    #[test]
    fn test_present_writes_and_clears_frame() {
        let mut term = Term::new(Cursor::new(Vec::new()), Vec::new());
        let mut frame = term.frame();
        frame.put_str("hello");
        frame.clear_to_eol();
        term.present(&mut frame).unwrap();
        assert!(frame.is_empty());
        assert_eq!(term.writer().as_slice(), b"hello\x1b[0K");
    }

    #[test]
    fn test_read_key_until_closed() {
        let mut term = Term::new(Cursor::new(b"a\r".to_vec()), Vec::new());
        assert_eq!(term.read_key().unwrap(), Key::Char(b'a'));
        assert_eq!(term.read_key().unwrap(), Key::Return);
        assert!(matches!(term.read_key(), Err(TermError::Closed)));
    }
}
