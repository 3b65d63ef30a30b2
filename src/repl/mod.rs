//! REPL driver
//!
//! A [`Repl`] owns one editor, single-line or multi-line, and a history of
//! submissions that can be persisted to a file between sessions.
//!
//! In multi-line mode Return only submits once every `(` and `{` has been
//! closed. Until then it starts a new line indented by the nesting depth.
//! Up on the first line and Down on the last line walk the history.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app::Config;
use crate::editor::{Editor, Status};
use crate::history::{History, HistoryError, Recall, DEFAULT_CAPACITY};
use crate::input::Key;
use crate::line::LineEditor;
use crate::term::{ByteSource, Term, TermError, TermResult, WindowSize};

/// Default spaces per nesting level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Error type for the REPL driver
#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    #[error("Terminal error: {0}")]
    Term(#[from] TermError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Result type for the REPL driver
pub type ReplResult<T> = Result<T, ReplError>;

/// Which editor the REPL reads with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Single-line editor in the main screen
    #[default]
    Line,
    /// Full-screen multi-line editor in the alternate screen
    Multiline,
}

/// Count of `(` and `{` not closed by a later `)` or `}`
///
/// Stray closing brackets never take the depth below zero.
pub fn nesting_depth(text: &[u8]) -> usize {
    text.iter().fold(0usize, |depth, &byte| match byte {
        b'(' | b'{' => depth + 1,
        b')' | b'}' => depth.saturating_sub(1),
        _ => depth,
    })
}

#[derive(Debug)]
enum ReplEditor {
    Line(LineEditor),
    Buffer { editor: Editor, history: History },
}

/// A read-eval-print loop input driver
#[derive(Debug)]
pub struct Repl {
    editor: ReplEditor,
    indent_width: usize,
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Create a REPL keeping at most `capacity` history entries
    pub fn new(mode: Mode, capacity: usize) -> Self {
        let history = History::new(capacity);
        let editor = match mode {
            Mode::Line => ReplEditor::Line(LineEditor::with_history("> ", history)),
            Mode::Multiline => ReplEditor::Buffer {
                editor: Editor::new("repl", WindowSize::default()),
                history,
            },
        };
        Self {
            editor,
            indent_width: DEFAULT_INDENT_WIDTH,
            history_file: None,
        }
    }

    /// Create a REPL from a configuration, loading its history file
    pub fn from_config(config: &Config) -> Self {
        let mode = if config.editor.multiline {
            Mode::Multiline
        } else {
            Mode::Line
        };
        let mut repl = Self::new(mode, config.history.capacity)
            .with_prompt(&config.editor.prompt)
            .with_title(&config.editor.title)
            .with_indent_width(config.editor.indent_width);
        if let Some(path) = &config.history.file {
            repl = repl.with_history_file(path);
        }
        repl
    }

    /// Set the prompt of the single-line editor
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        if let ReplEditor::Line(line) = &mut self.editor {
            line.set_prompt(prompt);
        }
        self
    }

    /// Set the title of the multi-line editor
    pub fn with_title(mut self, title: &str) -> Self {
        if let ReplEditor::Buffer { editor, .. } = &mut self.editor {
            editor.set_title(title);
        }
        self
    }

    /// Set the spaces inserted per nesting level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Load history from a file and save it there on [`Repl::stop`]
    ///
    /// A missing file is an empty history.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.history_mut().load(&path);
        self.history_file = Some(path);
        self
    }

    /// The editing mode
    pub fn mode(&self) -> Mode {
        match self.editor {
            ReplEditor::Line(_) => Mode::Line,
            ReplEditor::Buffer { .. } => Mode::Multiline,
        }
    }

    /// Past submissions, newest first
    pub fn history(&self) -> &History {
        match &self.editor {
            ReplEditor::Line(line) => line.history(),
            ReplEditor::Buffer { history, .. } => history,
        }
    }

    fn history_mut(&mut self) -> &mut History {
        match &mut self.editor {
            ReplEditor::Line(line) => line.history_mut(),
            ReplEditor::Buffer { history, .. } => history,
        }
    }

    /// File the history is persisted to
    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    /// Read one submission
    ///
    /// Returns `None` when the user ends the session with Ctrl-D or the
    /// input ends. Submissions end with `'\n'`. In multi-line mode a
    /// submitting Return takes the whole buffer wherever the cursor is.
    pub fn read<S: ByteSource, W: Write>(
        &mut self,
        term: &mut Term<S, W>,
    ) -> ReplResult<Option<String>> {
        let indent_width = self.indent_width;
        match &mut self.editor {
            ReplEditor::Line(line) => Ok(line.read_line(term)?),
            ReplEditor::Buffer { editor, history } => {
                let _guard = term.enter_raw()?;
                let mut out = term.frame();
                out.alternate_screen(true);
                term.present(&mut out)?;

                let result = edit_buffer(editor, history, indent_width, term);

                out.alternate_screen(false);
                let restored = term.present(&mut out);
                let submission = result?;
                restored?;
                Ok(submission)
            },
        }
    }

    /// End the session, saving the history if a file was given
    pub fn stop(self) -> ReplResult<()> {
        if let Some(path) = &self.history_file {
            self.history().save(path)?;
        }
        Ok(())
    }
}

/// Run the multi-line editor until a submission or the end of input
fn edit_buffer<S: ByteSource, W: Write>(
    editor: &mut Editor,
    history: &mut History,
    indent_width: usize,
    term: &mut Term<S, W>,
) -> TermResult<Option<String>> {
    let mut out = term.frame();
    editor.clear();
    editor.resize(term.size());
    history.reset_cursor();

    loop {
        editor.render(&mut out, term.size());
        term.present(&mut out)?;

        let key = match term.read_key() {
            Ok(key) => key,
            Err(TermError::Closed) => return Ok(None),
            Err(e) => return Err(e),
        };
        if key.is_edit() {
            history.reset_cursor();
        }
        if key == Key::Return && nesting_depth(editor.text()) == 0 {
            // Submit from the end so the buffer is not split at the cursor
            editor.move_to(editor.line_count() - 1, usize::MAX);
        }

        match editor.update(key) {
            Status::Continue => {},
            Status::Submit => {
                let depth = nesting_depth(editor.text());
                if depth > 0 {
                    for _ in 0..depth * indent_width {
                        editor.insert_char(b' ');
                    }
                } else {
                    let text = editor.flush();
                    let line = String::from_utf8_lossy(&text).into_owned();
                    history.push(&line);
                    return Ok(Some(line));
                }
            },
            Status::Cancelled => return Ok(None),
            Status::Top => {
                if let Some(entry) = history.older().map(|e| e.as_bytes().to_vec()) {
                    editor.replace(&entry);
                }
            },
            Status::Bottom => match history.newer() {
                Recall::Entry(entry) => {
                    let entry = entry.as_bytes().to_vec();
                    editor.replace(&entry);
                },
                Recall::Live => editor.clear(),
                Recall::Unchanged => {},
            },
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new(Mode::Line, DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(input: &[u8]) -> Term<Cursor<Vec<u8>>, Vec<u8>> {
        Term::new(Cursor::new(input.to_vec()), Vec::new())
    }

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth(b""), 0);
        assert_eq!(nesting_depth(b"f(x, {"), 2);
        assert_eq!(nesting_depth(b"f(x) { }"), 0);
        assert_eq!(nesting_depth(b"))(("), 2);
        assert_eq!(nesting_depth(b"[<"), 0);
    }

    #[test]
    fn test_line_mode_read() {
        let mut repl = Repl::new(Mode::Line, 8);
        let mut term = scripted(b"1 + 1\r");
        assert_eq!(repl.read(&mut term).unwrap(), Some("1 + 1\n".to_string()));
        assert_eq!(repl.read(&mut term).unwrap(), None);
        assert_eq!(repl.history().get(0), Some("1 + 1"));
    }

    #[test]
    fn test_multiline_submits_balanced_input() {
        let mut repl = Repl::new(Mode::Multiline, 8);
        let mut term = scripted(b"f(x\r)\r");
        let line = repl.read(&mut term).unwrap();
        assert_eq!(line, Some("f(x\n    )\n".to_string()));
        assert_eq!(repl.history().get(0), Some("f(x\n    )"));

        let written = String::from_utf8(term.writer().clone()).unwrap();
        assert!(written.starts_with("\x1b[?1049h"));
        assert!(written.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn test_multiline_indent_width() {
        let mut repl = Repl::new(Mode::Multiline, 8).with_indent_width(2);
        let mut term = scripted(b"{{\r\r}}\r");
        let line = repl.read(&mut term).unwrap();
        assert_eq!(line, Some("{{\n    \n    }}\n".to_string()));
    }

    #[test]
    fn test_multiline_submit_mid_line_keeps_line_whole() {
        let mut repl = Repl::new(Mode::Multiline, 8);
        let mut term = scripted(b"abcd\x1b[D\x1b[D\r");
        let line = repl.read(&mut term).unwrap();
        assert_eq!(line, Some("abcd\n".to_string()));
        assert_eq!(repl.history().get(0), Some("abcd"));
    }

    #[test]
    fn test_multiline_submit_from_earlier_row() {
        let mut repl = Repl::new(Mode::Multiline, 8);
        let mut term = scripted(b"f(x\r)\x1b[A\x1b[H\r");
        // The first Return continues; the second submits from row 0
        let line = repl.read(&mut term).unwrap();
        assert_eq!(line, Some("f(x\n    )\n".to_string()));
    }

    #[test]
    fn test_multiline_ctrl_d_ends_session() {
        let mut repl = Repl::new(Mode::Multiline, 8);
        let mut term = scripted(b"abc\x04");
        assert_eq!(repl.read(&mut term).unwrap(), None);
        assert!(repl.history().is_empty());
    }

    #[test]
    fn test_multiline_history_recall() {
        let mut repl = Repl::new(Mode::Multiline, 8);
        let mut term = scripted(b"one\rtwo\r\x1b[A\x1b[A\x1b[B\r");
        assert_eq!(repl.read(&mut term).unwrap(), Some("one\n".to_string()));
        assert_eq!(repl.read(&mut term).unwrap(), Some("two\n".to_string()));
        // Up twice reaches "one", Down returns to "two"
        assert_eq!(repl.read(&mut term).unwrap(), Some("two\n".to_string()));
    }

    #[test]
    fn test_history_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut repl = Repl::new(Mode::Line, 8).with_history_file(&path);
        assert!(repl.history().is_empty());
        let mut term = scripted(b"a\rb\r");
        repl.read(&mut term).unwrap();
        repl.read(&mut term).unwrap();
        repl.stop().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");

        let repl = Repl::new(Mode::Multiline, 8).with_history_file(&path);
        assert_eq!(repl.history().iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(repl.history_file(), Some(path.as_path()));
    }

    #[test]
    fn test_multiline_submission_reloads_as_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut repl = Repl::new(Mode::Multiline, 8).with_history_file(&path);
        let mut term = scripted(b"f(x\r)\rg()\r");
        repl.read(&mut term).unwrap();
        repl.read(&mut term).unwrap();
        repl.stop().unwrap();

        let repl = Repl::new(Mode::Multiline, 8).with_history_file(&path);
        assert_eq!(
            repl.history().iter().collect::<Vec<_>>(),
            vec!["g()", "f(x\n    )"]
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.editor.multiline = true;
        config.history.capacity = 3;
        let repl = Repl::from_config(&config);
        assert_eq!(repl.mode(), Mode::Multiline);
        assert_eq!(repl.history().capacity(), 3);
        assert_eq!(Repl::default().mode(), Mode::Line);
    }
}
