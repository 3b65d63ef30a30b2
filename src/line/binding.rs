//! Key bindings for the single-line editor

use crate::input::Key;

/// An editing action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Insert a byte at the cursor
    Insert(u8),
    /// Hand the line to the caller
    Submit,
    /// End of input
    Done,
    /// Discard the line and start a fresh prompt
    Clear,
    /// Redraw the prompt and line
    Refresh,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Erase from the cursor to the end of the line
    KillToEnd,
    /// Erase from the start of the line to the cursor
    KillToStart,
    HistoryPrev,
    HistoryNext,
    /// Do nothing
    Ignore,
}

impl Action {
    /// Whether this action changes the line (and so ends history
    /// navigation)
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            Action::Insert(_)
                | Action::Submit
                | Action::Done
                | Action::Clear
                | Action::Backspace
                | Action::Delete
                | Action::KillToEnd
                | Action::KillToStart
        )
    }
}

/// Look up the action bound to a key
///
/// Ctrl-D ends input on an empty line and deletes forward otherwise. Keys
/// without a binding insert their byte.
pub fn binding(key: Key, line_empty: bool) -> Action {
    match key {
        Key::Ctrl(b'd') if line_empty => Action::Done,
        Key::Ctrl(b'd') | Key::Delete => Action::Delete,
        Key::Ctrl(b'c') => Action::Clear,
        Key::Return => Action::Submit,
        Key::Ctrl(b'l') => Action::Refresh,
        Key::Backspace => Action::Backspace,
        Key::Ctrl(b'b') | Key::Left => Action::Left,
        Key::Ctrl(b'f') | Key::Right => Action::Right,
        Key::Ctrl(b'a') | Key::Home => Action::Home,
        Key::Ctrl(b'e') | Key::End => Action::End,
        Key::Ctrl(b'k') => Action::KillToEnd,
        Key::Ctrl(b'u') => Action::KillToStart,
        Key::Ctrl(b'p') | Key::Up => Action::HistoryPrev,
        Key::Ctrl(b'n') | Key::Down => Action::HistoryNext,
        Key::Escape | Key::PageUp | Key::PageDown | Key::Unknown => Action::Ignore,
        other => other.byte().map_or(Action::Ignore, Action::Insert),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_d_depends_on_line() {
        assert_eq!(binding(Key::ctrl(b'd'), true), Action::Done);
        assert_eq!(binding(Key::ctrl(b'd'), false), Action::Delete);
    }

    #[test]
    fn test_emacs_aliases() {
        assert_eq!(binding(Key::ctrl(b'b'), false), binding(Key::Left, false));
        assert_eq!(binding(Key::ctrl(b'f'), false), binding(Key::Right, false));
        assert_eq!(binding(Key::ctrl(b'a'), false), Action::Home);
        assert_eq!(binding(Key::ctrl(b'e'), false), Action::End);
        assert_eq!(binding(Key::ctrl(b'p'), false), Action::HistoryPrev);
        assert_eq!(binding(Key::ctrl(b'n'), false), Action::HistoryNext);
        assert_eq!(binding(Key::ctrl(b'm'), false), Action::Submit);
        assert_eq!(binding(Key::ctrl(b'h'), false), Action::Backspace);
    }

    #[test]
    fn test_unbound_keys_insert() {
        assert_eq!(binding(Key::Char(b'x'), true), Action::Insert(b'x'));
        assert_eq!(binding(Key::Tab, true), Action::Insert(b'\t'));
        assert_eq!(binding(Key::ctrl(b'x'), true), Action::Insert(0x18));
    }

    #[test]
    fn test_ignored_keys() {
        for key in [Key::Escape, Key::PageUp, Key::PageDown, Key::Unknown] {
            assert_eq!(binding(key, false), Action::Ignore);
        }
    }

    #[test]
    fn test_edit_actions() {
        assert!(Action::Insert(b'a').is_edit());
        assert!(Action::KillToStart.is_edit());
        assert!(!Action::HistoryPrev.is_edit());
        assert!(!Action::Left.is_edit());
    }
}
