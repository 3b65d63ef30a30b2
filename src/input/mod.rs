//! Keyboard Input Decoding
//!
//! Translates the bytes a terminal sends in raw mode into logical keys.
//! Plain bytes map directly to printable characters or control keys;
//! escape sequences for the cursor and navigation keys are recognised by
//! [`KeyParser`].
//!
//! # Key codes
//!
//! Every key except [`Key::Unknown`] has a numeric code. Keys that arrive as
//! a single byte use that byte (Ctrl-C is `0x03`, Return `0x0D`, Backspace
//! `0x7F`); keys synthesized from escape sequences use codes from
//! [`KEY_ARROW_LEFT`] (500) upwards.

mod decoder;

pub use decoder::{KeyParser, KeyReader, DEFAULT_ESCAPE_TIMEOUT};

pub const KEY_CTRL_C: u16 = 0x03;
pub const KEY_CTRL_D: u16 = 0x04;
pub const KEY_CTRL_H: u16 = 0x08;
pub const KEY_TAB: u16 = 0x09;
pub const KEY_RETURN: u16 = 0x0d;
pub const KEY_ESC: u16 = 0x1b;
pub const KEY_BACKSPACE: u16 = 0x7f;

pub const KEY_ARROW_LEFT: u16 = 500;
pub const KEY_ARROW_RIGHT: u16 = 501;
pub const KEY_ARROW_UP: u16 = 502;
pub const KEY_ARROW_DOWN: u16 = 503;
pub const KEY_DELETE: u16 = 504;
pub const KEY_HOME: u16 = 505;
pub const KEY_END: u16 = 506;
pub const KEY_PAGE_UP: u16 = 507;
pub const KEY_PAGE_DOWN: u16 = 508;

/// A decoded logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable byte (0x20-0x7E, or any byte with the high bit set)
    Char(u8),
    /// A control key other than the ones named below, as its lowercase
    /// letter: Ctrl-C is `Ctrl(b'c')`
    Ctrl(u8),

    // Editing
    Return,
    Tab,
    Backspace,
    Escape,

    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    /// A malformed or unrecognised escape sequence
    Unknown,
}

impl Key {
    /// Decode a key that arrives as a single byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x0d | 0x0a => Key::Return,
            0x09 => Key::Tab,
            0x08 | 0x7f => Key::Backspace,
            0x1b => Key::Escape,
            0x00..=0x1f => Key::Ctrl(byte + 0x60),
            _ => Key::Char(byte),
        }
    }

    /// The control key for a letter: `Key::ctrl(b'd')` is Ctrl-D
    pub fn ctrl(letter: u8) -> Self {
        Key::from_byte(letter.to_ascii_lowercase() & 0x1f)
    }

    /// Numeric key code, `None` for [`Key::Unknown`]
    pub fn code(self) -> Option<u16> {
        let code = match self {
            Key::Char(byte) => u16::from(byte),
            Key::Ctrl(letter) => u16::from(letter & 0x1f),
            Key::Return => KEY_RETURN,
            Key::Tab => KEY_TAB,
            Key::Backspace => KEY_BACKSPACE,
            Key::Escape => KEY_ESC,
            Key::Left => KEY_ARROW_LEFT,
            Key::Right => KEY_ARROW_RIGHT,
            Key::Up => KEY_ARROW_UP,
            Key::Down => KEY_ARROW_DOWN,
            Key::Delete => KEY_DELETE,
            Key::Home => KEY_HOME,
            Key::End => KEY_END,
            Key::PageUp => KEY_PAGE_UP,
            Key::PageDown => KEY_PAGE_DOWN,
            Key::Unknown => return None,
        };
        Some(code)
    }

    /// Inverse of [`Key::code`]
    pub fn from_code(code: u16) -> Self {
        match code {
            0..=0xff => Key::from_byte(code as u8),
            KEY_ARROW_LEFT => Key::Left,
            KEY_ARROW_RIGHT => Key::Right,
            KEY_ARROW_UP => Key::Up,
            KEY_ARROW_DOWN => Key::Down,
            KEY_DELETE => Key::Delete,
            KEY_HOME => Key::Home,
            KEY_END => Key::End,
            KEY_PAGE_UP => Key::PageUp,
            KEY_PAGE_DOWN => Key::PageDown,
            _ => Key::Unknown,
        }
    }

    /// The byte this key inserts when no binding claims it
    pub fn byte(self) -> Option<u8> {
        match self {
            Key::Char(byte) => Some(byte),
            Key::Ctrl(letter) => Some(letter & 0x1f),
            Key::Tab => Some(b'\t'),
            _ => None,
        }
    }

    /// Check if this key modifies text rather than moving around it
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            Key::Char(_) | Key::Return | Key::Tab | Key::Backspace | Key::Delete
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_bytes() {
        assert_eq!(Key::from_byte(0x03), Key::Ctrl(b'c'));
        assert_eq!(Key::from_byte(0x04), Key::Ctrl(b'd'));
        assert_eq!(Key::from_byte(0x08), Key::Backspace);
        assert_eq!(Key::from_byte(0x7f), Key::Backspace);
        assert_eq!(Key::from_byte(0x09), Key::Tab);
        assert_eq!(Key::from_byte(0x0d), Key::Return);
        assert_eq!(Key::from_byte(0x0a), Key::Return);
        assert_eq!(Key::from_byte(0x1b), Key::Escape);
    }

    #[test]
    fn test_printable_bytes() {
        assert_eq!(Key::from_byte(b'a'), Key::Char(b'a'));
        assert_eq!(Key::from_byte(b' '), Key::Char(b' '));
        assert_eq!(Key::from_byte(b'~'), Key::Char(b'~'));
        assert_eq!(Key::from_byte(0xc3), Key::Char(0xc3));
    }

    #[test]
    fn test_ctrl_helper() {
        assert_eq!(Key::ctrl(b'd'), Key::Ctrl(b'd'));
        assert_eq!(Key::ctrl(b'C'), Key::Ctrl(b'c'));
        assert_eq!(Key::ctrl(b'm'), Key::Return);
        assert_eq!(Key::ctrl(b'h'), Key::Backspace);
    }

    #[test]
    fn test_codes() {
        assert_eq!(Key::Ctrl(b'c').code(), Some(KEY_CTRL_C));
        assert_eq!(Key::Ctrl(b'd').code(), Some(KEY_CTRL_D));
        assert_eq!(Key::Return.code(), Some(KEY_RETURN));
        assert_eq!(Key::Backspace.code(), Some(KEY_BACKSPACE));
        assert_eq!(Key::Left.code(), Some(500));
        assert_eq!(Key::PageDown.code(), Some(508));
        assert_eq!(Key::Unknown.code(), None);
    }

    #[test]
    fn test_code_roundtrip() {
        for key in [
            Key::Char(b'x'),
            Key::Ctrl(b'p'),
            Key::Return,
            Key::Escape,
            Key::Up,
            Key::Delete,
            Key::Home,
            Key::PageUp,
        ] {
            assert_eq!(Key::from_code(key.code().unwrap()), key);
        }
        assert_eq!(Key::from_code(499), Key::Unknown);
    }

    #[test]
    fn test_synthesized_codes_are_high() {
        for key in [Key::Up, Key::Down, Key::Left, Key::Right, Key::End] {
            assert!(key.code().unwrap() >= 500);
        }
    }
}
