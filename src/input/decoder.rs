//! Escape Sequence Decoder
//!
//! A small push-driven state machine in the spirit of a VT parser, reduced
//! to the sequences terminals send for keys:
//!
//! - Ground: plain bytes decode immediately
//! - Escape: after ESC, waiting for `[` or `O`
//! - Csi: after `ESC [`, collecting parameter bytes until a final byte
//! - Ss3: after `ESC O`, waiting for the final byte
//! - CsiIgnore: an overlong CSI sequence, swallowed up to its final byte
//!
//! An ESC inside a pending sequence ends that sequence and starts a new one,
//! so the bytes after it are never decoded as text.
//!
//! The parser never blocks. [`KeyReader`] drives it from a [`ByteSource`]
//! and resolves a pending sequence with [`KeyParser::timeout`] when the
//! following bytes do not arrive within the escape timeout. That is how a
//! lone ESC keypress is told apart from the start of a sequence.

use std::time::Duration;

use super::Key;
use crate::term::{ByteSource, TermError, TermResult};

/// How long to wait for the rest of an escape sequence
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// Longest parameter string accepted inside a CSI sequence
const MAX_PARAMS: usize = 8;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Csi,
    CsiIgnore,
    Ss3,
}

/// Incremental key decoder
#[derive(Debug)]
pub struct KeyParser {
    state: State,
    /// Parameter bytes of the current CSI sequence
    params: Vec<u8>,
}

impl Default for KeyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyParser {
    /// Create a new parser in the ground state
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(MAX_PARAMS),
        }
    }

    /// Check if a sequence has started but not finished
    pub fn is_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Reset the parser to the ground state
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.params.clear();
    }

    /// Feed one byte, returning a key once one is complete
    pub fn advance(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            State::Ground => {
                if byte == 0x1b {
                    self.state = State::Escape;
                    None
                } else {
                    Some(Key::from_byte(byte))
                }
            },
            State::Escape => match byte {
                // ESC ESC: the first one was a bare Escape
                0x1b => Some(Key::Escape),
                b'[' => {
                    self.state = State::Csi;
                    None
                },
                b'O' => {
                    self.state = State::Ss3;
                    None
                },
                _ => self.finish(Key::Unknown),
            },
            _ if byte == 0x1b => {
                self.params.clear();
                self.state = State::Escape;
                Some(Key::Unknown)
            },
            State::Ss3 => {
                let key = match byte {
                    b'A'..=b'D' => arrow(byte),
                    b'H' => Key::Home,
                    b'F' => Key::End,
                    _ => Key::Unknown,
                };
                self.finish(key)
            },
            State::Csi => match byte {
                // Parameter and intermediate bytes
                0x20..=0x3f => {
                    if self.params.len() >= MAX_PARAMS {
                        self.params.clear();
                        self.state = State::CsiIgnore;
                        return None;
                    }
                    self.params.push(byte);
                    None
                },
                // Final byte
                0x40..=0x7e => {
                    let key = self.csi_dispatch(byte);
                    self.finish(key)
                },
                _ => self.finish(Key::Unknown),
            },
            State::CsiIgnore => match byte {
                0x20..=0x3f => None,
                _ => self.finish(Key::Unknown),
            },
        }
    }

    /// Resolve a pending sequence because no more bytes arrived
    ///
    /// A lone ESC is the Escape key; anything longer that was cut short is
    /// unknown.
    pub fn timeout(&mut self) -> Key {
        let key = match self.state {
            State::Escape => Key::Escape,
            _ => Key::Unknown,
        };
        self.reset();
        key
    }

    /// Decode a complete byte string, resolving any trailing partial
    /// sequence as if it had timed out
    pub fn feed(&mut self, data: &[u8]) -> Vec<Key> {
        let mut keys: Vec<Key> = data.iter().filter_map(|&b| self.advance(b)).collect();
        if self.is_pending() {
            keys.push(self.timeout());
        }
        keys
    }

    fn finish(&mut self, key: Key) -> Option<Key> {
        self.reset();
        Some(key)
    }

    fn csi_dispatch(&self, final_byte: u8) -> Key {
        match final_byte {
            // Modifier parameters (ESC [ 1 ; 5 A) are ignored
            b'A'..=b'D' => arrow(final_byte),
            b'H' if self.params.is_empty() => Key::Home,
            b'F' if self.params.is_empty() => Key::End,
            b'~' => match self.first_param() {
                Some(1) | Some(7) => Key::Home,
                Some(3) => Key::Delete,
                Some(4) | Some(8) => Key::End,
                Some(5) => Key::PageUp,
                Some(6) => Key::PageDown,
                _ => Key::Unknown,
            },
            _ => Key::Unknown,
        }
    }

    /// The first numeric parameter, if the sequence starts with one
    fn first_param(&self) -> Option<u32> {
        let digits = self.params.split(|&b| b == b';').next()?;
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(
            digits
                .iter()
                .fold(0u32, |n, &d| n * 10 + u32::from(d - b'0')),
        )
    }
}

fn arrow(final_byte: u8) -> Key {
    match final_byte {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        _ => Key::Left,
    }
}

/// Blocking key reader over a byte source
#[derive(Debug)]
pub struct KeyReader<S> {
    source: S,
    parser: KeyParser,
    escape_timeout: Duration,
}

impl<S: ByteSource> KeyReader<S> {
    /// Create a new reader with the default escape timeout
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: KeyParser::new(),
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
        }
    }

    /// Set how long to wait for the rest of an escape sequence
    pub fn set_escape_timeout(&mut self, timeout: Duration) {
        self.escape_timeout = timeout;
    }

    /// Get the escape timeout
    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }

    /// Get a mutable reference to the byte source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Block until one logical key has been read
    ///
    /// Returns [`TermError::Closed`] when the input ends before a new key
    /// starts. Input ending in the middle of a sequence resolves it as a
    /// timeout would.
    pub fn read_key(&mut self) -> TermResult<Key> {
        loop {
            let byte = if self.parser.is_pending() {
                match self.source.poll_byte(self.escape_timeout)? {
                    Some(byte) => byte,
                    None => {
                        let key = self.parser.timeout();
                        tracing::trace!("Escape sequence timed out as {:?}", key);
                        return Ok(key);
                    },
                }
            } else {
                match self.source.read_byte()? {
                    Some(byte) => byte,
                    None => return Err(TermError::Closed),
                }
            };

            if let Some(key) = self.parser.advance(byte) {
                tracing::trace!("Decoded key {:?}", key);
                return Ok(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(data: &[u8]) -> Vec<Key> {
        KeyParser::new().feed(data)
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(
            parse(b"hi\r"),
            vec![Key::Char(b'h'), Key::Char(b'i'), Key::Return]
        );
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
    }

    #[test]
    fn test_tilde_keys() {
        assert_eq!(
            parse(b"\x1b[3~\x1b[5~\x1b[6~"),
            vec![Key::Delete, Key::PageUp, Key::PageDown]
        );
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(
            parse(b"\x1b[H\x1b[F\x1bOH\x1bOF\x1b[1~\x1b[4~\x1b[7~\x1b[8~"),
            vec![
                Key::Home,
                Key::End,
                Key::Home,
                Key::End,
                Key::Home,
                Key::End,
                Key::Home,
                Key::End
            ]
        );
    }

    #[test]
    fn test_ss3_arrows() {
        assert_eq!(parse(b"\x1bOA\x1bOD"), vec![Key::Up, Key::Left]);
    }

    #[test]
    fn test_modified_arrow_decodes_as_arrow() {
        assert_eq!(parse(b"\x1b[1;5C"), vec![Key::Right]);
    }

    #[test]
    fn test_unknown_sequences_do_not_leak() {
        // F5 is ESC [ 1 5 ~; the digits and tilde must not become text
        assert_eq!(parse(b"\x1b[15~x"), vec![Key::Unknown, Key::Char(b'x')]);
        assert_eq!(parse(b"\x1b[Z"), vec![Key::Unknown]);
        assert_eq!(parse(b"\x1bx"), vec![Key::Unknown]);
    }

    #[test]
    fn test_lone_escape_times_out() {
        assert_eq!(parse(b"\x1b"), vec![Key::Escape]);
    }

    #[test]
    fn test_truncated_sequence_is_unknown() {
        assert_eq!(parse(b"\x1b["), vec![Key::Unknown]);
        assert_eq!(parse(b"\x1b[3"), vec![Key::Unknown]);
    }

    #[test]
    fn test_overlong_parameters_abort() {
        assert_eq!(
            parse(b"\x1b[123456789~x"),
            vec![Key::Unknown, Key::Char(b'x')]
        );
    }

    #[test]
    fn test_double_escape_before_sequence() {
        // Alt+Up on some terminals, or ESC pressed just before an arrow
        assert_eq!(parse(b"\x1b\x1b[A"), vec![Key::Escape, Key::Up]);
        assert_eq!(
            parse(b"\x1b\x1b\x1bOB"),
            vec![Key::Escape, Key::Escape, Key::Down]
        );
    }

    #[test]
    fn test_escape_restarts_pending_sequence() {
        assert_eq!(parse(b"\x1b[1\x1b[C"), vec![Key::Unknown, Key::Right]);
        assert_eq!(parse(b"\x1bO\x1b[D"), vec![Key::Unknown, Key::Left]);
    }

    #[test]
    fn test_reader_double_escape() {
        let mut reader = KeyReader::new(Cursor::new(b"\x1b\x1b[Az".to_vec()));
        assert_eq!(reader.read_key().unwrap(), Key::Escape);
        assert_eq!(reader.read_key().unwrap(), Key::Up);
        assert_eq!(reader.read_key().unwrap(), Key::Char(b'z'));
    }

    #[test]
    fn test_pending_state() {
        let mut parser = KeyParser::new();
        assert!(!parser.is_pending());
        assert_eq!(parser.advance(0x1b), None);
        assert!(parser.is_pending());
        assert_eq!(parser.advance(b'['), None);
        assert_eq!(parser.advance(b'A'), Some(Key::Up));
        assert!(!parser.is_pending());
    }

    #[test]
    fn test_reader_resolves_sequence_in_order() {
        let mut reader = KeyReader::new(Cursor::new(b"\x1b[Aq".to_vec()));
        assert_eq!(reader.read_key().unwrap(), Key::Up);
        assert_eq!(reader.read_key().unwrap(), Key::Char(b'q'));
        assert!(matches!(reader.read_key(), Err(TermError::Closed)));
    }

    #[test]
    fn test_reader_bare_escape_at_end_of_input() {
        let mut reader = KeyReader::new(Cursor::new(b"\x1b".to_vec()));
        assert_eq!(reader.read_key().unwrap(), Key::Escape);
        assert!(matches!(reader.read_key(), Err(TermError::Closed)));
    }

    #[test]
    fn test_reader_escape_timeout_setting() {
        let mut reader = KeyReader::new(Cursor::new(Vec::new()));
        assert_eq!(reader.escape_timeout(), DEFAULT_ESCAPE_TIMEOUT);
        reader.set_escape_timeout(Duration::from_millis(5));
        assert_eq!(reader.escape_timeout(), Duration::from_millis(5));
    }
}
