//! Property tests for the editors
//!
//! Random edit sequences are applied to the buffer editor and the line
//! table invariants are checked after every step.

use proptest::prelude::*;

use mochi_line::editor::Editor;
use mochi_line::history::History;
use mochi_line::input::{Key, KeyParser};
use mochi_line::term::WindowSize;

/// Check the line table against the text
fn check_invariants(ed: &Editor) -> Result<(), TestCaseError> {
    let text = ed.text();
    let lines = ed.buffer().lines();

    let newlines = text.iter().filter(|&&b| b == b'\n').count();
    prop_assert_eq!(lines.len(), newlines + 1);
    prop_assert_eq!(lines[0].offset, 0);
    for pair in lines.windows(2) {
        prop_assert_eq!(pair[1].offset, pair[0].offset + pair[0].length + 1);
    }
    let last = lines[lines.len() - 1];
    prop_assert_eq!(last.offset + last.length, text.len());

    let (row, col) = ed.position();
    prop_assert!(row < ed.line_count());
    prop_assert!(col <= lines[row].length);
    prop_assert!(ed.cursor().y < ed.text_rows());
    prop_assert!(ed.cursor().x <= ed.text_columns());
    Ok(())
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        4 => (b'a'..=b'z').prop_map(Key::Char),
        1 => Just(Key::Return),
        1 => Just(Key::Tab),
        2 => Just(Key::Backspace),
        2 => Just(Key::Delete),
        1 => Just(Key::Up),
        1 => Just(Key::Down),
        1 => Just(Key::Left),
        1 => Just(Key::Right),
        1 => Just(Key::Home),
        1 => Just(Key::End),
        1 => Just(Key::PageUp),
        1 => Just(Key::PageDown),
        1 => Just(Key::Escape),
    ]
}

/// Inserted text: either a byte or a newline
#[derive(Debug, Clone)]
enum Insert {
    Char(u8),
    Newline,
}

fn insert_strategy() -> impl Strategy<Value = Insert> {
    prop_oneof![
        5 => (0x20u8..0x7f).prop_map(Insert::Char),
        1 => Just(Insert::Newline),
    ]
}

proptest! {
    #[test]
    fn prop_inserts_roundtrip(ops in prop::collection::vec(insert_strategy(), 0..200)) {
        let mut ed = Editor::new("p", WindowSize::new(40, 10));
        let mut expected = Vec::new();
        for op in &ops {
            match op {
                Insert::Char(b) => {
                    ed.insert_char(*b);
                    expected.push(*b);
                },
                Insert::Newline => {
                    ed.insert_newline();
                    expected.push(b'\n');
                },
            }
            check_invariants(&ed)?;
        }
        prop_assert_eq!(ed.flush(), expected);
    }

    #[test]
    fn prop_updates_keep_invariants(
        keys in prop::collection::vec(key_strategy(), 0..300),
        cols in 6u16..60,
        rows in 3u16..20,
    ) {
        let mut ed = Editor::new("p", WindowSize::new(cols, rows));
        for key in keys {
            ed.update(key);
            check_invariants(&ed)?;
        }
    }

    #[test]
    fn prop_replace_is_idempotent(text in "[a-z ()\n]{0,120}") {
        let mut ed = Editor::new("p", WindowSize::new(30, 8));
        ed.replace(text.as_bytes());
        let table = ed.buffer().lines().to_vec();

        let flushed = ed.flush();
        prop_assert_eq!(flushed.as_slice(), text.as_bytes());
        ed.clear();
        ed.replace(&flushed);
        prop_assert_eq!(ed.text(), text.as_bytes());
        prop_assert_eq!(ed.buffer().lines(), table.as_slice());
    }

    #[test]
    fn prop_history_is_bounded(capacity in 1usize..16, extra in 0usize..16) {
        let mut history = History::new(capacity);
        let total = capacity + extra;
        for i in 0..total {
            history.push(&format!("entry {}", i));
        }
        prop_assert_eq!(history.len(), capacity);
        let expected: Vec<String> = (extra..total).rev().map(|i| format!("entry {}", i)).collect();
        prop_assert_eq!(history.iter().map(str::to_string).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_decoder_never_leaks_sequence_bytes(params in "[0-9;]{0,6}", tail in "[a-z]{1,8}") {
        let mut input = format!("\x1b[{}~", params).into_bytes();
        input.extend_from_slice(tail.as_bytes());

        let keys = KeyParser::new().feed(&input);
        let chars: Vec<Key> = tail.bytes().map(Key::Char).collect();
        prop_assert_eq!(&keys[1..], chars.as_slice());
    }
}
