//! Editing scenarios
//!
//! End-to-end checks of the editors through their public API: the buffer
//! editor's line table bookkeeping, history eviction and key decoding.

use std::io::Cursor;

use mochi_line::editor::{Editor, LineDescriptor, Status};
use mochi_line::history::History;
use mochi_line::input::{Key, KeyParser, KeyReader};
use mochi_line::term::WindowSize;

fn editor() -> Editor {
    Editor::new("scenario", WindowSize::new(80, 24))
}

fn hello_world() -> Editor {
    let mut ed = editor();
    for &b in b"hello" {
        ed.insert_char(b);
    }
    ed.insert_newline();
    for &b in b"world" {
        ed.insert_char(b);
    }
    ed
}

#[test]
fn test_scenario_a_insert_and_flush() {
    let mut ed = hello_world();
    assert_eq!(
        ed.buffer().lines(),
        &[
            LineDescriptor {
                offset: 0,
                length: 5
            },
            LineDescriptor {
                offset: 6,
                length: 5
            },
        ]
    );
    assert_eq!(ed.flush(), b"hello\nworld".to_vec());
}

#[test]
fn test_scenario_b_backspace_joins_rows() {
    let mut ed = hello_world();
    ed.move_to(1, 0);
    ed.backspace();

    assert_eq!(ed.text(), b"helloworld");
    assert_eq!(
        ed.buffer().lines(),
        &[LineDescriptor {
            offset: 0,
            length: 10
        }]
    );
    assert_eq!(ed.position(), (0, 5));
}

#[test]
fn test_scenario_c_delete_forward_to_empty() {
    let mut ed = editor();
    ed.update(Key::Char(b'a'));
    ed.update(Key::Char(b'b'));
    ed.move_to(0, 0);

    ed.delete_forward();
    ed.delete_forward();
    assert_eq!(ed.text(), b"");
    // Nothing left to delete
    ed.delete_forward();
    assert_eq!(ed.text(), b"");
    assert_eq!(ed.line_count(), 1);
    assert_eq!(ed.position(), (0, 0));
}

#[test]
fn test_scenario_d_history_eviction() {
    let mut history = History::new(5);
    for c in 'a'..='z' {
        history.push(&c.to_string());
    }
    assert_eq!(
        history.iter().collect::<Vec<_>>(),
        vec!["z", "y", "x", "w", "v"]
    );
}

#[test]
fn test_scenario_e_arrow_up_decodes() {
    let mut parser = KeyParser::new();
    assert_eq!(parser.advance(0x1b), None);
    assert_eq!(parser.advance(b'['), None);
    assert_eq!(parser.advance(b'A'), Some(Key::Up));

    let mut reader = KeyReader::new(Cursor::new(vec![0x1b, b'[', b'A']));
    assert_eq!(reader.read_key().unwrap(), Key::Up);
}

#[test]
fn test_replace_of_flush_is_identity() {
    let mut ed = hello_world();
    ed.move_to(0, 2);
    ed.insert_newline();
    let table = ed.buffer().lines().to_vec();

    let text = ed.flush();
    ed.replace(&text);
    assert_eq!(ed.text(), text.as_slice());
    assert_eq!(ed.buffer().lines(), table.as_slice());
}

#[test]
fn test_update_statuses() {
    let mut ed = hello_world();
    assert_eq!(ed.update(Key::Down), Status::Bottom);
    assert_eq!(ed.update(Key::Up), Status::Continue);
    assert_eq!(ed.update(Key::Up), Status::Top);
    assert_eq!(ed.update(Key::ctrl(b'd')), Status::Cancelled);
    assert_eq!(ed.update(Key::Return), Status::Submit);
}

#[test]
fn test_delete_forward_at_line_end_merges_next_row() {
    let mut ed = hello_world();
    ed.move_to(0, 5);
    ed.update(Key::Delete);
    assert_eq!(ed.text(), b"helloworld");
    assert_eq!(ed.position(), (0, 5));
}

#[test]
fn test_column_clamped_on_shorter_row() {
    let mut ed = editor();
    ed.insert_str(b"a\nlonger line");
    assert_eq!(ed.position(), (1, 11));
    ed.update(Key::Up);
    assert_eq!(ed.position(), (0, 1));
}

#[test]
fn test_offsets_shift_after_middle_edit() {
    let mut ed = editor();
    ed.insert_str(b"one\ntwo\nthree");
    ed.move_to(0, 3);
    ed.update(Key::Char(b'!'));

    let offsets: Vec<usize> = ed.buffer().lines().iter().map(|d| d.offset).collect();
    assert_eq!(offsets, vec![0, 5, 9]);
    assert_eq!(ed.line(2), Some(&b"three"[..]));
}

#[test]
fn test_double_escape_arrow_leaves_buffer_untouched() {
    let mut ed = hello_world();
    for key in KeyParser::new().feed(b"\x1b\x1b[A") {
        ed.update(key);
    }
    assert_eq!(ed.text(), b"hello\nworld");
    assert_eq!(ed.position(), (0, 5));
}
