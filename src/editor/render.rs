//! Full-screen rendering of the editor
//!
//! Screen layout:
//!
//! ```text
//! row 0     title bar: "  title" ........................ "(col, row)  "
//! row 1     blank
//! row 2..   "  1 " gutter followed by the visible slice of each line
//!           "~" for rows past the end of the text
//! ```

use super::{Editor, GUTTER, HEADER};
use crate::style::{Attribute, Color};
use crate::term::{Output, WindowSize};

impl Editor {
    /// Draw the whole editor into `out` for a window of `size`
    ///
    /// Leaves the terminal cursor on the editor cursor.
    pub fn render(&mut self, out: &mut Output, size: WindowSize) {
        if size != self.size {
            self.resize(size);
        }

        out.home();
        self.render_title(out);
        out.move_to(0, 1);
        out.clear_line();

        let columns = self.text_columns();
        for screen_row in 0..self.text_rows() {
            out.move_to(0, HEADER + screen_row);
            out.clear_line();

            let row = self.offset.y + screen_row;
            let Some(line) = self.text.line(row) else {
                out.style(Attribute::Fg(Color::BrightBlack));
                out.put_byte(b'~');
                out.style(Attribute::Reset);
                continue;
            };

            let gutter = format!("{:>3} ", row + 1);
            out.style(Attribute::Fg(Color::BrightBlack));
            out.put(&gutter.as_bytes()[gutter.len().saturating_sub(GUTTER)..]);
            out.style(Attribute::Reset);

            let start = self.offset.x.min(line.len());
            let end = (self.offset.x + columns).min(line.len());
            self.render_slice(out, row, start, &line[start..end]);
        }

        out.move_to(GUTTER + self.cursor.x, HEADER + self.cursor.y);
    }

    fn render_title(&self, out: &mut Output) {
        let width = self.size.columns();
        let (row, col) = self.position();
        let left = format!("  {}", self.title);
        let right = format!("({}, {})  ", col + 1, row + 1);

        let mut bar = String::with_capacity(width);
        if left.len() + right.len() <= width {
            bar.push_str(&left);
            bar.extend(std::iter::repeat(' ').take(width - left.len() - right.len()));
            bar.push_str(&right);
        } else {
            bar.extend(left.chars().take(width));
        }

        out.clear_line();
        out.style(Attribute::Bg(Color::BrightWhite));
        out.style(Attribute::Fg(Color::BrightBlack));
        out.put_str(&bar);
        out.style(Attribute::Reset);
    }

    /// Draw the visible part of one line, which starts at column `start`
    fn render_slice(&self, out: &mut Output, row: usize, start: usize, slice: &[u8]) {
        let span = self
            .highlight
            .filter(|h| h.line == row && h.length > 0)
            .map(|h| {
                let end = start + slice.len();
                let from = h.column.clamp(start, end) - start;
                let to = h.column.saturating_add(h.length).clamp(start, end) - start;
                (from, to)
            });

        match span {
            Some((from, to)) if from < to => {
                put_visible(out, &slice[..from]);
                out.style(Attribute::Reverse);
                put_visible(out, &slice[from..to]);
                out.style(Attribute::Reset);
                put_visible(out, &slice[to..]);
            },
            _ => put_visible(out, slice),
        }
    }
}

/// Write text one column per byte, masking control bytes
fn put_visible(out: &mut Output, bytes: &[u8]) {
    for &byte in bytes {
        if byte < 0x20 || byte == 0x7f {
            out.put_byte(b'?');
        } else {
            out.put_byte(byte);
        }
    }
}
