//! Text styling
//!
//! SGR escape sequences for the handful of attributes the editors use:
//! bold, underline, reverse video and the 8 base colors with their bright
//! variants.

use std::io::{self, IsTerminal, Write};

/// The 8 ANSI colors, their bright variants and the terminal default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Default,
}

impl Color {
    /// SGR parameter for this color as a foreground
    pub fn fg_code(self) -> u8 {
        match self {
            Color::Default => 39,
            color => match color.base() {
                (index, false) => 30 + index,
                (index, true) => 90 + index,
            },
        }
    }

    /// SGR parameter for this color as a background
    pub fn bg_code(self) -> u8 {
        match self {
            Color::Default => 49,
            color => match color.base() {
                (index, false) => 40 + index,
                (index, true) => 100 + index,
            },
        }
    }

    /// Palette index (0-7) and whether the bright variant is meant
    fn base(self) -> (u8, bool) {
        match self {
            Color::Black => (0, false),
            Color::Red => (1, false),
            Color::Green => (2, false),
            Color::Yellow => (3, false),
            Color::Blue => (4, false),
            Color::Magenta => (5, false),
            Color::Cyan => (6, false),
            Color::White | Color::Default => (7, false),
            Color::BrightBlack => (0, true),
            Color::BrightRed => (1, true),
            Color::BrightGreen => (2, true),
            Color::BrightYellow => (3, true),
            Color::BrightBlue => (4, true),
            Color::BrightMagenta => (5, true),
            Color::BrightCyan => (6, true),
            Color::BrightWhite => (7, true),
        }
    }
}

/// A single style change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Bold(bool),
    Underline(bool),
    Reverse,
    Fg(Color),
    Bg(Color),
    Reset,
}

impl Attribute {
    /// SGR parameter for this attribute
    pub fn sgr(self) -> u8 {
        match self {
            Attribute::Bold(true) => 1,
            Attribute::Bold(false) => 22,
            Attribute::Underline(true) => 4,
            Attribute::Underline(false) => 24,
            Attribute::Reverse => 7,
            Attribute::Fg(color) => color.fg_code(),
            Attribute::Bg(color) => color.bg_code(),
            Attribute::Reset => 0,
        }
    }
}

/// Write the escape sequence for `attr` to `stream`
pub fn emit_style<W: Write>(stream: &mut W, attr: Attribute) -> io::Result<()> {
    write!(stream, "\x1b[{}m", attr.sgr())
}

/// Whether `stream` is a terminal that should receive style escapes
///
/// Honours the `NO_COLOR` convention.
pub fn has_colors<T: IsTerminal>(stream: &T) -> bool {
    stream.is_terminal() && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
}
