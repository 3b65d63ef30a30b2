//! Mochi Line Editing Library
//!
//! Interactive line and text editing for terminal programs, built directly
//! on raw-mode terminal I/O without any line editing libraries.
//!
//! - `term`: raw mode, window size, unbuffered input and escape sequence output
//! - `input`: key events and escape sequence decoding
//! - `style`: SGR colors and attributes
//! - `history`: bounded submission history with file persistence
//! - `line`: single-line readline-style editor
//! - `editor`: multi-line buffer editor with a scrolling viewport
//! - `repl`: REPL driver composing the editors
//! - `app`: configuration

pub mod app;
pub mod editor;
pub mod history;
pub mod input;
pub mod line;
pub mod repl;
pub mod style;
pub mod term;

pub use editor::{Editor, Status};
pub use history::History;
pub use input::Key;
pub use line::{LineEditor, Outcome};
pub use repl::{Mode, Repl};
pub use term::{Term, TermError, WindowSize};
