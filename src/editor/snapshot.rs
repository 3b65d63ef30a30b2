//! Editor snapshots
//!
//! A serializable capture of the editor state used by the golden tests and
//! for debugging.

use serde::{Deserialize, Serialize};

use super::{Editor, HighlightSpan, LineDescriptor, Point};

/// A complete snapshot of the editor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub title: String,
    /// Window size the editor was laid out for
    pub cols: u16,
    pub rows: u16,
    /// Text of each line (lossy UTF-8)
    pub lines: Vec<String>,
    /// The line table
    pub table: Vec<LineDescriptor>,
    /// Cursor relative to the viewport
    pub cursor: Point,
    /// Viewport scroll position
    pub offset: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightSpan>,
}

impl EditorSnapshot {
    /// Create a snapshot from the current editor state
    pub fn from_editor(editor: &Editor) -> Self {
        let text = editor.buffer();
        let lines = (0..text.line_count())
            .filter_map(|row| text.line(row))
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();

        EditorSnapshot {
            title: editor.title().to_string(),
            cols: editor.size().cols,
            rows: editor.size().rows,
            lines,
            table: text.lines().to_vec(),
            cursor: editor.cursor(),
            offset: editor.offset(),
            highlight: editor.highlight(),
        }
    }

    /// Absolute cursor position as (row, column)
    pub fn position(&self) -> (usize, usize) {
        (self.offset.y + self.cursor.y, self.offset.x + self.cursor.x)
    }

    /// The text, lines joined with newlines
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
