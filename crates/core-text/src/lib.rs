//! Line-vector text buffer, cursor coordinates, and the pure helpers that operate on them.
//!
//! The buffer stores text as an ordered `Vec<String>` with no newline characters inside any
//! line. Column indices throughout this crate are *character* indices into a line, never byte
//! offsets; conversion to byte offsets happens only at the slicing boundary (`byte_index`).
//!
//! Invariants upheld by every public mutator:
//! * `line_count() >= 1` at all times (an empty file is a single empty line).
//! * Any successful mutation sets the dirty flag; only a successful `save` clears it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod motion;
pub mod search;
pub mod width;

pub use width::{TAB_STOP, render_col};

/// Display name used for a buffer with no associated path.
pub const UNNAMED: &str = "[No Name]";

/// Errors surfaced by buffer file IO.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("no file name")]
    NoFileName,
    #[error("'{0}' is read-only")]
    ReadOnly(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Logical cursor position: `row` indexes the line vector, `col` is a character index into
/// that line and may equal the line length (cursor past the last character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Clamp into `0 <= row < line_count` and `0 <= col <= len(lines[row])`.
    pub fn clamp_to(&mut self, buffer: &Buffer) {
        let last = buffer.line_count() - 1;
        if self.row > last {
            self.row = last;
        }
        let len = buffer.line_len(self.row);
        if self.col > len {
            self.col = len;
        }
    }
}

/// In-memory representation of one file.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    path: Option<PathBuf>,
    read_only: bool,
    dirty: bool,
    had_trailing_newline: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Unnamed buffer holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            path: None,
            read_only: false,
            dirty: false,
            had_trailing_newline: false,
        }
    }

    /// Build an unnamed buffer from in-memory text using the same splitting rules as `open`.
    pub fn from_str(content: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load_content(content);
        buffer
    }

    /// Open `path`. A missing file yields an empty buffer bound to that path rather than an
    /// error; any other read failure is returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let mut buffer = Self::new();
        buffer.path = Some(path.to_path_buf());
        match fs::read_to_string(path) {
            Ok(content) => {
                buffer.load_content(&content);
                buffer.read_only = fs::metadata(path)
                    .map(|m| m.permissions().readonly())
                    .unwrap_or(false);
                tracing::debug!(
                    target: "io",
                    file = %path.display(),
                    size_bytes = content.len(),
                    line_count = buffer.lines.len(),
                    read_only = buffer.read_only,
                    "file_read_ok"
                );
                Ok(buffer)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(target: "io", file = %path.display(), "file_not_found_new_buffer");
                Ok(buffer)
            }
            Err(source) => {
                tracing::error!(target: "io", file = %path.display(), ?source, "file_open_error");
                Err(BufferError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    fn load_content(&mut self, content: &str) {
        let mut lines: Vec<String> = content.split('\n').map(str::to_owned).collect();
        // A terminal newline produces exactly one trailing empty segment; drop it and remember
        // so `save` reproduces the original bytes.
        self.had_trailing_newline = false;
        if lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
            lines.pop();
            self.had_trailing_newline = true;
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.lines = lines;
    }

    /// Serialize the buffer (lines joined by `\n`) and write it to the bound path.
    pub fn save(&mut self) -> Result<(), BufferError> {
        let Some(path) = self.path.clone() else {
            return Err(BufferError::NoFileName);
        };
        if self.read_only {
            return Err(BufferError::ReadOnly(self.display_name()));
        }
        let mut content = self.lines.join("\n");
        if self.had_trailing_newline {
            content.push('\n');
        }
        fs::write(&path, content.as_bytes()).map_err(|source| {
            tracing::error!(target: "io", file = %path.display(), ?source, "file_write_error");
            BufferError::Io {
                path: path.clone(),
                source,
            }
        })?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_write_ok");
        self.dirty = false;
        Ok(())
    }

    /// Base file name, or `[No Name]` when unbound.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of `row` in characters (0 for out-of-range rows).
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    /// Deep copy of the line vector (undo snapshot payload).
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Replace every line (undo/redo restore). An empty vector is coerced to one empty line.
    pub fn replace_lines(&mut self, mut lines: Vec<String>) {
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.lines = lines;
        self.dirty = true;
    }

    /// Insert a single character at the cursor and advance past it.
    pub fn insert_char(&mut self, cursor: &mut Cursor, ch: char) {
        cursor.clamp_to(self);
        let line = &mut self.lines[cursor.row];
        let at = byte_index(line, cursor.col);
        line.insert(at, ch);
        cursor.col += 1;
        self.dirty = true;
    }

    /// Split the current line at the cursor; the remainder becomes a new line below and the
    /// cursor moves to its start.
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        cursor.clamp_to(self);
        let line = &mut self.lines[cursor.row];
        let at = byte_index(line, cursor.col);
        let rest = line.split_off(at);
        self.lines.insert(cursor.row + 1, rest);
        cursor.row += 1;
        cursor.col = 0;
        self.dirty = true;
    }

    /// Insert possibly multi-line text. The first segment lands at the cursor, each following
    /// segment opens a new line, and the text that followed the cursor is re-attached after the
    /// final segment. The cursor ends just past the inserted text.
    pub fn insert_str(&mut self, cursor: &mut Cursor, text: &str) {
        cursor.clamp_to(self);
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        let line = &mut self.lines[cursor.row];
        let at = byte_index(line, cursor.col);
        let tail = line.split_off(at);
        line.push_str(first);
        cursor.col += first.chars().count();
        for segment in segments {
            cursor.row += 1;
            self.lines.insert(cursor.row, segment.to_owned());
            cursor.col = segment.chars().count();
        }
        self.lines[cursor.row].push_str(&tail);
        self.dirty = true;
    }

    /// Backspace. At column 0 of a non-first line the line merges into the previous one.
    /// Returns false (no change) at the very start of the buffer.
    pub fn delete_before(&mut self, cursor: &mut Cursor) -> bool {
        cursor.clamp_to(self);
        if cursor.col > 0 {
            let line = &mut self.lines[cursor.row];
            let at = byte_index(line, cursor.col - 1);
            line.remove(at);
            cursor.col -= 1;
        } else if cursor.row > 0 {
            let current = self.lines.remove(cursor.row);
            cursor.row -= 1;
            cursor.col = self.line_len(cursor.row);
            self.lines[cursor.row].push_str(&current);
        } else {
            return false;
        }
        self.dirty = true;
        true
    }

    /// Delete the character under the cursor. No-op (false) at or past the end of the line.
    pub fn delete_at(&mut self, cursor: &mut Cursor) -> bool {
        cursor.clamp_to(self);
        if cursor.col >= self.line_len(cursor.row) {
            return false;
        }
        let line = &mut self.lines[cursor.row];
        let at = byte_index(line, cursor.col);
        line.remove(at);
        self.dirty = true;
        true
    }
}

/// Byte offset of character index `col` in `line`, or `line.len()` when `col` is past the end.
pub fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(idx, _)| idx)
}
