//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Cursor` pair and never mutate text. Every helper leaves
//! the cursor inside the buffer bounds.

use crate::{Buffer, Cursor};

/// A word is a maximal run of letters or digits.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Move by `delta` characters within the current line, clamped to `[0, line length]`.
pub fn horizontal(buf: &Buffer, cursor: &mut Cursor, delta: isize) {
    let len = buf.line_len(cursor.row);
    cursor.col = cursor.col.saturating_add_signed(delta).min(len);
}

/// Move by `delta` rows, clamped to the valid row range; the column is clamped to the new
/// line's length.
pub fn vertical(buf: &Buffer, cursor: &mut Cursor, delta: isize) {
    let last = buf.line_count() - 1;
    cursor.row = cursor.row.saturating_add_signed(delta).min(last);
    cursor.col = cursor.col.min(buf.line_len(cursor.row));
}

/// First line, first column.
pub fn buffer_start(cursor: &mut Cursor) {
    *cursor = Cursor::origin();
}

/// Last line, first column.
pub fn last_line(buf: &Buffer, cursor: &mut Cursor) {
    cursor.row = buf.line_count() - 1;
    cursor.col = 0;
}

/// Jump to the start of the next word, continuing onto following lines when the current line
/// has none. Stays at the end of the last line when no later word exists.
pub fn word_forward(buf: &Buffer, cursor: &mut Cursor) {
    let mut row = cursor.row;
    let mut start = cursor.col;
    let mut first_line = true;
    while row < buf.line_count() {
        let chars: Vec<char> = buf.line(row).unwrap_or_default().chars().collect();
        let mut i = start.min(chars.len());
        if first_line {
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
        }
        while i < chars.len() && !is_word_char(chars[i]) {
            i += 1;
        }
        if i < chars.len() {
            *cursor = Cursor::new(row, i);
            return;
        }
        row += 1;
        start = 0;
        first_line = false;
    }
    let last = buf.line_count() - 1;
    *cursor = Cursor::new(last, buf.line_len(last));
}

/// Jump to the start of the previous word, continuing onto earlier lines. Stops at the buffer
/// origin when no earlier word exists.
pub fn word_backward(buf: &Buffer, cursor: &mut Cursor) {
    let mut row = cursor.row;
    let mut end = Some(cursor.col);
    loop {
        let chars: Vec<char> = buf.line(row).unwrap_or_default().chars().collect();
        let mut i = end.unwrap_or(chars.len()).min(chars.len());
        while i > 0 && !is_word_char(chars[i - 1]) {
            i -= 1;
        }
        if i > 0 {
            while i > 0 && is_word_char(chars[i - 1]) {
                i -= 1;
            }
            *cursor = Cursor::new(row, i);
            return;
        }
        if row == 0 {
            *cursor = Cursor::origin();
            return;
        }
        row -= 1;
        end = None;
    }
}
