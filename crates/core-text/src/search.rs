//! Literal substring search over buffer lines.

use crate::{Buffer, Cursor};

/// One match: start position (character column) and length in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub row: usize,
    pub col: usize,
    pub len: usize,
}

impl Match {
    pub fn start(&self) -> Cursor {
        Cursor::new(self.row, self.col)
    }
}

/// All non-overlapping matches of `query`, in buffer order. Empty query yields no matches.
pub fn find_all(buf: &Buffer, query: &str) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }
    let len = query.chars().count();
    let mut out = Vec::new();
    for (row, line) in buf.lines().iter().enumerate() {
        for (byte, _) in line.match_indices(query) {
            out.push(Match {
                row,
                col: line[..byte].chars().count(),
                len,
            });
        }
    }
    out
}

/// Index of the first match at or after `from`, wrapping to the first match.
pub fn next_from(matches: &[Match], from: Cursor) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    matches
        .iter()
        .position(|m| (m.row, m.col) >= (from.row, from.col))
        .or(Some(0))
}
