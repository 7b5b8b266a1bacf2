//! Rendering primitives, frame assembly and terminal emission.
//!
//! Every pass runs in two stages:
//! 1. `RenderEngine::prepare` takes `&mut EditorState` and reconciles everything derived from the
//!    terminal size: the editor viewport offsets, the page height used by page motions and the
//!    chat transcript scroll clamp.
//! 2. `RenderEngine::build_frame` composes an immutable view of the state into a `Frame` of
//!    styled cells: editor pane, optional chat panel, status bar and command line.
//!
//! The frame is then diffed row by row against the previously emitted one and only changed rows
//! are written through `writer::Writer`.
//!
//! Invariants:
//! - One cell per rendered column. Tabs are expanded with `core_text::width` so cell columns
//!   and `render_col` always agree.
//! - The cursor is software-drawn as a reversed cell; the terminal cursor stays hidden.
//! - Frames never contain buffer rows beyond the pane; the pane is padded with `~` rows.

use bitflags::bitflags;

pub mod chat_panel;
pub mod highlight;
pub mod layout;
pub mod metrics;
pub mod render_engine;
pub mod status;
pub mod style;
pub mod viewport;
pub mod writer;

pub use layout::Layout;
pub use render_engine::RenderEngine;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // reverse-video (software cursor, badges)
        const CURSOR  = 0b0000_0010; // marks the cursor cell
        const BOLD    = 0b0000_0100;
    }
}

/// Foreground color class of a cell, mapped to a terminal color by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Tone {
    #[default]
    Plain,
    Keyword,
    Match,
    UserLabel,
    ModelLabel,
    Error,
    Border,
    Dim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            tone: Tone::Plain,
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Write `text` starting at `(x, y)`, clipped to `limit` (exclusive column). Returns the
    /// column after the last written cell.
    pub fn put_str(&mut self, x: u16, y: u16, limit: u16, text: &str, tone: Tone) -> u16 {
        let limit = limit.min(self.width);
        let mut col = x;
        for ch in text.chars() {
            if col >= limit {
                break;
            }
            self.set(
                col,
                y,
                Cell {
                    ch,
                    tone,
                    flags: CellFlags::empty(),
                },
            );
            col += 1;
        }
        col
    }

    /// Recolor an existing span without touching its characters.
    pub fn apply_tone_span(&mut self, x: u16, y: u16, span_width: u16, tone: Tone) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].tone = tone;
            }
        }
    }

    /// Add flags over an existing span.
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Characters of row `y` with trailing blanks removed (diagnostics and tests).
    pub fn row_text(&self, y: u16) -> String {
        let s: String = self.row(y).iter().map(|c| c.ch).collect();
        s.trim_end().to_string()
    }

    /// Column of the cursor cell, if one was drawn.
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        let idx = self
            .cells
            .iter()
            .position(|c| c.flags.contains(CellFlags::CURSOR))?;
        let w = self.width as usize;
        Some(((idx % w) as u16, (idx / w) as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_clips_at_limit() {
        let mut f = Frame::new(6, 1);
        let end = f.put_str(1, 0, 4, "abcdef", Tone::Plain);
        assert_eq!(end, 4);
        assert_eq!(f.row_text(0), " abc");
    }

    #[test]
    fn spans_clip_to_width() {
        let mut f = Frame::new(3, 1);
        f.put_str(0, 0, 3, "xyz", Tone::Plain);
        f.apply_flags_span(2, 0, 5, CellFlags::REVERSE | CellFlags::CURSOR);
        assert_eq!(f.cursor_position(), Some((2, 0)));
        assert!(!f.row(0)[1].flags.contains(CellFlags::REVERSE));
    }
}
