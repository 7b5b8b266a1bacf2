//! Style layer: semantic spans computed per frame and applied over the cells of a pane.
//!
//! Spans are line-local and use half-open `[start_col, end_col)` ranges in rendered columns,
//! before horizontal scrolling. Later spans win where they overlap, so callers push keyword
//! spans first, then search matches, then the cursor.

use crate::{CellFlags, Frame, Tone};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    InvertCursor,
    Keyword,
    SearchMatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub line: usize,
    pub start_col: usize, // inclusive
    pub end_col: usize,   // exclusive
    pub attr: StyleAttr,
}

impl StyleSpan {
    pub fn width(&self) -> usize {
        self.end_col.saturating_sub(self.start_col)
    }
}

#[derive(Default, Debug)]
pub struct StyleLayer {
    pub spans: Vec<StyleSpan>,
}

impl StyleLayer {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    pub fn push(&mut self, span: StyleSpan) {
        self.spans.push(span);
    }

    pub fn cursor_span(&self) -> Option<&StyleSpan> {
        self.spans
            .iter()
            .find(|s| matches!(s.attr, StyleAttr::InvertCursor))
    }

    /// Paint every span whose line is visible into `frame`.
    ///
    /// `first_line` is the buffer row at screen row 0, `col_offset` the first rendered column
    /// shown, and the pane spans columns `[0, pane_width)` and rows `[0, pane_height)`.
    pub fn apply(
        &self,
        frame: &mut Frame,
        first_line: usize,
        col_offset: usize,
        pane_width: u16,
        pane_height: u16,
    ) {
        for span in &self.spans {
            if span.line < first_line || span.line >= first_line + pane_height as usize {
                continue;
            }
            let y = (span.line - first_line) as u16;
            let start = span.start_col.max(col_offset);
            let end = span.end_col.min(col_offset + pane_width as usize);
            if start >= end {
                continue;
            }
            let x = (start - col_offset) as u16;
            let w = (end - start) as u16;
            match span.attr {
                StyleAttr::Keyword => frame.apply_tone_span(x, y, w, Tone::Keyword),
                StyleAttr::SearchMatch => frame.apply_tone_span(x, y, w, Tone::Match),
                StyleAttr::InvertCursor => {
                    frame.apply_flags_span(x, y, w, CellFlags::REVERSE | CellFlags::CURSOR)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_span_basic() {
        let mut layer = StyleLayer::new();
        layer.push(StyleSpan {
            line: 0,
            start_col: 1,
            end_col: 3,
            attr: StyleAttr::InvertCursor,
        });
        let c = layer.cursor_span().expect("cursor span");
        assert_eq!(c.start_col, 1);
        assert_eq!(c.width(), 2);
    }

    #[test]
    fn apply_honors_offsets_and_clips() {
        let mut frame = Frame::new(4, 2);
        let mut layer = StyleLayer::new();
        layer.push(StyleSpan {
            line: 6,
            start_col: 3,
            end_col: 9,
            attr: StyleAttr::Keyword,
        });
        // Off-screen line.
        layer.push(StyleSpan {
            line: 2,
            start_col: 0,
            end_col: 1,
            attr: StyleAttr::Keyword,
        });
        layer.apply(&mut frame, 5, 2, 4, 2);
        let tones: Vec<Tone> = frame.row(1).iter().map(|c| c.tone).collect();
        assert_eq!(
            tones,
            [Tone::Plain, Tone::Keyword, Tone::Keyword, Tone::Keyword]
        );
        assert!(frame.row(0).iter().all(|c| c.tone == Tone::Plain));
    }
}
