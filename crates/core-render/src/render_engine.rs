//! Render engine: viewport reconciliation, frame building and row-diffed emission.

use crate::chat_panel;
use crate::highlight::keyword_spans;
use crate::layout::Layout;
use crate::metrics::{RenderPathMetrics, RenderPathMetricsSnapshot};
use crate::status::{StatusContext, badge_width, compose_status, format_status};
use crate::style::{StyleAttr, StyleLayer, StyleSpan};
use crate::viewport::Viewport;
use crate::writer::Writer;
use crate::{Cell, CellFlags, Frame, Tone};
use anyhow::Result;
use core_state::{EditorState, Focus, Mode};
use core_text::width::{expand_tabs, render_col};
use std::io::Write;
use std::sync::atomic::Ordering::Relaxed;

/// Public facade used by the binary to produce a frame from state and flush it to the terminal.
pub struct RenderEngine {
    panel_width: u16,
    prev: Option<Frame>,
    metrics: RenderPathMetrics,
}

impl RenderEngine {
    pub fn new(panel_width: u16) -> Self {
        Self {
            panel_width,
            prev: None,
            metrics: RenderPathMetrics::default(),
        }
    }

    /// Forget the previously emitted frame so the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn metrics_snapshot(&self) -> RenderPathMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reconcile size-dependent state before building a frame: page height, viewport offsets
    /// and the chat scroll clamp.
    pub fn prepare(&self, state: &mut EditorState, width: u16, height: u16) -> Layout {
        let layout = Layout::compute(width, height, state.chat_visible, self.panel_width);
        state.last_text_height = layout.text_height();

        let rx = {
            let line = state.buffer().line(state.cursor.row).unwrap_or_default();
            render_col(line, state.cursor.col)
        };
        let mut vp = Viewport::new(
            state.row_offset,
            state.col_offset,
            layout.editor.width as usize,
            layout.text_height(),
        );
        vp.scroll_to_cursor(state.cursor.row, rx);
        state.row_offset = vp.row_offset;
        state.col_offset = vp.col_offset;

        if let Some(region) = layout.chat {
            state.chat_scroll = state
                .chat_scroll
                .min(chat_panel::max_scroll(state, &region));
        }
        layout
    }

    /// Compose the whole screen. Pure with respect to `state`; call `prepare` first.
    pub fn build_frame(&self, state: &EditorState, layout: &Layout) -> Frame {
        let mut frame = Frame::new(layout.width, layout.height);
        paint_editor(&mut frame, layout, state);
        if let Some(region) = layout.chat {
            chat_panel::paint(&mut frame, &region, state);
        }
        paint_status(&mut frame, layout, state);
        paint_command_line(&mut frame, layout, state);
        frame
    }

    /// Prepare, build and emit one frame to `out`. Only rows that differ from the previous frame
    /// are written unless the size changed or the engine was invalidated.
    pub fn render<W: Write>(
        &mut self,
        state: &mut EditorState,
        width: u16,
        height: u16,
        out: &mut W,
    ) -> Result<()> {
        let start = std::time::Instant::now();
        let layout = self.prepare(state, width, height);
        let frame = self.build_frame(state, &layout);

        let mut writer = Writer::new();
        let full = self
            .prev
            .as_ref()
            .is_none_or(|p| p.width != frame.width || p.height != frame.height);
        let mut repainted = 0u64;
        if full {
            writer.clear_all();
        }
        for y in 0..frame.height {
            let changed = full
                || self
                    .prev
                    .as_ref()
                    .is_none_or(|p| p.row(y) != frame.row(y));
            if changed {
                writer.row(y, frame.row(y));
                repainted += 1;
            }
        }
        writer.flush(out)?;

        let skipped = frame.height as u64 - repainted;
        if full {
            self.metrics.full_frames.fetch_add(1, Relaxed);
        } else {
            self.metrics.partial_frames.fetch_add(1, Relaxed);
        }
        self.metrics.rows_repainted.fetch_add(repainted, Relaxed);
        self.metrics.rows_skipped.fetch_add(skipped, Relaxed);
        let ns = start.elapsed().as_nanos() as u64;
        self.metrics.last_render_ns.store(ns, Relaxed);
        tracing::trace!(target: "render.engine", full, repainted, skipped, ns, "frame");
        self.prev = Some(frame);
        Ok(())
    }
}

fn paint_editor(frame: &mut Frame, layout: &Layout, state: &EditorState) {
    let pane = layout.editor;
    let buf = state.buffer();
    let mut styles = StyleLayer::new();
    for y in 0..pane.height {
        let row = state.row_offset + y as usize;
        let Some(line) = buf.line(row) else {
            frame.put_str(pane.x, y, pane.x + pane.width, "~", Tone::Dim);
            continue;
        };
        let cells: String = expand_tabs(line)
            .chars()
            .skip(state.col_offset)
            .take(pane.width as usize)
            .collect();
        frame.put_str(pane.x, y, pane.x + pane.width, &cells, Tone::Plain);

        for (start, end) in keyword_spans(line) {
            styles.push(StyleSpan {
                line: row,
                start_col: render_col(line, start),
                end_col: render_col(line, end),
                attr: StyleAttr::Keyword,
            });
        }
    }

    let last_visible = state.row_offset + pane.height as usize;
    for m in &state.search.matches {
        if m.row < state.row_offset || m.row >= last_visible {
            continue;
        }
        let line = buf.line(m.row).unwrap_or_default();
        styles.push(StyleSpan {
            line: m.row,
            start_col: render_col(line, m.col),
            end_col: render_col(line, m.col + m.len),
            attr: StyleAttr::SearchMatch,
        });
    }

    if state.focus == Focus::Editor && matches!(state.mode, Mode::Normal | Mode::Insert) {
        let line = buf.line(state.cursor.row).unwrap_or_default();
        let rx = render_col(line, state.cursor.col);
        styles.push(StyleSpan {
            line: state.cursor.row,
            start_col: rx,
            end_col: rx + 1,
            attr: StyleAttr::InvertCursor,
        });
    }

    styles.apply(
        frame,
        state.row_offset,
        state.col_offset,
        pane.width,
        pane.height,
    );
}

fn paint_status(frame: &mut Frame, layout: &Layout, state: &EditorState) {
    let Some(y) = layout.status_row else {
        return;
    };
    let ctx = StatusContext::from_state(state);
    let segments = compose_status(&ctx);
    let text = format_status(&segments);
    frame.put_str(0, y, layout.width, &text, Tone::Plain);
    let badge = badge_width(&segments) as u16;
    frame.apply_flags_span(0, y, badge, CellFlags::REVERSE | CellFlags::BOLD);
}

fn paint_command_line(frame: &mut Frame, layout: &Layout, state: &EditorState) {
    let Some(y) = layout.command_row else {
        return;
    };
    if !state.command_line.is_active() {
        return;
    }
    let end = frame.put_str(0, y, layout.width, state.command_line.buffer(), Tone::Plain);
    frame.set(
        end,
        y,
        Cell {
            ch: ' ',
            tone: Tone::Plain,
            flags: CellFlags::REVERSE | CellFlags::CURSOR,
        },
    );
}
