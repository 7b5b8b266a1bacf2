//! Chat panel composition.
//!
//! The panel occupies a `LayoutRegion` whose first column is the border. Inside it: a title
//! row, the word-wrapped transcript and the `You: ` input row at the bottom. The transcript is
//! bottom-anchored; `EditorState::chat_scroll` counts wrapped rows scrolled up from the newest.

use crate::layout::LayoutRegion;
use crate::{Cell, CellFlags, Frame, Tone};
use core_events::ChatRole;
use core_state::{ChatHistory, EditorState, EntryState, Focus};

pub const TITLE: &str = "AI Chat";
pub const INPUT_LABEL: &str = "You: ";

/// One wrapped transcript row. `label_len` leading characters carry `label_tone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub text: String,
    pub label_len: usize,
    pub label_tone: Tone,
    pub body_tone: Tone,
}

/// Greedy word wrap to `width` columns. Words longer than a row are split; runs of spaces
/// collapse at row boundaries.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_len = 0;
    for word in text.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        let sep = usize::from(row_len > 0);
        if row_len + sep + word.len() <= width {
            if sep == 1 {
                row.push(' ');
            }
            row.extend(word.iter());
            row_len += sep + word.len();
            continue;
        }
        if row_len > 0 {
            rows.push(std::mem::take(&mut row));
            row_len = 0;
        }
        while word.len() > width {
            let rest = word.split_off(width);
            rows.push(word.into_iter().collect());
            word = rest;
        }
        row_len = word.len();
        row.extend(word);
    }
    rows.push(row);
    rows
}

/// Wrap every entry of `history` to `width` columns.
pub fn transcript_lines(history: &ChatHistory, width: usize) -> Vec<ChatLine> {
    let mut out = Vec::new();
    for (label, entry) in history.labeled() {
        let label = format!("{label} ");
        let label_tone = match entry.role {
            ChatRole::User => Tone::UserLabel,
            ChatRole::Model => Tone::ModelLabel,
        };
        let body_tone = match entry.state {
            EntryState::Pending(_) => Tone::Dim,
            EntryState::Failed => Tone::Error,
            EntryState::Complete => Tone::Plain,
        };
        for (i, paragraph) in entry.content.split('\n').enumerate() {
            let text = if i == 0 {
                format!("{label}{paragraph}")
            } else {
                paragraph.to_string()
            };
            for (j, row) in wrap(&text, width).into_iter().enumerate() {
                let label_len = if i == 0 && j == 0 {
                    label.chars().count().min(row.chars().count())
                } else {
                    0
                };
                out.push(ChatLine {
                    text: row,
                    label_len,
                    label_tone,
                    body_tone,
                });
            }
        }
    }
    out
}

/// Rows available to the transcript in a panel of `height` rows (title and input excluded).
pub fn transcript_rows(height: u16) -> usize {
    height.saturating_sub(2) as usize
}

/// Inner text width of a panel region (border excluded).
pub fn inner_width(region: &LayoutRegion) -> usize {
    region.width.saturating_sub(1) as usize
}

/// Largest meaningful `chat_scroll` for the current transcript and panel size.
pub fn max_scroll(state: &EditorState, region: &LayoutRegion) -> usize {
    let total = transcript_lines(&state.chat, inner_width(region)).len();
    total.saturating_sub(transcript_rows(region.height))
}

pub fn paint(frame: &mut Frame, region: &LayoutRegion, state: &EditorState) {
    if region.height == 0 || region.width == 0 {
        return;
    }
    let left = region.x + 1;
    let right = region.x + region.width;
    for y in region.y..region.y + region.height {
        frame.set(
            region.x,
            y,
            Cell {
                ch: '│',
                tone: Tone::Border,
                flags: CellFlags::empty(),
            },
        );
    }

    let last = region.y + region.height - 1;
    if region.height >= 2 {
        let end = frame.put_str(left, region.y, right, TITLE, Tone::Plain);
        let mut flags = CellFlags::BOLD;
        if state.focus == Focus::ChatHistory {
            flags |= CellFlags::REVERSE;
        }
        frame.apply_flags_span(left, region.y, end - left, flags);

        let rows = transcript_rows(region.height);
        let lines = transcript_lines(&state.chat, inner_width(region));
        let scroll = state.chat_scroll.min(lines.len().saturating_sub(rows));
        let end_idx = lines.len() - scroll;
        let start_idx = end_idx.saturating_sub(rows);
        for (i, line) in lines[start_idx..end_idx].iter().enumerate() {
            let y = region.y + 1 + i as u16;
            frame.put_str(left, y, right, &line.text, line.body_tone);
            frame.apply_tone_span(left, y, line.label_len as u16, line.label_tone);
        }
    }

    paint_input(frame, left, right, last, state);
}

fn paint_input(frame: &mut Frame, left: u16, right: u16, y: u16, state: &EditorState) {
    let after_label = frame.put_str(left, y, right, INPUT_LABEL, Tone::UserLabel);
    // Keep the tail of a long prompt visible, leaving one cell for the cursor.
    let room = right.saturating_sub(after_label).saturating_sub(1) as usize;
    let len = state.chat_input.chars().count();
    let visible: String = state.chat_input.chars().skip(len.saturating_sub(room)).collect();
    let end = frame.put_str(after_label, y, right, &visible, Tone::Plain);
    if state.focus == Focus::ChatInput {
        frame.apply_flags_span(end, y, 1, CellFlags::REVERSE | CellFlags::CURSOR);
    }
}
