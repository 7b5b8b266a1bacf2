//! Cursor movement. Horizontal motion never wraps across lines; vertical motion clamps the
//! column to the target line.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditorState;
use core_text::motion;

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor;
    let page = state.last_text_height.max(1) as isize;
    let mut cursor = state.cursor;
    let buf = state.buffer();
    match kind {
        MotionKind::Left => motion::horizontal(buf, &mut cursor, -1),
        MotionKind::Right => motion::horizontal(buf, &mut cursor, 1),
        MotionKind::Up => motion::vertical(buf, &mut cursor, -1),
        MotionKind::Down => motion::vertical(buf, &mut cursor, 1),
        MotionKind::PageUp => motion::vertical(buf, &mut cursor, -page),
        MotionKind::PageDown => motion::vertical(buf, &mut cursor, page),
        MotionKind::LineStart => cursor.col = 0,
        MotionKind::LineEnd => cursor.col = buf.line_len(cursor.row),
        MotionKind::WordForward => motion::word_forward(buf, &mut cursor),
        MotionKind::WordBackward => motion::word_backward(buf, &mut cursor),
        MotionKind::BufferStart => motion::buffer_start(&mut cursor),
        MotionKind::LastLine => motion::last_line(buf, &mut cursor),
    }
    state.cursor = cursor;
    tracing::trace!(target: "actions.dispatch", ?kind, from_row = before.row, from_col = before.col, to_row = cursor.row, to_col = cursor.col, "motion");
    if cursor != before {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
