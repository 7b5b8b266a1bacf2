//! Text edit action handling (insert/backspace/delete/newline/paste).
//!
//! Each mutation goes through an `EditorState` edit method, which snapshots into undo before
//! touching the buffer. A multi-line paste is a single `insert_str` call and therefore a single
//! undo step.

use super::DispatchResult;
use crate::EditKind;
use core_state::EditorState;

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor;
    let changed = match kind {
        EditKind::InsertChar(ch) => {
            state.insert_char(ch);
            true
        }
        EditKind::InsertNewline => {
            state.insert_newline();
            true
        }
        EditKind::Backspace => state.backspace(),
        EditKind::DeleteForward => state.delete_forward(),
        EditKind::Paste(text) => {
            state.insert_str(&text);
            true
        }
        EditKind::PasteClipboard => {
            if state.clipboard.is_empty() {
                false
            } else {
                let text = state.clipboard.clone();
                state.insert_str(&text);
                state.set_status("Text pasted from AI response");
                true
            }
        }
    };
    tracing::trace!(target: "actions.dispatch", changed, line = before.row, col = before.col, to_line = state.cursor.row, to_col = state.cursor.col, "edit");
    if changed {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Cursor};

    #[test]
    fn newline_splits_line_at_cursor() {
        let mut st = EditorState::new(Buffer::from_str("hello"));
        st.cursor = Cursor::new(0, 2);
        handle_edit(EditKind::InsertNewline, &mut st);
        assert_eq!(st.buffer().lines(), ["he", "llo"]);
        assert_eq!(st.cursor, Cursor::new(1, 0));
    }

    #[test]
    fn backspace_at_line_start_merges_lines() {
        let mut st = EditorState::new(Buffer::from_str("ab\ncd"));
        st.cursor = Cursor::new(1, 0);
        assert!(handle_edit(EditKind::Backspace, &mut st).dirty);
        assert_eq!(st.buffer().lines(), ["abcd"]);
        assert_eq!(st.cursor, Cursor::new(0, 2));
    }

    #[test]
    fn backspace_at_origin_is_noop_without_snapshot() {
        let mut st = EditorState::new(Buffer::from_str("ab"));
        assert!(!handle_edit(EditKind::Backspace, &mut st).dirty);
        assert_eq!(st.undo_depth(), 0);
    }

    #[test]
    fn clipboard_paste_reports_status() {
        let mut st = EditorState::new(Buffer::new());
        assert!(!handle_edit(EditKind::PasteClipboard, &mut st).dirty);
        st.clipboard = "fn main() {}\n".into();
        assert!(handle_edit(EditKind::PasteClipboard, &mut st).dirty);
        assert_eq!(st.buffer().lines(), ["fn main() {}", ""]);
        assert_eq!(st.status_text(), Some("Text pasted from AI response"));
    }
}
