//! Undo / Redo dispatch. Content only: the cursor stays put apart from being clamped.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    if state.undo() {
        tracing::trace!(target: "actions.dispatch", op = "undo", undo_depth = state.undo_depth(), "undo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState) -> DispatchResult {
    if state.redo() {
        tracing::trace!(target: "actions.dispatch", op = "redo", redo_depth = state.redo_depth(), "redo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
