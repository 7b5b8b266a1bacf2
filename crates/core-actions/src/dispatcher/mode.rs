//! Mode transition handling (Normal <-> Insert). Command and Search are entered through the
//! command line and leave it on submit or cancel; see `command`.

use super::DispatchResult;
use crate::ModeChange;
use core_state::{EditorState, Mode};

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    let target = match mc {
        ModeChange::EnterInsert => Mode::Insert,
        ModeChange::LeaveInsert => Mode::Normal,
    };
    tracing::debug!(target: "actions.dispatch", from = ?state.mode, to = ?target, "mode_change");
    state.mode = target;
    DispatchResult::dirty()
}
