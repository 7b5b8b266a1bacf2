//! Dispatcher applying `Action` to mutable editor state.
//!
//! Decomposed by concern:
//! * `motion`  - cursor movement
//! * `mode`    - Normal <-> Insert transitions
//! * `edit`    - text mutation (each edit snapshots into undo first)
//! * `undo`    - undo / redo
//! * `command` - command line editing and ex command execution
//! * `search`  - `/` submission and `n`/`N`
//! * `chat`    - chat panel focus, prompt editing, submission and copy
//!
//! Nothing here performs network IO. A chat submission records the prompt and pending
//! placeholder in state and returns a `ChatRequest` for the runtime to hand to the chat bridge.

use crate::{Action, KeyTranslator};
use core_events::{ChatTurn, InputEvent, RequestId};
use core_state::{EditorState, Focus, Mode};

mod chat;
mod command;
mod command_parser;
mod edit;
mod mode;
mod motion;
mod search;
mod undo;

pub use command_parser::{CommandParser, ParsedCommand};

/// Chat request the runtime must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub id: RequestId,
    pub history: Vec<ChatTurn>,
    pub prompt: String,
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    pub chat_request: Option<ChatRequest>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn clean() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            chat_request: None,
        }
    }

    pub fn chat(request: ChatRequest) -> Self {
        Self {
            dirty: true,
            quit: false,
            chat_request: Some(request),
        }
    }
}

/// Apply an action to editor state.
pub fn dispatch(action: Action, state: &mut EditorState) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", action = action.name(), "dispatch");
    match action {
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::Undo => undo::handle_undo(state),
        Action::Redo => undo::handle_redo(state),
        Action::Save => command::handle_save(state),
        Action::CommandStart(_)
        | Action::CommandChar(_)
        | Action::CommandBackspace
        | Action::CommandCancel
        | Action::CommandExecute => command::handle_command_action(action, state),
        Action::SearchNext => search::handle_step(state, true),
        Action::SearchPrev => search::handle_step(state, false),
        Action::ToggleChat
        | Action::CopyLastResponse
        | Action::ChatChar(_)
        | Action::ChatBackspace
        | Action::ChatSubmit
        | Action::ChatCycleFocus
        | Action::ChatScroll(_)
        | Action::CopyTranscript
        | Action::FocusEditor => chat::handle_chat_action(action, state),
    }
}

/// Route one input event: translate keys, apply pastes to whichever surface has focus.
///
/// Every key press clears the transient status first, so a message lasts until the next key or
/// its TTL, whichever comes first.
pub fn handle_input(
    translator: &mut KeyTranslator,
    state: &mut EditorState,
    event: &InputEvent,
) -> DispatchResult {
    match event {
        InputEvent::Key(key) => {
            state.clear_status();
            state.last_key = Some(key.to_string());
            match translator.translate(state, key) {
                Some(action) => dispatch(action, state),
                // Status may have been cleared and the debug key line changed.
                None => DispatchResult::dirty(),
            }
        }
        InputEvent::Paste(text) => handle_paste(state, text),
        InputEvent::Resize(..) => DispatchResult::dirty(),
    }
}

fn handle_paste(state: &mut EditorState, text: &str) -> DispatchResult {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    match state.focus {
        Focus::ChatInput => {
            state.chat_input.extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
            DispatchResult::dirty()
        }
        Focus::ChatHistory => DispatchResult::clean(),
        Focus::Editor => match state.mode {
            Mode::Insert => edit::handle_edit(crate::EditKind::Paste(text), state),
            Mode::Command | Mode::Search => {
                for ch in text.chars().filter(|c| *c != '\n') {
                    state.command_line.push_char(ch);
                }
                DispatchResult::dirty()
            }
            Mode::Normal => {
                tracing::debug!(target: "actions.dispatch", len = text.len(), "paste_ignored_in_normal_mode");
                DispatchResult::clean()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditKind, ModeChange, MotionKind};
    use core_events::{KeyCode, KeyEvent};
    use core_text::{Buffer, Cursor};

    fn feed(t: &mut KeyTranslator, st: &mut EditorState, keys: &str) -> DispatchResult {
        let mut last = DispatchResult::clean();
        for c in keys.chars() {
            let ev = InputEvent::Key(KeyEvent::plain(KeyCode::Char(c)));
            last = handle_input(t, st, &ev);
        }
        last
    }

    #[test]
    fn typing_in_insert_mode_then_escape() {
        let mut st = EditorState::new(Buffer::new());
        let mut t = KeyTranslator::new();
        feed(&mut t, &mut st, "ihi");
        assert_eq!(st.mode, Mode::Insert);
        handle_input(&mut t, &mut st, &InputEvent::Key(KeyEvent::plain(KeyCode::Esc)));
        assert_eq!(st.mode, Mode::Normal);
        assert_eq!(st.buffer().lines(), ["hi"]);
        assert_eq!(st.undo_depth(), 2, "one snapshot per inserted character");
    }

    #[test]
    fn bracketed_paste_is_one_undo_step_and_normalizes_cr() {
        let mut st = EditorState::new(Buffer::from_str("[]"));
        st.cursor = Cursor::new(0, 1);
        dispatch(Action::ModeChange(ModeChange::EnterInsert), &mut st);
        let mut t = KeyTranslator::new();
        handle_input(&mut t, &mut st, &InputEvent::Paste("a\r\nb".into()));
        assert_eq!(st.buffer().lines(), ["[a", "b]"]);
        assert_eq!(st.undo_depth(), 1);
        dispatch(Action::Undo, &mut st);
        assert_eq!(st.buffer().lines(), ["[]"]);
    }

    #[test]
    fn paste_in_normal_mode_is_ignored() {
        let mut st = EditorState::new(Buffer::new());
        let mut t = KeyTranslator::new();
        let res = handle_input(&mut t, &mut st, &InputEvent::Paste("x".into()));
        assert!(!res.dirty);
        assert_eq!(st.buffer().lines(), [""]);
    }

    #[test]
    fn key_press_clears_status_and_records_last_key() {
        let mut st = EditorState::new(Buffer::new());
        let mut t = KeyTranslator::new();
        st.set_status("old");
        handle_input(&mut t, &mut st, &InputEvent::Key(KeyEvent::ctrl('y')));
        assert_eq!(st.status_text(), None);
        assert_eq!(st.last_key.as_deref(), Some("Ctrl+Y"));
    }

    #[test]
    fn x_in_normal_mode_deletes_under_cursor() {
        let mut st = EditorState::new(Buffer::from_str("abc"));
        let res = dispatch(Action::Edit(EditKind::DeleteForward), &mut st);
        assert!(res.dirty);
        assert_eq!(st.buffer().lines(), ["bc"]);
        dispatch(Action::Motion(MotionKind::LineEnd), &mut st);
        let res = dispatch(Action::Edit(EditKind::DeleteForward), &mut st);
        assert!(!res.dirty, "nothing under the cursor at end of line");
    }
}
