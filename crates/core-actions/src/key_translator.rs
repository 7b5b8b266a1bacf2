//! KeyTranslator: stateful key -> Action translation.
//!
//! Precedence, highest first:
//! 1. Chat focus. While the chat input or chat history holds focus its own bindings apply and
//!    nothing else does (Ctrl+C in the history copies the transcript).
//! 2. Global keys (save, undo, redo, toggle chat, copy last response), in every editor mode.
//! 3. Mode bindings.
//!
//! The only multi-key sequence is `g g`. Its first key is remembered in a single slot that any
//! other key clears.

use crate::{Action, EditKind, ModeChange, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::{EditorState, Focus, Mode};

/// Rows moved by PageUp/PageDown in the chat history.
const CHAT_PAGE: isize = 10;

#[derive(Debug, Default)]
pub struct KeyTranslator {
    pending: Option<char>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<char> {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn translate(&mut self, state: &EditorState, key: &KeyEvent) -> Option<Action> {
        match state.focus {
            Focus::ChatInput => return chat_input(key),
            Focus::ChatHistory => return chat_history(key),
            Focus::Editor => {}
        }
        if let Some(action) = global(key) {
            self.reset();
            return Some(action);
        }
        match state.mode {
            Mode::Normal => self.normal(key),
            Mode::Insert => insert(key),
            Mode::Command | Mode::Search => command_line(key),
        }
    }

    fn normal(&mut self, key: &KeyEvent) -> Option<Action> {
        let pending = self.pending.take();
        if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return None;
        }
        let action = match key.code {
            KeyCode::Char('g') if pending == Some('g') => Action::Motion(MotionKind::BufferStart),
            KeyCode::Char('g') => {
                self.pending = Some('g');
                return None;
            }
            KeyCode::Char('i') => Action::ModeChange(ModeChange::EnterInsert),
            KeyCode::Char(':') => Action::CommandStart(':'),
            KeyCode::Char('/') => Action::CommandStart('/'),
            KeyCode::Char('h') | KeyCode::Left => Action::Motion(MotionKind::Left),
            KeyCode::Char('l') | KeyCode::Right => Action::Motion(MotionKind::Right),
            KeyCode::Char('k') | KeyCode::Up => Action::Motion(MotionKind::Up),
            KeyCode::Char('j') | KeyCode::Down => Action::Motion(MotionKind::Down),
            KeyCode::Char('w') => Action::Motion(MotionKind::WordForward),
            KeyCode::Char('b') => Action::Motion(MotionKind::WordBackward),
            KeyCode::Char('G') => Action::Motion(MotionKind::LastLine),
            KeyCode::Home => Action::Motion(MotionKind::LineStart),
            KeyCode::End => Action::Motion(MotionKind::LineEnd),
            KeyCode::PageUp => Action::Motion(MotionKind::PageUp),
            KeyCode::PageDown => Action::Motion(MotionKind::PageDown),
            KeyCode::Char('u') => Action::Undo,
            KeyCode::Char('x') => Action::Edit(EditKind::DeleteForward),
            KeyCode::Char('n') => Action::SearchNext,
            KeyCode::Char('N') => Action::SearchPrev,
            _ => return None,
        };
        Some(action)
    }
}

fn global(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::F(2) {
        return Some(Action::ToggleChat);
    }
    if !key.mods.contains(KeyModifiers::CTRL) {
        return None;
    }
    match key.code {
        KeyCode::Char('a') | KeyCode::Char('g') => Some(Action::ToggleChat),
        KeyCode::Char('s') => Some(Action::Save),
        KeyCode::Char('z') => Some(Action::Undo),
        KeyCode::Char('y') => Some(Action::Redo),
        KeyCode::Char('c') => Some(Action::CopyLastResponse),
        _ => None,
    }
}

fn insert(key: &KeyEvent) -> Option<Action> {
    if key.is_ctrl('v') {
        return Some(Action::Edit(EditKind::PasteClipboard));
    }
    let action = match key.code {
        KeyCode::Esc => Action::ModeChange(ModeChange::LeaveInsert),
        KeyCode::Enter => Action::Edit(EditKind::InsertNewline),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::DeleteForward),
        KeyCode::Tab => Action::Edit(EditKind::InsertChar('\t')),
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        KeyCode::PageUp => Action::Motion(MotionKind::PageUp),
        KeyCode::PageDown => Action::Motion(MotionKind::PageDown),
        KeyCode::Char(c) if !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
            Action::Edit(EditKind::InsertChar(c))
        }
        _ => return None,
    };
    Some(action)
}

fn command_line(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::CommandExecute),
        KeyCode::Esc => Some(Action::CommandCancel),
        KeyCode::Backspace => Some(Action::CommandBackspace),
        KeyCode::Char(c) if !key.mods.contains(KeyModifiers::CTRL) => Some(Action::CommandChar(c)),
        _ => None,
    }
}

fn chat_input(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::ChatSubmit),
        KeyCode::Esc => Some(Action::FocusEditor),
        KeyCode::Tab => Some(Action::ChatCycleFocus),
        KeyCode::Backspace => Some(Action::ChatBackspace),
        KeyCode::Char(c) if !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
            Some(Action::ChatChar(c))
        }
        _ => None,
    }
}

fn chat_history(key: &KeyEvent) -> Option<Action> {
    if key.is_ctrl('c') {
        return Some(Action::CopyTranscript);
    }
    match key.code {
        KeyCode::Esc => Some(Action::FocusEditor),
        KeyCode::Tab => Some(Action::ChatCycleFocus),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ChatScroll(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ChatScroll(-1)),
        KeyCode::PageUp => Some(Action::ChatScroll(CHAT_PAGE)),
        KeyCode::PageDown => Some(Action::ChatScroll(-CHAT_PAGE)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    fn key(c: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(c))
    }

    fn state() -> EditorState {
        EditorState::new(Buffer::from_str("abc"))
    }

    #[test]
    fn gg_requires_two_consecutive_gs() {
        let st = state();
        let mut t = KeyTranslator::new();
        assert_eq!(t.translate(&st, &key('g')), None);
        assert_eq!(t.pending(), Some('g'));
        assert_eq!(
            t.translate(&st, &key('g')),
            Some(Action::Motion(MotionKind::BufferStart))
        );
        assert_eq!(t.pending(), None);
    }

    #[test]
    fn other_key_clears_pending_g() {
        let st = state();
        let mut t = KeyTranslator::new();
        t.translate(&st, &key('g'));
        assert_eq!(
            t.translate(&st, &key('j')),
            Some(Action::Motion(MotionKind::Down))
        );
        assert_eq!(t.translate(&st, &key('g')), None, "starts a fresh sequence");
        t.translate(&st, &key('z'));
        assert_eq!(t.pending(), None, "unbound key still clears the slot");
    }

    #[test]
    fn globals_apply_in_every_editor_mode() {
        let mut st = state();
        let mut t = KeyTranslator::new();
        for mode in [Mode::Normal, Mode::Insert, Mode::Command, Mode::Search] {
            st.mode = mode;
            assert_eq!(t.translate(&st, &KeyEvent::ctrl('s')), Some(Action::Save));
            assert_eq!(t.translate(&st, &KeyEvent::ctrl('z')), Some(Action::Undo));
            assert_eq!(
                t.translate(&st, &KeyEvent::plain(KeyCode::F(2))),
                Some(Action::ToggleChat)
            );
        }
    }

    #[test]
    fn chat_focus_overrides_globals() {
        let mut st = state();
        let mut t = KeyTranslator::new();
        st.focus = Focus::ChatInput;
        assert_eq!(t.translate(&st, &KeyEvent::ctrl('s')), None);
        assert_eq!(t.translate(&st, &key('s')), Some(Action::ChatChar('s')));
        st.focus = Focus::ChatHistory;
        assert_eq!(
            t.translate(&st, &KeyEvent::ctrl('c')),
            Some(Action::CopyTranscript)
        );
        assert_eq!(t.translate(&st, &KeyEvent::ctrl('z')), None);
    }

    #[test]
    fn insert_mode_typing_and_paste() {
        let mut st = state();
        st.mode = Mode::Insert;
        let mut t = KeyTranslator::new();
        assert_eq!(
            t.translate(&st, &key('q')),
            Some(Action::Edit(EditKind::InsertChar('q')))
        );
        assert_eq!(
            t.translate(&st, &KeyEvent::plain(KeyCode::Tab)),
            Some(Action::Edit(EditKind::InsertChar('\t')))
        );
        assert_eq!(
            t.translate(&st, &KeyEvent::ctrl('v')),
            Some(Action::Edit(EditKind::PasteClipboard))
        );
    }

    #[test]
    fn unbound_normal_keys_are_ignored() {
        let st = state();
        let mut t = KeyTranslator::new();
        assert_eq!(t.translate(&st, &key('Q')), None);
        assert_eq!(t.translate(&st, &KeyEvent::plain(KeyCode::Enter)), None);
    }
}
