//! Key translation and action dispatch.
//!
//! Input flows `KeyEvent -> KeyTranslator -> Action -> dispatch -> DispatchResult`. The
//! translator is the only place that knows which key means what in which mode or focus; the
//! dispatcher only knows how each `Action` mutates `EditorState`.

pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{ChatRequest, DispatchResult, dispatch, handle_input};
pub use key_translator::KeyTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordForward,
    WordBackward,
    /// `gg`
    BufferStart,
    /// `G`: first column of the last line.
    LastLine,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnterInsert,
    LeaveInsert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    InsertNewline,
    Backspace,
    DeleteForward,
    /// Bracketed paste payload from the terminal.
    Paste(String),
    /// Ctrl+V: insert the internal clipboard.
    PasteClipboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    ModeChange(ModeChange),
    Edit(EditKind),
    Undo,
    Redo,
    Save,
    /// Open the command line with `:` (command) or `/` (search).
    CommandStart(char),
    CommandChar(char),
    CommandBackspace,
    CommandCancel,
    CommandExecute,
    SearchNext,
    SearchPrev,
    ToggleChat,
    CopyLastResponse,
    ChatChar(char),
    ChatBackspace,
    ChatSubmit,
    /// Tab between chat input and chat history.
    ChatCycleFocus,
    /// Positive scrolls toward older entries.
    ChatScroll(isize),
    CopyTranscript,
    FocusEditor,
}

impl Action {
    /// Stable name for logs; never includes typed or pasted text.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Motion(_) => "motion",
            Action::ModeChange(_) => "mode_change",
            Action::Edit(EditKind::Paste(_)) => "edit_paste",
            Action::Edit(_) => "edit",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Save => "save",
            Action::CommandStart(_) => "command_start",
            Action::CommandChar(_) => "command_char",
            Action::CommandBackspace => "command_backspace",
            Action::CommandCancel => "command_cancel",
            Action::CommandExecute => "command_execute",
            Action::SearchNext => "search_next",
            Action::SearchPrev => "search_prev",
            Action::ToggleChat => "toggle_chat",
            Action::CopyLastResponse => "copy_last_response",
            Action::ChatChar(_) => "chat_char",
            Action::ChatBackspace => "chat_backspace",
            Action::ChatSubmit => "chat_submit",
            Action::ChatCycleFocus => "chat_cycle_focus",
            Action::ChatScroll(_) => "chat_scroll",
            Action::CopyTranscript => "copy_transcript",
            Action::FocusEditor => "focus_editor",
        }
    }
}
