//! Editor state: the single owned aggregate mutated by the dispatcher.
//!
//! `EditorState` holds the buffer, cursor, scroll offsets, mode, focus, undo history, command
//! line, transient status, chat transcript, clipboard and search state. Nothing here is shared:
//! the event loop owns one instance and hands `&mut` to each handler in turn, so no field needs a
//! lock.
//!
//! Every text mutation goes through the `EditorState` edit methods, which capture an undo
//! snapshot before touching the buffer. Two edits bail out before snapshotting because they have
//! nothing to do: backspace at the buffer origin and delete-forward at the end of a line.
//!
//! Search matches are recomputed after every mutation so they always describe the current text.
//!
//! Undo and redo restore line content only. The cursor is clamped into the restored buffer but
//! otherwise left where it was.

use core_events::{ChatReply, ChatTurn, RequestId};
use core_text::search::{self, Match};
use core_text::{Buffer, Cursor};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod chat;
pub mod undo;

pub use chat::{ChatEntry, ChatHistory, EntryLabel, EntryState, PENDING_PLACEHOLDER};
pub use undo::{UNDO_CAPACITY, UndoEngine};

/// Default lifetime of a transient status message.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_millis(3000);

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    /// Typing an ex command after `:`.
    Command,
    /// Typing a search query after `/`.
    Search,
}

impl Mode {
    /// Label shown in the status bar badge.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
        }
    }
}

/// Which surface receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    ChatInput,
    ChatHistory,
}

/// Command-line contents while in `Command` or `Search` mode, including the leading prefix
/// character (`:` or `/`).
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    pub fn is_active(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Raw buffer including the prefix.
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// Text typed after the prefix.
    pub fn body(&self) -> &str {
        let mut chars = self.buf.chars();
        chars.next();
        chars.as_str()
    }

    pub fn prefix(&self) -> Option<char> {
        self.buf.chars().next()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Begin a new entry seeded with `prefix`.
    pub fn begin(&mut self, prefix: char) {
        self.buf.clear();
        self.buf.push(prefix);
    }

    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Remove the last typed character. Removing the prefix itself empties the line; the caller
    /// treats that as a cancel.
    pub fn backspace(&mut self) {
        self.buf.pop();
    }
}

#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Last submitted search and its matches.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    pub query: String,
    pub matches: Vec<Match>,
    /// Index into `matches` of the match the cursor was last moved to.
    pub current: Option<usize>,
}

impl SearchState {
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
    }

    /// Move to the nearest match strictly after (`forward`) or before `from`, wrapping around.
    pub fn step(&mut self, from: Cursor, forward: bool) -> Option<Match> {
        if self.matches.is_empty() {
            return None;
        }
        let key = (from.row, from.col);
        let idx = if forward {
            self.matches
                .iter()
                .position(|m| (m.row, m.col) > key)
                .unwrap_or(0)
        } else {
            self.matches
                .iter()
                .rposition(|m| (m.row, m.col) < key)
                .unwrap_or(self.matches.len() - 1)
        };
        self.current = Some(idx);
        Some(self.matches[idx])
    }
}

pub struct EditorState {
    buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub focus: Focus,
    /// First buffer row shown in the editor pane.
    pub row_offset: usize,
    /// First rendered column shown in the editor pane.
    pub col_offset: usize,
    /// Editor pane height from the last render, used for page motions.
    pub last_text_height: usize,
    undo: UndoEngine,
    pub command_line: CommandLineState,
    pub ephemeral_status: Option<EphemeralMessage>,
    status_ttl: Duration,
    pub chat: ChatHistory,
    pub chat_visible: bool,
    /// Single-line chat prompt being typed.
    pub chat_input: String,
    /// Transcript rows scrolled up from the bottom (0 follows the newest entry).
    pub chat_scroll: usize,
    /// Internal clipboard, filled by the copy commands and pasted with Ctrl+V.
    pub clipboard: String,
    pub search: SearchState,
    pub debug_keys: bool,
    /// Display form of the most recent key, shown when `debug_keys` is on.
    pub last_key: Option<String>,
    next_request: u64,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::origin(),
            mode: Mode::Normal,
            focus: Focus::Editor,
            row_offset: 0,
            col_offset: 0,
            last_text_height: 0,
            undo: UndoEngine::new(),
            command_line: CommandLineState::default(),
            ephemeral_status: None,
            status_ttl: DEFAULT_STATUS_TTL,
            chat: ChatHistory::new(),
            chat_visible: false,
            chat_input: String::new(),
            chat_scroll: 0,
            clipboard: String::new(),
            search: SearchState::default(),
            debug_keys: false,
            last_key: None,
            next_request: 1,
        }
    }

    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl = ttl;
        self
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Metadata access (path, read-only flag, save). Text edits must use the edit methods
    /// below so they are captured by undo.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    // ---------------------------------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------------------------------

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.set_ephemeral(msg, self.status_ttl);
    }

    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    pub fn clear_status(&mut self) {
        self.ephemeral_status = None;
    }

    pub fn status_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }

    /// Expire the status message; returns true if it was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    // ---------------------------------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------------------------------

    fn snapshot(&mut self) {
        self.undo.push_snapshot(&self.buffer);
    }

    /// Recompute matches for the active query against the current buffer.
    fn refresh_search(&mut self) {
        if self.search.query.is_empty() {
            return;
        }
        self.search.matches = search::find_all(&self.buffer, &self.search.query);
        self.search.current = None;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.snapshot();
        self.buffer.insert_char(&mut self.cursor, ch);
        self.refresh_search();
    }

    pub fn insert_newline(&mut self) {
        self.snapshot();
        self.buffer.insert_newline(&mut self.cursor);
        self.refresh_search();
    }

    /// Insert possibly multi-line text as a single undo step.
    pub fn insert_str(&mut self, text: &str) {
        self.snapshot();
        self.buffer.insert_str(&mut self.cursor, text);
        self.refresh_search();
    }

    /// Backspace; returns false when the cursor is at the buffer origin.
    pub fn backspace(&mut self) -> bool {
        self.cursor.clamp_to(&self.buffer);
        if self.cursor == Cursor::origin() {
            return false;
        }
        self.snapshot();
        let changed = self.buffer.delete_before(&mut self.cursor);
        self.refresh_search();
        changed
    }

    /// Delete the character under the cursor; returns false at the end of the line.
    pub fn delete_forward(&mut self) -> bool {
        self.cursor.clamp_to(&self.buffer);
        if self.cursor.col >= self.buffer.line_len(self.cursor.row) {
            return false;
        }
        self.snapshot();
        let changed = self.buffer.delete_at(&mut self.cursor);
        self.refresh_search();
        changed
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.undo.undo(&mut self.buffer);
        self.cursor.clamp_to(&self.buffer);
        self.refresh_search();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.undo.redo(&mut self.buffer);
        self.cursor.clamp_to(&self.buffer);
        self.refresh_search();
        changed
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    /// Swap in a freshly opened buffer: cursor, scroll, search and undo history all reset.
    pub fn replace_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.cursor = Cursor::origin();
        self.row_offset = 0;
        self.col_offset = 0;
        self.search.clear();
        self.undo.clear();
        debug!(target: "state", lines = self.buffer.line_count(), "buffer_replaced");
    }

    // ---------------------------------------------------------------------------------------
    // Chat
    // ---------------------------------------------------------------------------------------

    /// Show or hide the chat panel, moving focus with it.
    pub fn toggle_chat(&mut self) -> bool {
        self.chat_visible = !self.chat_visible;
        self.focus = if self.chat_visible {
            Focus::ChatInput
        } else {
            Focus::Editor
        };
        self.chat_visible
    }

    /// Record a chat prompt and allocate its request id. Returns `None` for a blank prompt;
    /// otherwise the id, the prior exchange and the trimmed prompt to send.
    pub fn submit_chat(&mut self, input: &str) -> Option<(RequestId, Vec<ChatTurn>, String)> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }
        let id = RequestId(self.next_request);
        self.next_request += 1;
        let turns = self.chat.submit(id, prompt);
        self.chat_scroll = 0;
        Some((id, turns, prompt.to_string()))
    }

    pub fn apply_chat_reply(&mut self, reply: &ChatReply) -> bool {
        let applied = self.chat.resolve(reply);
        if applied {
            self.chat_scroll = 0;
        }
        applied
    }
}
