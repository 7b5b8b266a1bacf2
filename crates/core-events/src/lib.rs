//! Core event types and channel helpers for the editor runtime.
//!
//! Every producer (input task, tick source, chat requests) pushes `Event`s into one bounded
//! mpsc channel whose single consumer is the event loop. The loop owns all editor state; a
//! producer never touches that state directly, it only sends a value describing what happened.

use std::fmt;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Bounded channel; producers `send().await` and therefore park when the loop falls behind rather
// than dropping input. Chat completions share the channel so they are applied in arrival order,
// serialized with keystrokes.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 8192;

pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static CHAT_REQUESTS_STARTED: AtomicU64 = AtomicU64::new(0);
pub static CHAT_REPLIES_DELIVERED: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    /// Completion of a background chat request, delivered to the loop for application.
    Chat(ChatReply),
    /// Periodic wake used to expire transient status and force a redraw so background
    /// completions become visible even without new input.
    Tick,
    Shutdown,
}

/// Identifier correlating a chat request with its pending placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Speaker of one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    /// Wire name used by the chat API.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One prior exchange sent along with a new prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Result of one chat request. Errors are already rendered to a human-readable string because
/// they are displayed verbatim in the chat entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub request: RequestId,
    pub outcome: Result<String, String>,
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors usually hold configuration and
/// spawn one background task that pushes `Event`s into the shared channel, stopping when the
/// channel closes.
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    /// Spawn all registered sources, each with its own sender clone. During shutdown the caller
    /// drops its final sender before awaiting the returned handles so the sources observe the
    /// closed channel and exit.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every configured interval.
pub struct TickEventSource {
    interval: std::time::Duration,
}

impl TickEventSource {
    pub fn new(interval: std::time::Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Input
// -------------------------------------------------------------------------------------------------

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste payload, delivered whole.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Ctrl + character.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

/// Logical key identities consumed by higher layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        match self.code {
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::CTRL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            code => write!(f, "{code}"),
        }
    }
}
