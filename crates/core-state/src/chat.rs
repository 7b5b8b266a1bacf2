//! Chat transcript owned by the editor state.
//!
//! Entries are append-only except for the in-place resolution of a pending placeholder. Each
//! placeholder carries the `RequestId` of the request it stands in for, so concurrent requests
//! resolve into the right slot regardless of completion order.

use core_events::{ChatReply, ChatRole, ChatTurn, RequestId};
use std::fmt;
use tracing::{debug, warn};

/// Text shown for a request that has not completed yet.
pub const PENDING_PLACEHOLDER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending(RequestId),
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
    pub state: EntryState,
}

impl ChatEntry {
    pub fn is_pending(&self) -> bool {
        matches!(self.state, EntryState::Pending(_))
    }

    /// A model entry that is no longer a placeholder (successful or failed).
    pub fn is_completed_response(&self) -> bool {
        self.role == ChatRole::Model && !self.is_pending()
    }
}

/// Speaker label shown in front of an entry. Completed responses are numbered so they can be
/// addressed by `:copy <n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLabel {
    User,
    Response(usize),
    Pending,
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryLabel::User => f.write_str("You:"),
            EntryLabel::Response(n) => write!(f, "AI #{n}:"),
            EntryLabel::Pending => f.write_str("AI:"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Record a user prompt plus its pending placeholder and return the prior exchange to send
    /// with it. Pending and failed entries are not part of the conversation the model sees.
    pub fn submit(&mut self, request: RequestId, prompt: &str) -> Vec<ChatTurn> {
        let turns = self
            .entries
            .iter()
            .filter(|e| e.state == EntryState::Complete)
            .map(|e| ChatTurn {
                role: e.role,
                text: e.content.clone(),
            })
            .collect();
        self.entries.push(ChatEntry {
            role: ChatRole::User,
            content: prompt.to_string(),
            state: EntryState::Complete,
        });
        self.entries.push(ChatEntry {
            role: ChatRole::Model,
            content: PENDING_PLACEHOLDER.to_string(),
            state: EntryState::Pending(request),
        });
        turns
    }

    /// Replace the placeholder for `reply.request`. Returns false when no such placeholder
    /// exists (already resolved or never issued).
    pub fn resolve(&mut self, reply: &ChatReply) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.state == EntryState::Pending(reply.request))
        else {
            warn!(target: "chat.bridge", request = %reply.request, "reply_for_unknown_request");
            return false;
        };
        match &reply.outcome {
            Ok(text) => {
                entry.content = text.clone();
                entry.state = EntryState::Complete;
            }
            Err(message) => {
                entry.content = format!("Error: {message}");
                entry.state = EntryState::Failed;
            }
        }
        debug!(target: "chat.bridge", request = %reply.request, ok = reply.outcome.is_ok(), len = entry.content.len(), "reply_applied");
        true
    }

    /// The `n`-th (1-based) completed model response, ignoring placeholders.
    pub fn response(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| e.is_completed_response())
            .nth(n - 1)
            .map(|e| e.content.as_str())
    }

    pub fn last_response(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.is_completed_response())
            .map(|e| e.content.as_str())
    }

    /// Entries paired with their display label.
    pub fn labeled(&self) -> Vec<(EntryLabel, &ChatEntry)> {
        let mut responses = 0;
        self.entries
            .iter()
            .map(|e| {
                let label = match e.role {
                    ChatRole::User => EntryLabel::User,
                    ChatRole::Model if e.is_pending() => EntryLabel::Pending,
                    ChatRole::Model => {
                        responses += 1;
                        EntryLabel::Response(responses)
                    }
                };
                (label, e)
            })
            .collect()
    }

    /// Plain-text rendering of the whole conversation, one entry per line.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for (label, entry) in self.labeled() {
            out.push_str(&format!("{label} {}\n", entry.content));
        }
        out
    }

    pub fn completed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.is_completed_response())
            .count()
    }
}
