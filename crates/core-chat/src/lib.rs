//! Chat completion backends and the bridge that runs them off the event loop.
//!
//! A `ChatBackend` turns a prior exchange plus a new prompt into one reply string. The
//! `ChatBridge` spawns one tokio task per request; the task never touches editor state and
//! reports back only by sending `Event::Chat` into the runtime channel, where the loop applies it
//! serially with every other event.

use core_events::ChatTurn;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub mod bridge;
pub mod gemini;

pub use bridge::ChatBridge;
pub use gemini::GeminiBackend;

/// Failure of one chat request. The `Display` form is what the user sees in the chat panel.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),
    #[error("http request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("gemini API error (status {code}): {body}")]
    Status { code: u16, body: String },
    #[error("failed to unmarshal response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Api(String),
    #[error("no content in gemini response")]
    EmptyResponse,
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;

/// Something that can answer a prompt given the conversation so far.
pub trait ChatBackend: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    fn complete(&self, history: Vec<ChatTurn>, prompt: String) -> ChatFuture<'_>;
}
