use crate::ChatBackend;
use core_events::{CHAT_REPLIES_DELIVERED, CHAT_REQUESTS_STARTED, ChatReply, ChatTurn, Event, RequestId};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawns one background task per chat request and routes each outcome back to the event loop
/// as `Event::Chat`. Requests are independent; a new submission never cancels an earlier one.
pub struct ChatBridge {
    backend: Arc<dyn ChatBackend>,
    tx: Sender<Event>,
    in_flight: Vec<JoinHandle<()>>,
}

impl ChatBridge {
    pub fn new(backend: Arc<dyn ChatBackend>, tx: Sender<Event>) -> Self {
        Self {
            backend,
            tx,
            in_flight: Vec::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn submit(&mut self, request: RequestId, history: Vec<ChatTurn>, prompt: String) {
        self.in_flight.retain(|h| !h.is_finished());
        CHAT_REQUESTS_STARTED.fetch_add(1, Ordering::Relaxed);
        info!(target: "chat.bridge", %request, backend = self.backend.name(), turns = history.len(), prompt_len = prompt.len(), "request_spawned");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.in_flight.push(tokio::spawn(async move {
            let outcome = backend
                .complete(history, prompt)
                .await
                .map_err(|e| e.to_string());
            if let Err(e) = &outcome {
                warn!(target: "chat.bridge", %request, error = %e, "request_failed");
            }
            if tx
                .send(Event::Chat(ChatReply { request, outcome }))
                .await
                .is_err()
            {
                core_events::CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                warn!(target: "chat.bridge", %request, "event_channel_closed");
                return;
            }
            CHAT_REPLIES_DELIVERED.fetch_add(1, Ordering::Relaxed);
        }));
    }

    /// Abort outstanding requests and wait (bounded) for their tasks to unwind.
    pub async fn shutdown(mut self, timeout: Duration) {
        let handles = std::mem::take(&mut self.in_flight);
        let pending = handles.iter().filter(|h| !h.is_finished()).count();
        for h in &handles {
            h.abort();
        }
        for h in handles {
            let _ = tokio::time::timeout(timeout, h).await;
        }
        info!(target: "runtime.shutdown", aborted = pending, "chat_bridge_stopped");
    }
}
