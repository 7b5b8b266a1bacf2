use crate::{log_paste, map_key};
use core_events::{CHANNEL_SEND_FAILURES, Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent, KeyEventKind as CKind};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task reading `EventStream` until shutdown, stream end or channel close.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };
            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };
            let event = match result {
                Ok(CEvent::Key(key)) => match self.translate_key(&key) {
                    Some(ev) => ev,
                    None => continue,
                },
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.thread", w, h, "resize");
                    InputEvent::Resize(w, h)
                }
                Ok(CEvent::Paste(data)) => {
                    log_paste(&data);
                    InputEvent::Paste(data)
                }
                Ok(_) => continue,
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
            };
            if self.sender.send(Event::Input(event)).await.is_err() {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    fn translate_key(&self, key: &CKeyEvent) -> Option<InputEvent> {
        if !matches!(key.kind, CKind::Press | CKind::Repeat) {
            return None;
        }
        let mapped = map_key(key)?;
        trace!(target: "input.thread", key = %mapped, "keypress");
        Some(InputEvent::Key(mapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent, KeyModifiers};
    use crossterm::event::{KeyCode as CKeyCode, KeyEventState, KeyModifiers as CMods};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    async fn run_scenario(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        let stream = tokio_stream::iter(events.into_iter().map(Ok));
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;
        let mut outputs = Vec::new();
        while let Some(evt) = rx.recv().await {
            outputs.push(evt);
        }
        outputs
    }

    #[tokio::test]
    async fn forwards_keys_resize_and_paste() {
        let outputs = run_scenario(vec![
            CEvent::Key(CKeyEvent::new(CKeyCode::Char('a'), CMods::NONE)),
            CEvent::Resize(120, 48),
            CEvent::Paste("x\r\ny".into()),
        ])
        .await;
        assert_eq!(
            outputs,
            vec![
                Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char('a')))),
                Event::Input(InputEvent::Resize(120, 48)),
                Event::Input(InputEvent::Paste("x\r\ny".into())),
            ]
        );
    }

    #[tokio::test]
    async fn drops_release_events_and_keeps_modifiers() {
        let release = CKeyEvent {
            code: CKeyCode::Char('b'),
            modifiers: CMods::NONE,
            kind: CKind::Release,
            state: KeyEventState::NONE,
        };
        let outputs = run_scenario(vec![
            CEvent::Key(release),
            CEvent::Key(CKeyEvent::new(CKeyCode::Char('z'), CMods::CONTROL)),
            CEvent::FocusGained,
        ])
        .await;
        assert_eq!(
            outputs,
            vec![Event::Input(InputEvent::Key(KeyEvent::new(
                KeyCode::Char('z'),
                KeyModifiers::CTRL
            )))]
        );
    }

    #[tokio::test]
    async fn shutdown_signal_exits_immediately() {
        let (tx, mut rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let stream = UnboundedReceiverStream::new(event_rx);
        let (shutdown, listener) = ShutdownListener::new_pair();

        let task = tokio::spawn(async move {
            let _keep_alive = event_tx;
            AsyncEventStreamTask::new(tx, stream, listener).run().await;
        });
        shutdown.signal();

        timeout(Duration::from_millis(200), task)
            .await
            .expect("shutdown should resolve promptly")
            .expect("task join failed");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_channel_stops_task() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let before = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed);
        let stream = tokio_stream::iter(vec![Ok(CEvent::Resize(1, 1)), Ok(CEvent::Resize(2, 2))]);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert!(CHANNEL_SEND_FAILURES.load(Ordering::Relaxed) > before);
    }
}
