//! AIR entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{ChatRequest, KeyTranslator, handle_input};
use core_chat::{ChatBridge, GeminiBackend};
use core_config::load_from;
use core_events::{
    CHANNEL_SEND_FAILURES, CHAT_REPLIES_DELIVERED, CHAT_REQUESTS_STARTED, EVENT_CHANNEL_CAP,
    Event, EventSourceRegistry, InputEvent, TickEventSource,
};
use core_render::RenderEngine;
use core_state::EditorState;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use core_text::Buffer;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "air.log";
const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "air", version, about = "Modal text editor with an AI chat panel")]
struct Args {
    /// File to open. A path that does not exist yet opens an empty buffer bound to it.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `air.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Refuse to write the buffer back to disk.
    #[arg(long)]
    pub readonly: bool,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct EditorBootstrap {
    state: EditorState,
    config: core_config::Config,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    /// Everything that can fail before the terminal is touched: config and the initial buffer.
    fn bootstrap(args: Args) -> Result<EditorBootstrap> {
        let config = load_from(args.config.clone())?;
        let mut buffer = match args.path.as_ref() {
            Some(path) => Buffer::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?,
            None => Buffer::new(),
        };
        if args.readonly {
            buffer.set_read_only(true);
        }
        info!(
            target: "runtime",
            path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
            lines = buffer.line_count(),
            read_only = buffer.is_read_only(),
            config_override = args.config.is_some(),
            "bootstrap_complete"
        );
        let state = EditorState::new(buffer).with_status_ttl(config.ui().status_ttl());
        Ok(EditorBootstrap { state, config })
    }
}

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue {
        redraw: bool,
        resized: bool,
        chat: Option<ChatRequest>,
    },
    Break {
        reason: ShutdownReason,
    },
}

impl LoopControl {
    fn redraw() -> Self {
        LoopControl::Continue {
            redraw: true,
            resized: false,
            chat: None,
        }
    }

    fn idle() -> Self {
        LoopControl::Continue {
            redraw: false,
            resized: false,
            chat: None,
        }
    }
}

/// State the loop mutates serially, one event at a time. Holds no terminal or task handles so
/// event handling can be driven directly.
struct LoopCore {
    state: EditorState,
    translator: KeyTranslator,
}

impl LoopCore {
    fn new(state: EditorState) -> Self {
        Self {
            state,
            translator: KeyTranslator::new(),
        }
    }

    fn handle_event(&mut self, event: &Event) -> LoopControl {
        match event {
            Event::Input(input) => self.handle_input_event(input),
            Event::Chat(reply) => {
                trace!(
                    target: "runtime.events",
                    request = %reply.request,
                    ok = reply.outcome.is_ok(),
                    "chat_reply"
                );
                if self.state.apply_chat_reply(reply) {
                    LoopControl::redraw()
                } else {
                    LoopControl::idle()
                }
            }
            Event::Tick => {
                if self.state.tick_ephemeral() {
                    trace!(target: "runtime.events", "status_expired");
                }
                LoopControl::redraw()
            }
            Event::Shutdown => LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent,
            },
        }
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        let result = handle_input(&mut self.translator, &mut self.state, input);
        if result.quit {
            return LoopControl::Break {
                reason: ShutdownReason::Quit,
            };
        }
        LoopControl::Continue {
            redraw: result.dirty,
            resized: matches!(input, InputEvent::Resize(..)),
            chat: result.chat_request,
        }
    }
}

struct EditorRuntime<'a> {
    core: LoopCore,
    render_engine: RenderEngine,
    bridge: Option<ChatBridge>,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    terminal: TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    async fn run(&mut self) -> Result<()> {
        self.render_frame();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match self.core.handle_event(&event) {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue {
                    redraw,
                    resized,
                    chat,
                } => {
                    if let Some(req) = chat
                        && let Some(bridge) = self.bridge.as_mut()
                    {
                        bridge.submit(req.id, req.history, req.prompt);
                    }
                    if resized {
                        self.render_engine.invalidate();
                    }
                    if redraw {
                        self.render_frame();
                    }
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn render_frame(&mut self) {
        let (w, h) = match self.terminal.backend().size() {
            Ok(size) => size,
            Err(e) => {
                error!(target: "render.engine", ?e, "terminal_size_error");
                return;
            }
        };
        let mut out = std::io::stdout().lock();
        if let Err(e) = self.render_engine.render(&mut self.core.state, w, h, &mut out) {
            error!(target: "render.engine", ?e, "render_error");
        }
        let _ = out.flush();
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(bridge) = self.bridge.take() {
            bridge.shutdown(SHUTDOWN_JOIN_TIMEOUT).await;
        }
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            handle.abort();
            match tokio::time::timeout(SHUTDOWN_JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(SHUTDOWN_JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_timeout"
                ),
            }
        }

        let render = self.render_engine.metrics_snapshot();
        info!(
            target: "runtime.shutdown",
            full_frames = render.full_frames,
            partial_frames = render.partial_frames,
            rows_repainted = render.rows_repainted,
            rows_skipped = render.rows_skipped,
            chat_requests = CHAT_REQUESTS_STARTED.load(Ordering::Relaxed),
            chat_replies = CHAT_REPLIES_DELIVERED.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            "runtime_counters"
        );
        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let EditorBootstrap { state, config } = AppStartup::bootstrap(args)?;
    let backend = Arc::new(GeminiBackend::from_config(config.chat())?);

    let mut terminal = startup.backend.enter_guard()?;
    terminal.backend().set_title("AIR")?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(config.ui().tick_interval()));
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = EditorRuntime {
        core: LoopCore::new(state),
        render_engine: RenderEngine::new(config.chat().panel_width),
        bridge: Some(ChatBridge::new(backend, tx.clone())),
        rx,
        tx: Some(tx),
        source_handles,
        input_task: Some(input_task),
        input_shutdown: Some(input_shutdown),
        terminal,
    };
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{ChatReply, KeyCode, KeyEvent, KeyModifiers};
    use core_state::{Focus, Mode};
    use pretty_assertions::assert_eq;

    fn key(ch: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char(ch))))
    }

    fn feed(core: &mut LoopCore, keys: &str) -> LoopControl {
        let mut last = LoopControl::idle();
        for ch in keys.chars() {
            last = core.handle_event(&key(ch));
        }
        last
    }

    #[test]
    fn args_accept_path_config_and_readonly() {
        let args =
            Args::try_parse_from(["air", "main.go", "--config", "alt.toml", "--readonly"]).unwrap();
        assert_eq!(args.path, Some(PathBuf::from("main.go")));
        assert_eq!(args.config, Some(PathBuf::from("alt.toml")));
        assert!(args.readonly);

        let bare = Args::try_parse_from(["air"]).unwrap();
        assert_eq!(bare.path, None);
        assert!(!bare.readonly);
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::Quit.as_str(), "quit");
        assert_eq!(ShutdownReason::ShutdownEvent.to_string(), "shutdown_event");
        assert_eq!(ShutdownReason::ChannelClosed.as_str(), "channel_closed");
    }

    #[test]
    fn quit_command_breaks_loop_on_clean_buffer() {
        let mut core = LoopCore::new(EditorState::new(Buffer::new()));
        feed(&mut core, ":q");
        let control = core.handle_event(&Event::Input(InputEvent::Key(KeyEvent::plain(
            KeyCode::Enter,
        ))));
        assert_eq!(
            control,
            LoopControl::Break {
                reason: ShutdownReason::Quit
            }
        );
    }

    #[test]
    fn chat_submit_yields_request_and_reply_redraws() {
        let mut core = LoopCore::new(EditorState::new(Buffer::new()));
        core.handle_event(&Event::Input(InputEvent::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::CTRL,
        ))));
        assert_eq!(core.state.focus, Focus::ChatInput);
        feed(&mut core, "hi");
        let control = core.handle_event(&Event::Input(InputEvent::Key(KeyEvent::plain(
            KeyCode::Enter,
        ))));
        let LoopControl::Continue {
            chat: Some(req), ..
        } = control
        else {
            panic!("expected chat request, got {control:?}");
        };
        assert_eq!(req.prompt, "hi");

        let reply = Event::Chat(ChatReply {
            request: req.id,
            outcome: Ok("hello".into()),
        });
        assert_eq!(core.handle_event(&reply), LoopControl::redraw());
        // A second delivery for the same id finds no placeholder.
        assert_eq!(core.handle_event(&reply), LoopControl::idle());
    }

    #[test]
    fn resize_requests_full_redraw_and_shutdown_breaks() {
        let mut core = LoopCore::new(EditorState::new(Buffer::new()));
        assert_eq!(
            core.handle_event(&Event::Input(InputEvent::Resize(100, 30))),
            LoopControl::Continue {
                redraw: true,
                resized: true,
                chat: None
            }
        );
        assert_eq!(core.state.mode, Mode::Normal);
        assert_eq!(
            core.handle_event(&Event::Shutdown),
            LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent
            }
        );
    }

    #[test]
    fn every_tick_redraws_and_expires_status() {
        let mut core =
            LoopCore::new(EditorState::new(Buffer::new()).with_status_ttl(Duration::ZERO));
        assert_eq!(core.handle_event(&Event::Tick), LoopControl::redraw());
        core.state.set_status("Invalid line number");
        assert_eq!(core.handle_event(&Event::Tick), LoopControl::redraw());
        assert_eq!(core.state.status_text(), None);
    }
}
