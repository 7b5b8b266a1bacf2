//! Configuration loading and parsing.
//!
//! Parses `air.toml` (or an override path provided by the binary). Every field is optional and
//! falls back to a built-in default; unknown fields are ignored so older binaries tolerate newer
//! files. A file that fails to parse is logged and replaced by defaults rather than aborting
//! startup.
//!
//! The chat credential is deliberately absent: only the *name* of the environment variable that
//! holds it is configurable.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "air.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the model collection; the model name and `:generateContent` are appended.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Width in columns of the chat side panel.
    pub panel_width: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
            panel_width: 40,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Periodic redraw interval.
    pub tick_ms: u64,
    /// Lifetime of transient status-bar messages.
    pub status_ttl_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            status_ttl_ms: 3000,
        }
    }
}

impl UiConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path the configuration was read from, if any file was found and parsed.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

impl Config {
    pub fn chat(&self) -> &ChatConfig {
        &self.file.chat
    }

    pub fn ui(&self) -> &UiConfig {
        &self.file.ui
    }
}

/// Best-effort config path: `./air.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("air").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_not_found_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.source.is_none());
        assert_eq!(cfg.chat().api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.chat().timeout(), Duration::from_secs(30));
        assert_eq!(cfg.ui().tick_interval(), Duration::from_millis(100));
        assert_eq!(cfg.chat().panel_width, 40);
    }

    #[test]
    fn parses_partial_chat_section() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[chat]\nmodel = \"gemini-pro\"\ntimeout_secs = 5\n[ui]\ntick_ms = 250\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.chat().model, "gemini-pro");
        assert_eq!(cfg.chat().timeout_secs, 5);
        assert_eq!(cfg.chat().api_key_env, "GEMINI_API_KEY", "unset keys keep defaults");
        assert_eq!(cfg.ui().tick_ms, 250);
        assert_eq!(cfg.ui().status_ttl_ms, 3000);
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn parse_error_falls_back_and_logs() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[chat\nmodel = ").unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf()))).unwrap();

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed_using_defaults"));
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn zero_intervals_are_floored() {
        let ui = UiConfig {
            tick_ms: 0,
            status_ttl_ms: 0,
        };
        assert_eq!(ui.tick_interval(), Duration::from_millis(10));
        let chat = ChatConfig {
            timeout_secs: 0,
            ..ChatConfig::default()
        };
        assert_eq!(chat.timeout(), Duration::from_secs(1));
    }
}
