//! File IO helpers used by the dispatcher.
//!
//! Synchronous and minimal. They translate `BufferError`s into the status-bar wording and log
//! with target `io`; buffer content is never logged.

use core_state::EditorState;
use core_text::{Buffer, BufferError};
use std::path::Path;

/// Save the buffer to its path. Returns the status message to show.
pub fn write_file(state: &mut EditorState) -> Result<String, String> {
    let name = state.buffer().display_name();
    match state.buffer_mut().save() {
        Ok(()) => {
            tracing::info!(target: "io", file = %name, lines = state.buffer().line_count(), "file_saved");
            Ok(format!("File '{name}' saved"))
        }
        Err(BufferError::NoFileName) => {
            tracing::warn!(target: "io", "write_no_filename");
            Err("No file name".to_string())
        }
        Err(e) => {
            tracing::error!(target: "io", error = %e, "file_write_error");
            Err(format!("Error saving file: {e}"))
        }
    }
}

/// Open `path` into a fresh buffer (a missing file becomes an empty buffer bound to the path).
pub fn open_file(path: &Path) -> Result<Buffer, String> {
    match Buffer::open(path) {
        Ok(buffer) => {
            tracing::info!(target: "io", path = %path.display(), lines = buffer.line_count(), read_only = buffer.is_read_only(), "file_opened");
            Ok(buffer)
        }
        Err(e) => {
            tracing::error!(target: "io", error = %e, "file_open_error");
            Err(format!("Error opening file: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_clears_dirty_and_reports_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut state = EditorState::new(Buffer::open(&path).unwrap());
        state.insert_char('a');
        let msg = write_file(&mut state).unwrap();
        assert_eq!(msg, "File 'out.txt' saved");
        assert!(!state.buffer().is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a");
    }

    #[test]
    fn write_file_no_filename() {
        let mut state = EditorState::new(Buffer::from_str("x"));
        state.insert_char('y');
        assert_eq!(write_file(&mut state).unwrap_err(), "No file name");
        assert!(state.buffer().is_dirty(), "dirty unchanged when no filename");
    }

    #[test]
    fn write_file_read_only_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Buffer::open(dir.path().join("ro.txt")).unwrap();
        buf.set_read_only(true);
        let mut state = EditorState::new(buf);
        state.insert_char('z');
        let err = write_file(&mut state).unwrap_err();
        assert!(err.starts_with("Error saving file:"), "{err}");
        assert!(state.buffer().is_dirty());
    }

    #[test]
    fn open_missing_file_is_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let buf = open_file(&dir.path().join("new.txt")).unwrap();
        assert_eq!(buf.lines(), [""]);
        assert_eq!(buf.display_name(), "new.txt");
    }
}
