//! Command line editing and execution.
//!
//! The command line doubles as the search prompt: `:` opens it in Command mode, `/` in Search
//! mode. Submitting or cancelling always returns to Normal mode. Errors in a command only set a
//! status message; the buffer is left untouched.

use super::DispatchResult;
use super::command_parser::{CommandParser, ParsedCommand};
use super::{chat, search};
use crate::Action;
use crate::io_ops::{open_file, write_file};
use core_state::{EditorState, Mode};
use std::path::Path;

pub(crate) fn handle_command_action(action: Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::CommandStart(prefix) => {
            state.mode = if prefix == '/' {
                Mode::Search
            } else {
                Mode::Command
            };
            state.command_line.begin(prefix);
            DispatchResult::dirty()
        }
        Action::CommandChar(ch) => {
            state.command_line.push_char(ch);
            DispatchResult::dirty()
        }
        Action::CommandBackspace => {
            state.command_line.backspace();
            if !state.command_line.is_active() {
                state.mode = Mode::Normal;
            }
            DispatchResult::dirty()
        }
        Action::CommandCancel => {
            state.command_line.clear();
            state.mode = Mode::Normal;
            DispatchResult::dirty()
        }
        Action::CommandExecute => {
            let prefix = state.command_line.prefix();
            let body = state.command_line.body().to_string();
            state.command_line.clear();
            state.mode = Mode::Normal;
            match prefix {
                Some('/') => search::execute_search(&body, state),
                _ => execute_command(&body, state),
            }
        }
        _ => DispatchResult::clean(),
    }
}

fn execute_command(body: &str, state: &mut EditorState) -> DispatchResult {
    let parsed = CommandParser::parse(body);
    tracing::debug!(target: "actions.command", cmd = ?parsed, "execute");
    match parsed {
        ParsedCommand::Quit => {
            if state.buffer().is_dirty() {
                state.set_status("No write since last change (use q! to override)");
                DispatchResult::dirty()
            } else {
                DispatchResult::quit()
            }
        }
        ParsedCommand::ForceQuit => DispatchResult::quit(),
        ParsedCommand::Write => handle_save(state),
        ParsedCommand::WriteQuit => {
            handle_save(state);
            if state.buffer().is_dirty() {
                DispatchResult::dirty()
            } else {
                DispatchResult::quit()
            }
        }
        ParsedCommand::ToggleChat => chat::toggle(state),
        ParsedCommand::DebugKeys => {
            state.debug_keys = !state.debug_keys;
            state.set_status(if state.debug_keys {
                "Key debugging enabled"
            } else {
                "Key debugging disabled"
            });
            DispatchResult::dirty()
        }
        ParsedCommand::Copy(n) => chat::copy_response(n, state),
        ParsedCommand::CopyUsage => {
            state.set_status("Usage: copy <response-number>");
            DispatchResult::dirty()
        }
        ParsedCommand::CopyInvalid => {
            state.set_status("Invalid response number");
            DispatchResult::dirty()
        }
        ParsedCommand::GotoLine(n) => {
            let count = state.buffer().line_count();
            match usize::try_from(n) {
                Ok(line) if line >= 1 && line <= count => {
                    state.cursor.row = line - 1;
                    state.cursor.col = 0;
                }
                _ => state.set_status("Invalid line number"),
            }
            DispatchResult::dirty()
        }
        ParsedCommand::Edit { path, force } => handle_open(&path, force, state),
        ParsedCommand::EditMissingPath => {
            state.set_status("No file name");
            DispatchResult::dirty()
        }
        ParsedCommand::Unknown(cmd) => {
            state.set_status(format!("Unknown command: {cmd}"));
            DispatchResult::dirty()
        }
    }
}

pub(crate) fn handle_save(state: &mut EditorState) -> DispatchResult {
    match write_file(state) {
        Ok(msg) | Err(msg) => state.set_status(msg),
    }
    DispatchResult::dirty()
}

fn handle_open(path: &Path, force: bool, state: &mut EditorState) -> DispatchResult {
    if state.buffer().is_dirty() && !force {
        state.set_status("No write since last change (add ! to override)");
        return DispatchResult::dirty();
    }
    match open_file(path) {
        Ok(buffer) => {
            let name = buffer.display_name();
            let lines = buffer.line_count();
            state.replace_buffer(buffer);
            state.set_status(format!("'{name}' {lines}L"));
        }
        Err(msg) => state.set_status(msg),
    }
    DispatchResult::dirty()
}
