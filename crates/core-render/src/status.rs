//! Status line composition.
//!
//! Two stages:
//! 1. `compose_status` produces an ordered vector of `StatusSegment` items from a
//!    `StatusContext`.
//! 2. `format_status` renders the segments into the final string.
//!
//! Format: ` MODE  name [+] - row:col`, where the mode badge is drawn reversed. A transient
//! message replaces everything up to the optional debug suffix ` | Last Key: <key>`.

use core_state::{EditorState, Mode};
use std::borrow::Cow;

/// Everything the status line depends on.
pub struct StatusContext<'a> {
    pub mode: Mode,
    /// 0-based cursor row.
    pub line: usize,
    /// 0-based logical column.
    pub col: usize,
    pub file_name: Cow<'a, str>,
    pub dirty: bool,
    pub message: Option<&'a str>,
    /// Set only when key debugging is enabled.
    pub last_key: Option<&'a str>,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState) -> Self {
        Self {
            mode: state.mode,
            line: state.cursor.row,
            col: state.cursor.col,
            file_name: Cow::Owned(state.buffer().display_name()),
            dirty: state.buffer().is_dirty(),
            message: state.status_text(),
            last_key: if state.debug_keys {
                state.last_key.as_deref()
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// Mode badge text including its padding (" NORMAL ").
    Mode(&'static str),
    /// File name with the ` [+]` marker when dirty.
    FileName(Cow<'a, str>),
    /// 1-based cursor position.
    Position { line_1: usize, col_1: usize },
    Message(&'a str),
    LastKey(&'a str),
}

fn badge(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => " NORMAL ",
        Mode::Insert => " INSERT ",
        Mode::Command => " COMMAND ",
        Mode::Search => " SEARCH ",
    }
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(4);
    match ctx.message {
        Some(msg) => out.push(StatusSegment::Message(msg)),
        None => {
            out.push(StatusSegment::Mode(badge(ctx.mode)));
            let file: Cow<'a, str> = if ctx.dirty {
                format!("{} [+]", ctx.file_name).into()
            } else {
                Cow::Borrowed(ctx.file_name.as_ref())
            };
            out.push(StatusSegment::FileName(file));
            out.push(StatusSegment::Position {
                line_1: ctx.line + 1,
                col_1: ctx.col + 1,
            });
        }
    }
    if let Some(key) = ctx.last_key {
        out.push(StatusSegment::LastKey(key));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => s.push_str(m),
            StatusSegment::FileName(name) => {
                s.push(' ');
                s.push_str(name);
            }
            StatusSegment::Position { line_1, col_1 } => {
                s.push_str(&format!(" - {line_1}:{col_1}"));
            }
            StatusSegment::Message(msg) => s.push_str(msg),
            StatusSegment::LastKey(key) => {
                s.push_str(" | Last Key: ");
                s.push_str(key);
            }
        }
    }
    s
}

/// Columns covered by the mode badge at the start of the formatted line.
pub fn badge_width(segments: &[StatusSegment<'_>]) -> usize {
    match segments.first() {
        Some(StatusSegment::Mode(m)) => m.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    fn ctx(mode: Mode, dirty: bool) -> StatusContext<'static> {
        StatusContext {
            mode,
            line: 4,
            col: 0,
            file_name: Cow::Borrowed("main.go"),
            dirty,
            message: None,
            last_key: None,
        }
    }

    #[test]
    fn normal_clean() {
        let c = ctx(Mode::Normal, false);
        let segs = compose_status(&c);
        assert_eq!(format_status(&segs), " NORMAL  main.go - 5:1");
        assert_eq!(badge_width(&segs), 8);
    }

    #[test]
    fn insert_dirty_marker() {
        let c = ctx(Mode::Insert, true);
        assert_eq!(
            format_status(&compose_status(&c)),
            " INSERT  main.go [+] - 5:1"
        );
    }

    #[test]
    fn message_replaces_body_but_keeps_debug_suffix() {
        let mut c = ctx(Mode::Normal, false);
        c.message = Some("File 'main.go' saved");
        c.last_key = Some("Ctrl+S");
        let segs = compose_status(&c);
        assert_eq!(badge_width(&segs), 0);
        assert_eq!(
            format_status(&segs),
            "File 'main.go' saved | Last Key: Ctrl+S"
        );
    }

    #[test]
    fn from_state_hides_last_key_unless_debugging() {
        let mut st = EditorState::new(Buffer::new());
        st.last_key = Some("x".into());
        assert_eq!(
            format_status(&compose_status(&StatusContext::from_state(&st))),
            " NORMAL  [No Name] - 1:1"
        );
        st.debug_keys = true;
        assert_eq!(
            format_status(&compose_status(&StatusContext::from_state(&st))),
            " NORMAL  [No Name] - 1:1 | Last Key: x"
        );
    }
}
