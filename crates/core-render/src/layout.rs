//! Screen layout: editor pane, optional chat panel, status bar and command line.
//!
//! ```text
//! +--------------------------+-+------------------+
//! | editor pane              |│| chat panel       |
//! |                          |│|                  |
//! +--------------------------+-+------------------+
//! | status bar                                    |
//! | command line                                  |
//! +-----------------------------------------------+
//! ```

/// Rectangular screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub editor: LayoutRegion,
    /// Chat panel including its left border column.
    pub chat: Option<LayoutRegion>,
    pub status_row: Option<u16>,
    pub command_row: Option<u16>,
}

/// Narrowest editor pane kept when the chat panel is open.
const MIN_EDITOR_WIDTH: u16 = 10;

impl Layout {
    pub fn compute(width: u16, height: u16, chat_visible: bool, panel_width: u16) -> Self {
        let (status_row, command_row, pane_height) = match height {
            0 => (None, None, 0),
            1 => (Some(0), None, 0),
            h => (Some(h - 2), Some(h - 1), h - 2),
        };
        let panel = if chat_visible {
            // Border column plus panel, leaving the editor a usable strip.
            let available = width.saturating_sub(MIN_EDITOR_WIDTH + 1);
            panel_width.min(available)
        } else {
            0
        };
        let (editor_width, chat) = if panel > 0 {
            let editor_width = width - panel - 1;
            (
                editor_width,
                Some(LayoutRegion::new(editor_width, 0, panel + 1, pane_height)),
            )
        } else {
            (width, None)
        };
        Self {
            width,
            height,
            editor: LayoutRegion::new(0, 0, editor_width, pane_height),
            chat,
            status_row,
            command_row,
        }
    }

    pub fn text_height(&self) -> usize {
        self.editor.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_only_reserves_two_rows() {
        let l = Layout::compute(80, 24, false, 40);
        assert_eq!(l.editor, LayoutRegion::new(0, 0, 80, 22));
        assert_eq!(l.status_row, Some(22));
        assert_eq!(l.command_row, Some(23));
        assert!(l.chat.is_none());
    }

    #[test]
    fn chat_panel_takes_right_columns() {
        let l = Layout::compute(100, 30, true, 40);
        assert_eq!(l.editor.width, 59);
        assert_eq!(l.chat, Some(LayoutRegion::new(59, 0, 41, 28)));
    }

    #[test]
    fn narrow_terminal_shrinks_panel() {
        let l = Layout::compute(30, 10, true, 40);
        assert_eq!(l.editor.width, 10);
        assert_eq!(l.chat.map(|c| c.width), Some(20));
        let tiny = Layout::compute(8, 10, true, 40);
        assert!(tiny.chat.is_none());
        assert_eq!(tiny.editor.width, 8);
    }

    #[test]
    fn degenerate_heights() {
        assert_eq!(Layout::compute(10, 1, false, 40).text_height(), 0);
        assert_eq!(Layout::compute(10, 0, false, 40).status_row, None);
    }
}
