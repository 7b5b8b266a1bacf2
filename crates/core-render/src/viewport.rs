//! Viewport reconciliation.
//!
//! The viewport is the editor pane's window onto the buffer: a row offset, a rendered-column
//! offset and the pane size. After `scroll_to_cursor` the cursor row lies in
//! `[row_offset, row_offset + height)` and its rendered column in
//! `[col_offset, col_offset + width)`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(row_offset: usize, col_offset: usize, width: usize, height: usize) -> Self {
        Self {
            row_offset,
            col_offset,
            width,
            height,
        }
    }

    /// Shift the offsets by the minimum needed to bring `(row, rx)` into view. A zero-sized pane
    /// leaves the offsets untouched.
    pub fn scroll_to_cursor(&mut self, row: usize, rx: usize) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        if row < self.row_offset {
            self.row_offset = row;
        }
        if row >= self.row_offset + self.height {
            self.row_offset = row + 1 - self.height;
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + self.width {
            self.col_offset = rx + 1 - self.width;
        }
    }

    pub fn contains(&self, row: usize, rx: usize) -> bool {
        (self.row_offset..self.row_offset + self.height).contains(&row)
            && (self.col_offset..self.col_offset + self.width).contains(&rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scrolls_down_minimally() {
        let mut vp = Viewport::new(0, 0, 10, 5);
        vp.scroll_to_cursor(7, 0);
        assert_eq!(vp.row_offset, 3);
        vp.scroll_to_cursor(4, 0);
        assert_eq!(vp.row_offset, 3, "already visible");
        vp.scroll_to_cursor(1, 0);
        assert_eq!(vp.row_offset, 1);
    }

    #[test]
    fn scrolls_horizontally_on_rendered_column() {
        let mut vp = Viewport::new(0, 0, 8, 5);
        vp.scroll_to_cursor(0, 8);
        assert_eq!(vp.col_offset, 1);
        vp.scroll_to_cursor(0, 0);
        assert_eq!(vp.col_offset, 0);
    }

    #[test]
    fn zero_sized_pane_is_a_noop() {
        let mut vp = Viewport::new(4, 2, 0, 0);
        vp.scroll_to_cursor(100, 100);
        assert_eq!((vp.row_offset, vp.col_offset), (4, 2));
    }

    proptest! {
        #[test]
        fn cursor_always_visible_after_reconcile(
            row_offset in 0usize..200,
            col_offset in 0usize..200,
            width in 1usize..80,
            height in 1usize..40,
            row in 0usize..300,
            rx in 0usize..300,
        ) {
            let mut vp = Viewport::new(row_offset, col_offset, width, height);
            vp.scroll_to_cursor(row, rx);
            prop_assert!(vp.contains(row, rx));
        }
    }
}
