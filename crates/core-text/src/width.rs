//! Rendered-column math.
//!
//! A tab advances to the next multiple of `TAB_STOP`; every other character occupies exactly one
//! cell. The rendered column of a cursor is derived on demand and never stored as truth.

/// Tab stop width in cells.
pub const TAB_STOP: usize = 4;

/// Rendered column (`rx`) for logical column `col` of `line`.
///
/// Columns past the end of the line count one cell each, so a cursor sitting after the last
/// character renders one cell beyond it.
pub fn render_col(line: &str, col: usize) -> usize {
    let mut chars = line.chars();
    let mut rx = 0;
    for _ in 0..col {
        match chars.next() {
            Some('\t') => rx += TAB_STOP - (rx % TAB_STOP),
            _ => rx += 1,
        }
    }
    rx
}

/// Expand tabs into spaces, producing exactly the cells `render_col` accounts for.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rx = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_STOP - (rx % TAB_STOP);
            out.extend(std::iter::repeat_n(' ', pad));
            rx += pad;
        } else {
            out.push(ch);
            rx += 1;
        }
    }
    out
}
