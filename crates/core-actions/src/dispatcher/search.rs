use super::DispatchResult;
use core_state::EditorState;
use core_text::search;

/// Record `query`, collect every match and jump to the first one at or after the cursor.
pub(crate) fn execute_search(query: &str, state: &mut EditorState) -> DispatchResult {
    if query.is_empty() {
        state.search.clear();
        return DispatchResult::dirty();
    }
    let matches = search::find_all(state.buffer(), query);
    let count = matches.len();
    state.search.current = search::next_from(&matches, state.cursor);
    if let Some(i) = state.search.current {
        state.cursor = matches[i].start();
    }
    state.search.query = query.to_string();
    state.search.matches = matches;
    tracing::debug!(target: "actions.dispatch", query_len = query.len(), matches = count, "search");
    state.set_status(format!("\"{query}\": {count} matches"));
    DispatchResult::dirty()
}

/// `n` / `N`.
pub(crate) fn handle_step(state: &mut EditorState, forward: bool) -> DispatchResult {
    let from = state.cursor;
    match state.search.step(from, forward) {
        Some(m) => {
            let mut cursor = m.start();
            cursor.clamp_to(state.buffer());
            state.cursor = cursor;
            DispatchResult::dirty()
        }
        None if state.search.query.is_empty() => {
            state.set_status("No previous search");
            DispatchResult::dirty()
        }
        None => {
            let msg = format!("\"{}\": 0 matches", state.search.query);
            state.set_status(msg);
            DispatchResult::dirty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Cursor};

    #[test]
    fn search_moves_to_first_match_at_or_after_cursor() {
        let mut st = EditorState::new(Buffer::from_str("foo\nbar foo\nfoo"));
        st.cursor = Cursor::new(1, 0);
        execute_search("foo", &mut st);
        assert_eq!(st.cursor, Cursor::new(1, 4));
        assert_eq!(st.search.matches.len(), 3);
        assert_eq!(st.status_text(), Some("\"foo\": 3 matches"));
    }

    #[test]
    fn search_wraps_and_steps() {
        let mut st = EditorState::new(Buffer::from_str("foo\nbar foo\nxyz"));
        st.cursor = Cursor::new(2, 1);
        execute_search("foo", &mut st);
        assert_eq!(st.cursor, Cursor::origin(), "wrapped to first match");
        handle_step(&mut st, true);
        assert_eq!(st.cursor, Cursor::new(1, 4));
        handle_step(&mut st, true);
        assert_eq!(st.cursor, Cursor::origin());
        handle_step(&mut st, false);
        assert_eq!(st.cursor, Cursor::new(1, 4));
    }

    #[test]
    fn no_matches_keeps_cursor() {
        let mut st = EditorState::new(Buffer::from_str("abc"));
        st.cursor.col = 2;
        execute_search("zzz", &mut st);
        assert_eq!(st.cursor.col, 2);
        assert_eq!(st.status_text(), Some("\"zzz\": 0 matches"));
        handle_step(&mut st, true);
        assert_eq!(st.status_text(), Some("\"zzz\": 0 matches"));
    }

    #[test]
    fn empty_query_clears_matches() {
        let mut st = EditorState::new(Buffer::from_str("abc"));
        execute_search("b", &mut st);
        execute_search("", &mut st);
        assert!(st.search.matches.is_empty());
        handle_step(&mut st, true);
        assert_eq!(st.status_text(), Some("No previous search"));
    }

    #[test]
    fn stepping_after_joining_lines_lands_inside_buffer() {
        let mut st = EditorState::new(Buffer::from_str("foo\nbar\nfoo foo"));
        execute_search("foo", &mut st);
        st.cursor = Cursor::new(2, 0);
        st.backspace();
        st.backspace();
        st.cursor = Cursor::new(1, 0);
        st.backspace();
        assert_eq!(st.buffer().line_count(), 1);

        for _ in 0..4 {
            handle_step(&mut st, true);
            assert_eq!(st.cursor.row, 0);
            assert!(st.cursor.col <= st.buffer().line_len(0));
            assert!(st.search.matches.iter().any(|m| m.start() == st.cursor));
        }
        handle_step(&mut st, false);
        assert!(st.search.matches.iter().any(|m| m.start() == st.cursor));
    }
}
