//! Chat panel actions: visibility, focus, prompt editing, submission and clipboard copies.

use super::{ChatRequest, DispatchResult};
use crate::Action;
use core_state::{EditorState, Focus};

pub(crate) fn handle_chat_action(action: Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::ToggleChat => toggle(state),
        Action::CopyLastResponse => {
            match state.chat.last_response() {
                Some(text) => {
                    state.clipboard = text.to_string();
                    tracing::info!(target: "actions.dispatch", len = state.clipboard.len(), "copied_last_response");
                    state.set_status(
                        "Last AI response copied to clipboard. Press Ctrl+V in insert mode to paste.",
                    );
                }
                None => state.set_status("No AI response found to copy"),
            }
            DispatchResult::dirty()
        }
        Action::ChatChar(ch) => {
            state.chat_input.push(ch);
            DispatchResult::dirty()
        }
        Action::ChatBackspace => {
            state.chat_input.pop();
            DispatchResult::dirty()
        }
        Action::ChatSubmit => {
            let input = std::mem::take(&mut state.chat_input);
            match state.submit_chat(&input) {
                Some((id, history, prompt)) => DispatchResult::chat(ChatRequest {
                    id,
                    history,
                    prompt,
                }),
                None => DispatchResult::dirty(),
            }
        }
        Action::ChatCycleFocus => {
            state.focus = match state.focus {
                Focus::ChatInput => Focus::ChatHistory,
                _ => Focus::ChatInput,
            };
            DispatchResult::dirty()
        }
        Action::ChatScroll(delta) => {
            state.chat_scroll = state.chat_scroll.saturating_add_signed(delta);
            DispatchResult::dirty()
        }
        Action::CopyTranscript => {
            let text = state.chat.transcript();
            if text.is_empty() {
                state.set_status("No text available to copy.");
            } else {
                state.clipboard = text;
                state.set_status(
                    "Chat text copied. Press Ctrl+V in insert mode to paste. For specific responses, use :copy <number>",
                );
            }
            DispatchResult::dirty()
        }
        Action::FocusEditor => {
            state.focus = Focus::Editor;
            DispatchResult::dirty()
        }
        _ => DispatchResult::clean(),
    }
}

pub(crate) fn toggle(state: &mut EditorState) -> DispatchResult {
    if state.toggle_chat() {
        state.set_status("Chat panel opened. Tab switches to the transcript, Esc returns to the editor.");
    }
    tracing::debug!(target: "actions.dispatch", visible = state.chat_visible, "chat_toggled");
    DispatchResult::dirty()
}

/// `:copy <n>`.
pub(crate) fn copy_response(n: usize, state: &mut EditorState) -> DispatchResult {
    match state.chat.response(n) {
        Some(text) => {
            state.clipboard = text.to_string();
            tracing::info!(target: "actions.command", n, len = state.clipboard.len(), "copied_response");
            state.set_status(format!(
                "AI response #{n} copied. Press Ctrl+V in insert mode to paste."
            ));
        }
        None => {
            tracing::info!(target: "actions.command", n, total = state.chat.completed_count(), "response_not_found");
            state.set_status(format!("AI response #{n} not found"));
        }
    }
    DispatchResult::dirty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::ChatReply;
    use core_text::Buffer;

    #[test]
    fn submit_clears_input_and_returns_request() {
        let mut st = EditorState::new(Buffer::new());
        st.toggle_chat();
        st.chat_input = "  hello ".into();
        let res = handle_chat_action(Action::ChatSubmit, &mut st);
        let req = res.chat_request.expect("request issued");
        assert_eq!(req.prompt, "hello");
        assert!(req.history.is_empty());
        assert!(st.chat_input.is_empty());
        assert_eq!(st.chat.pending_count(), 1);
    }

    #[test]
    fn blank_submit_issues_nothing() {
        let mut st = EditorState::new(Buffer::new());
        st.chat_input = "   ".into();
        let res = handle_chat_action(Action::ChatSubmit, &mut st);
        assert!(res.chat_request.is_none());
        assert!(st.chat.is_empty());
        assert!(st.chat_input.is_empty());
    }

    #[test]
    fn copy_last_ignores_pending_placeholder() {
        let mut st = EditorState::new(Buffer::new());
        handle_chat_action(Action::CopyLastResponse, &mut st);
        assert_eq!(st.status_text(), Some("No AI response found to copy"));
        let (a, _, _) = st.submit_chat("a").unwrap();
        st.apply_chat_reply(&ChatReply {
            request: a,
            outcome: Ok("answer".into()),
        });
        st.submit_chat("b").unwrap();
        handle_chat_action(Action::CopyLastResponse, &mut st);
        assert_eq!(st.clipboard, "answer");
    }

    #[test]
    fn focus_cycles_and_escapes() {
        let mut st = EditorState::new(Buffer::new());
        toggle(&mut st);
        assert_eq!(st.focus, Focus::ChatInput);
        handle_chat_action(Action::ChatCycleFocus, &mut st);
        assert_eq!(st.focus, Focus::ChatHistory);
        handle_chat_action(Action::ChatCycleFocus, &mut st);
        assert_eq!(st.focus, Focus::ChatInput);
        handle_chat_action(Action::FocusEditor, &mut st);
        assert_eq!(st.focus, Focus::Editor);
        assert!(st.chat_visible);
    }

    #[test]
    fn transcript_copy_with_and_without_history() {
        let mut st = EditorState::new(Buffer::new());
        handle_chat_action(Action::CopyTranscript, &mut st);
        assert_eq!(st.status_text(), Some("No text available to copy."));
        st.submit_chat("hi").unwrap();
        handle_chat_action(Action::CopyTranscript, &mut st);
        assert_eq!(st.clipboard, "You: hi\nAI: ...\n");
    }

    #[test]
    fn scroll_saturates_at_bottom() {
        let mut st = EditorState::new(Buffer::new());
        handle_chat_action(Action::ChatScroll(-5), &mut st);
        assert_eq!(st.chat_scroll, 0);
        handle_chat_action(Action::ChatScroll(3), &mut st);
        assert_eq!(st.chat_scroll, 3);
    }
}
