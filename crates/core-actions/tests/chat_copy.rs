use core_actions::{KeyTranslator, handle_input};
use core_events::{ChatReply, InputEvent, KeyCode, KeyEvent, RequestId};
use core_state::{EditorState, Focus, Mode};
use core_text::Buffer;
use pretty_assertions::assert_eq;

fn press(t: &mut KeyTranslator, st: &mut EditorState, key: KeyEvent) -> core_actions::DispatchResult {
    handle_input(t, st, &InputEvent::Key(key))
}

fn type_str(t: &mut KeyTranslator, st: &mut EditorState, text: &str) {
    for c in text.chars() {
        press(t, st, KeyEvent::plain(KeyCode::Char(c)));
    }
}

fn ask(t: &mut KeyTranslator, st: &mut EditorState, prompt: &str) -> RequestId {
    type_str(t, st, prompt);
    let res = press(t, st, KeyEvent::plain(KeyCode::Enter));
    res.chat_request.expect("prompt submitted").id
}

fn reply(st: &mut EditorState, id: RequestId, text: &str) {
    assert!(st.apply_chat_reply(&ChatReply {
        request: id,
        outcome: Ok(text.to_string()),
    }));
}

#[test]
fn copy_numbering_skips_pending_placeholders() {
    let mut st = EditorState::new(Buffer::new());
    let mut t = KeyTranslator::new();
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::F(2)));
    assert_eq!(st.focus, Focus::ChatInput);

    let first = ask(&mut t, &mut st, "one");
    let second = ask(&mut t, &mut st, "two");
    let third = ask(&mut t, &mut st, "three");
    // Replies arrive out of order.
    reply(&mut st, third, "C");
    reply(&mut st, first, "A");

    press(&mut t, &mut st, KeyEvent::plain(KeyCode::Esc));
    assert_eq!(st.focus, Focus::Editor);
    type_str(&mut t, &mut st, ":copy 2");
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::Enter));
    assert_eq!(st.clipboard, "C");
    assert_eq!(
        st.status_text(),
        Some("AI response #2 copied. Press Ctrl+V in insert mode to paste.")
    );

    type_str(&mut t, &mut st, ":copy 3");
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::Enter));
    assert_eq!(st.status_text(), Some("AI response #3 not found"));

    reply(&mut st, second, "B");
    type_str(&mut t, &mut st, ":copy 2");
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::Enter));
    assert_eq!(st.clipboard, "B", "numbering follows transcript order");
}

#[test]
fn copied_response_pastes_in_insert_mode() {
    let mut st = EditorState::new(Buffer::new());
    let mut t = KeyTranslator::new();
    press(&mut t, &mut st, KeyEvent::ctrl('a'));
    let id = ask(&mut t, &mut st, "q");
    reply(&mut st, id, "line1\nline2");
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::Esc));
    press(&mut t, &mut st, KeyEvent::ctrl('c'));
    assert_eq!(st.clipboard, "line1\nline2");

    type_str(&mut t, &mut st, "i");
    assert_eq!(st.mode, Mode::Insert);
    press(&mut t, &mut st, KeyEvent::ctrl('v'));
    assert_eq!(st.buffer().lines(), ["line1", "line2"]);
    assert_eq!(st.status_text(), Some("Text pasted from AI response"));
}

#[test]
fn editor_keys_do_not_leak_into_chat_input() {
    let mut st = EditorState::new(Buffer::from_str("text"));
    let mut t = KeyTranslator::new();
    press(&mut t, &mut st, KeyEvent::plain(KeyCode::F(2)));
    type_str(&mut t, &mut st, "ix:");
    assert_eq!(st.chat_input, "ix:");
    assert_eq!(st.mode, Mode::Normal);
    assert_eq!(st.buffer().lines(), ["text"]);

    handle_input(&mut t, &mut st, &InputEvent::Paste("a\r\nb".into()));
    assert_eq!(st.chat_input, "ix:a b");
}
