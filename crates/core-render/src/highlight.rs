//! Keyword highlighter.
//!
//! A pure function from one line of text to keyword spans. Words are maximal runs of letters and
//! digits; a word is highlighted only when it matches a keyword exactly, so `format` does not
//! light up the `for` inside it.

pub const KEYWORDS: &[&str] = &[
    "func", "var", "const", "type", "struct", "interface", "package", "import", "return", "go",
    "defer", "for", "range", "if", "else", "switch", "case", "default", "map", "chan",
];

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Keyword spans of `line` as `(start, end)` character columns, end exclusive.
pub fn keyword_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut word = String::new();
    let mut start = 0;
    for (i, ch) in line.chars().chain(std::iter::once(' ')).enumerate() {
        if is_word_char(ch) {
            if word.is_empty() {
                start = i;
            }
            word.push(ch);
        } else if !word.is_empty() {
            if KEYWORDS.contains(&word.as_str()) {
                spans.push((start, i));
            }
            word.clear();
        }
    }
    spans
}
