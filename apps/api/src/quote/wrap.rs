//! Greedy line wrapping by character budget.
//!
//! Words are split on single spaces and never broken. A line is flushed when
//! the pending line (including its trailing separator) plus the next word
//! would exceed `max_line_length`. The flush happens even when the pending
//! line is empty, so an oversized first word is preceded by a blank line.
//!
//! Lengths are UTF-16 code units, the unit bubble clients count in: an emoji
//! outside the BMP costs two.

/// Default character budget per bubble line.
pub const DEFAULT_LINE_LENGTH: usize = 45;

pub fn wrap_text(text: &str, max_line_length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + 8);
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split(' ') {
        let word_len = utf16_len(word);

        if line_len + word_len > max_line_length {
            result.push_str(line.trim());
            result.push('\n');
            line.clear();
            line_len = 0;
        }

        line.push_str(word);
        line.push(' ');
        line_len += word_len + 1;
    }

    result.push_str(line.trim());
    result
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}
