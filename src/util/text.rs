//! Utility functions for template text

/// Check if a character may appear in a variable identifier.
///
/// Mirrors the ASCII word class: letters, digits and underscore.
#[inline]
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Check if a character is a line separator
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Replace every run of line separators with a single space.
///
/// `"a\r\nb"` and `"a\n\nb"` both become `"a b"`.
pub fn collapse_line_breaks(text: &str) -> String {
    if !text.chars().any(is_line_break) {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if is_line_break(ch) {
            if !in_break {
                result.push(' ');
            }
            in_break = true;
        } else {
            result.push(ch);
            in_break = false;
        }
    }
    result
}

/// Normalize Windows and classic Mac line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Length of a string in characters
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset to a byte offset, clamping to the end of the string
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
