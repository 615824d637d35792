//! Utility modules

pub mod text;

pub use text::{
    char_len, char_to_byte, collapse_line_breaks, is_line_break, is_word_char,
    normalize_line_endings,
};
