//! Template string model.
//!
//! A template is plain text interleaved with `{{identifier}}` variable tokens,
//! where an identifier is one or more ASCII word characters. Parsing never
//! fails: anything that isn't a well-formed token (`{{}}`, `{{first name}}`,
//! an unterminated `{{name`) stays literal text.

use serde::{Deserialize, Serialize};

use crate::util::{char_len, collapse_line_breaks, is_word_char};

/// Opening delimiter of a variable token
pub const OPEN: &str = "{{";
/// Closing delimiter of a variable token
pub const CLOSE: &str = "}}";

/// One parsed piece of a template string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Literal text, emitted verbatim
    Text { content: String },
    /// A variable reference, emitted as `{{name}}`
    Variable { name: String },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text {
            content: content.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Segment::Variable { name: name.into() }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Segment::Variable { .. })
    }
}

/// Borrowed view of a template part, shared by parsed segments and live nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRef<'a> {
    Text(&'a str),
    Variable(&'a str),
}

impl PartRef<'_> {
    /// Length in characters of this part's serialized form
    pub fn serialized_len(self) -> usize {
        match self {
            PartRef::Text(content) => char_len(content),
            PartRef::Variable(name) => variable_token_len(name),
        }
    }

    /// Append this part's serialized form to `out`
    pub fn write_to(self, out: &mut String) {
        match self {
            PartRef::Text(content) => out.push_str(content),
            PartRef::Variable(name) => {
                out.push_str(OPEN);
                out.push_str(name);
                out.push_str(CLOSE);
            }
        }
    }
}

/// Anything that serializes as a template part.
pub trait TemplatePart {
    fn as_part(&self) -> PartRef<'_>;
}

impl TemplatePart for Segment {
    fn as_part(&self) -> PartRef<'_> {
        match self {
            Segment::Text { content } => PartRef::Text(content),
            Segment::Variable { name } => PartRef::Variable(name),
        }
    }
}

/// `{{name}}`
pub fn variable_token(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + OPEN.len() + CLOSE.len());
    PartRef::Variable(name).write_to(&mut out);
    out
}

/// Character length of `{{name}}`
#[inline]
pub fn variable_token_len(name: &str) -> usize {
    char_len(name) + OPEN.len() + CLOSE.len()
}

/// Whether `name` can stand inside a `{{name}}` token and parse back as one
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_word_char)
}

/// Try to match a `{{identifier}}` token starting at byte `start`.
/// Returns the identifier's byte range and the byte offset just past the token.
fn match_token(value: &str, start: usize) -> Option<(std::ops::Range<usize>, usize)> {
    let bytes = value.as_bytes();
    if !value[start..].starts_with(OPEN) {
        return None;
    }

    let name_start = start + OPEN.len();
    let mut name_end = name_start;
    while name_end < bytes.len() && is_word_char(bytes[name_end] as char) {
        name_end += 1;
    }
    if name_end == name_start {
        return None;
    }

    if value[name_end..].starts_with(CLOSE) {
        Some((name_start..name_end, name_end + CLOSE.len()))
    } else {
        None
    }
}

/// Split a template string into text and variable segments.
///
/// Empty text runs are omitted, so adjacent tokens produce adjacent
/// `Variable` segments.
pub fn parse(value: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    // Only ASCII '{' can start a token, so `i` is always a char boundary
    // whenever a match succeeds.
    while i < value.len() {
        if value.as_bytes()[i] == b'{' {
            if let Some((name, end)) = match_token(value, i) {
                if text_start < i {
                    segments.push(Segment::text(&value[text_start..i]));
                }
                segments.push(Segment::variable(&value[name]));
                i = end;
                text_start = end;
                continue;
            }
        }
        i += 1;
    }

    if text_start < value.len() {
        segments.push(Segment::text(&value[text_start..]));
    }

    segments
}

/// Join template parts back into a template string.
pub fn serialize<T: TemplatePart>(parts: &[T]) -> String {
    let mut out = String::new();
    for part in parts {
        part.as_part().write_to(&mut out);
    }
    out
}

/// Like [`serialize`], but every run of line separators becomes one space.
pub fn serialize_single_line<T: TemplatePart>(parts: &[T]) -> String {
    collapse_line_breaks(&serialize(parts))
}

/// Names of all variables referenced by a template, in order of appearance
pub fn variable_names(value: &str) -> Vec<String> {
    parse(value)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Variable { name } => Some(name),
            Segment::Text { .. } => None,
        })
        .collect()
}
