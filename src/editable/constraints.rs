//! Edit constraints for the template editor.
//!
//! Constraints define the editing mode (single physical line or free
//! multi-line) and the characters the engine treats specially.

use crate::template::{CLOSE, OPEN};
use crate::util::{collapse_line_breaks, is_line_break, is_word_char, normalize_line_endings};

/// Default character that starts a mention query
pub const DEFAULT_TRIGGER: char = '@';

/// Default separator inserted after a committed variable
pub const DEFAULT_SEPARATOR: char = ' ';

/// Constraints that limit what operations are allowed in an editing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditConstraints {
    /// Allow multiple lines (Enter inserts newline vs. is ignored)
    pub allow_multiline: bool,

    /// Allow ranged selections
    pub allow_selection: bool,

    /// Character that opens a mention query
    pub trigger: char,

    /// Plain character inserted after a committed variable
    pub separator: char,
}

impl Default for EditConstraints {
    fn default() -> Self {
        Self::multi_line()
    }
}

impl EditConstraints {
    /// Free multi-line editing (email bodies, long messages)
    pub fn multi_line() -> Self {
        Self {
            allow_multiline: true,
            allow_selection: true,
            trigger: DEFAULT_TRIGGER,
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Single physical line (subject lines, SMS previews)
    pub fn single_line() -> Self {
        Self {
            allow_multiline: false,
            ..Self::multi_line()
        }
    }

    /// Set the mention trigger; characters that can't open a query keep the current one
    pub fn with_trigger(mut self, trigger: char) -> Self {
        if is_valid_trigger(trigger) {
            self.trigger = trigger;
        } else {
            tracing::warn!(?trigger, "invalid mention trigger, keeping {:?}", self.trigger);
        }
        self
    }

    /// Set the separator; token delimiters keep the current one
    pub fn with_separator(mut self, separator: char) -> Self {
        if is_valid_separator(separator) {
            self.separator = separator;
        } else {
            tracing::warn!(?separator, "invalid separator, keeping {:?}", self.separator);
        }
        self
    }

    /// Separator actually inserted after a variable: a line-break separator
    /// becomes the default one in single-line mode
    pub fn effective_separator(&self) -> char {
        if self.is_char_allowed(self.separator) {
            self.separator
        } else {
            DEFAULT_SEPARATOR
        }
    }

    /// Check if a typed character may be inserted
    pub fn is_char_allowed(&self, ch: char) -> bool {
        self.allow_multiline || !is_line_break(ch)
    }

    /// Reduce incoming text (paste, insert) to what this mode accepts.
    ///
    /// Line endings are normalized; single-line mode collapses each run of
    /// line separators to one space.
    pub fn sanitize(&self, text: &str) -> String {
        if self.allow_multiline {
            normalize_line_endings(text)
        } else {
            collapse_line_breaks(text)
        }
    }
}

fn is_token_delimiter(ch: char) -> bool {
    OPEN.contains(ch) || CLOSE.contains(ch)
}

/// A trigger must not be swallowed by the query (word chars), end it
/// (whitespace, line breaks), or take part in a `{{name}}` token.
pub fn is_valid_trigger(ch: char) -> bool {
    !is_word_char(ch) && !ch.is_whitespace() && !is_token_delimiter(ch)
}

/// A separator must not take part in a `{{name}}` token.
pub fn is_valid_separator(ch: char) -> bool {
    !is_token_delimiter(ch)
}
