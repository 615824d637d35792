//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host should perform after an update.

/// Outward notification produced by [`crate::editable::TemplateEditor::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// The serialized value changed; deliver it to the owner's `on_change`
    ValueChanged(String),
    /// Only presentational state changed (cursor, selection, suggestion list)
    Redraw,
}

impl Cmd {
    /// The new value, if this command carries one
    pub fn value(&self) -> Option<&str> {
        match self {
            Cmd::ValueChanged(value) => Some(value),
            Cmd::Redraw => None,
        }
    }

    /// Consume the command, returning the new value if any
    pub fn into_value(self) -> Option<String> {
        match self {
            Cmd::ValueChanged(value) => Some(value),
            Cmd::Redraw => None,
        }
    }

    pub fn is_value_change(&self) -> bool {
        matches!(self, Cmd::ValueChanged(_))
    }
}
