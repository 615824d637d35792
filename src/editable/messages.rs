//! Message types for the template editor.

use serde::{Deserialize, Serialize};

/// Target for cursor movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// One character left, or over a whole variable
    Left,
    /// One character right, or over a whole variable
    Right,
    /// Start of the surface
    Start,
    /// End of the surface
    End,
}

/// Raw keys delivered by the host.
///
/// Keys are offered to the mention state machine first; whatever it doesn't
/// consume is mapped to a default editing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Unified message type for all editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMsg {
    // === Movement ===
    /// Move cursor without affecting selection
    Move(MoveTarget),
    /// Move cursor and extend selection
    MoveWithSelection(MoveTarget),
    /// Place the cursor at a serialized offset (e.g. from a click)
    SetCursor(usize),
    /// Select everything
    SelectAll,

    // === Insertion ===
    /// Insert a single typed character
    InsertChar(char),
    /// Insert a string
    InsertText(String),
    /// Insert a newline (ignored in single-line mode)
    InsertNewline,
    /// Paste plain text from the clipboard
    Paste(String),
    /// Insert a variable node plus separator at the cursor
    InsertVariable(String),

    // === Deletion ===
    /// Delete before cursor (Backspace)
    DeleteBackward,
    /// Delete after cursor (Delete)
    DeleteForward,

    // === Mention suggestions ===
    /// Select next candidate (wraps)
    MentionNext,
    /// Select previous candidate (wraps)
    MentionPrev,
    /// Point at a candidate
    MentionHover(usize),
    /// Commit the selected candidate
    MentionCommit,
    /// Commit the candidate at an index (pointer click)
    MentionCommitIndex(usize),
    /// Dismiss the suggestion list
    MentionCancel,

    // === Focus ===
    Focus,
    /// Focus left the surface and the suggestion list
    Blur,

    /// A raw key, routed through the mention state machine first
    Key(Key),
}

impl EditMsg {
    /// Check if this message may modify the node tree
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            EditMsg::InsertChar(_)
                | EditMsg::InsertText(_)
                | EditMsg::InsertNewline
                | EditMsg::Paste(_)
                | EditMsg::InsertVariable(_)
                | EditMsg::DeleteBackward
                | EditMsg::DeleteForward
                | EditMsg::MentionCommit
                | EditMsg::MentionCommitIndex(_)
                | EditMsg::Key(_)
        )
    }

    /// Check if this message is a movement operation
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            EditMsg::Move(_) | EditMsg::MoveWithSelection(_) | EditMsg::SetCursor(_)
        )
    }

    /// Check if this message only concerns the suggestion list
    pub fn is_mention(&self) -> bool {
        matches!(
            self,
            EditMsg::MentionNext
                | EditMsg::MentionPrev
                | EditMsg::MentionHover(_)
                | EditMsg::MentionCommit
                | EditMsg::MentionCommitIndex(_)
                | EditMsg::MentionCancel
        )
    }
}

impl From<Key> for EditMsg {
    fn from(key: Key) -> Self {
        EditMsg::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_editing() {
        assert!(EditMsg::InsertChar('a').is_editing());
        assert!(EditMsg::DeleteBackward.is_editing());
        assert!(EditMsg::MentionCommit.is_editing());
        assert!(!EditMsg::Move(MoveTarget::Left).is_editing());
        assert!(!EditMsg::MentionNext.is_editing());
        assert!(!EditMsg::Blur.is_editing());
    }

    #[test]
    fn test_is_movement() {
        assert!(EditMsg::Move(MoveTarget::Left).is_movement());
        assert!(EditMsg::SetCursor(3).is_movement());
        assert!(!EditMsg::InsertChar('a').is_movement());
    }

    #[test]
    fn test_is_mention() {
        assert!(EditMsg::MentionCancel.is_mention());
        assert!(EditMsg::MentionCommitIndex(1).is_mention());
        assert!(!EditMsg::Key(Key::Escape).is_mention());
    }

    #[test]
    fn test_yaml_shape() {
        let msgs: Vec<EditMsg> =
            serde_yaml::from_str("- insert_text: \"Hi @fir\"\n- key: enter\n- focus\n").unwrap();
        assert_eq!(
            msgs,
            vec![
                EditMsg::InsertText("Hi @fir".into()),
                EditMsg::Key(Key::Enter),
                EditMsg::Focus,
            ]
        );
    }
}
