//! Cursor types for the editable surface.

/// Logical cursor position: a character offset into the serialized template
/// string, where a variable node counts as the full length of `{{name}}`.
pub type CursorPosition = usize;

/// Live cursor location inside the node tree.
///
/// A caret is either inside a text node or on the boundary in front of a node.
/// It can never point inside a variable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Caret {
    /// Inside (or at either edge of) text node `node`, `offset` characters in
    InText { node: usize, offset: usize },
    /// In front of node `index`; `index == len` is the end of the surface
    Boundary { index: usize },
}

impl Caret {
    /// Caret at the very start of the surface
    pub const fn start() -> Self {
        Caret::Boundary { index: 0 }
    }

    /// Index of the node this caret refers to
    pub const fn node_index(&self) -> usize {
        match *self {
            Caret::InText { node, .. } => node,
            Caret::Boundary { index } => index,
        }
    }

    pub const fn is_in_text(&self) -> bool {
        matches!(self, Caret::InText { .. })
    }
}

impl Default for Caret {
    fn default() -> Self {
        Self::start()
    }
}
