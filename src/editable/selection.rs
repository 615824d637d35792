//! Selection type for the editable surface.

use std::ops::Range;

use super::cursor::CursorPosition;

/// A text selection with anchor (start point) and head (cursor position),
/// both serialized offsets. The anchor stays fixed while the head moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: CursorPosition,
    /// Where the cursor is (moving point)
    pub head: CursorPosition,
}

impl Selection {
    pub fn new(anchor: CursorPosition, head: CursorPosition) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor with no selection)
    pub fn collapsed(pos: CursorPosition) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> CursorPosition {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> CursorPosition {
        self.anchor.max(self.head)
    }

    /// Selected range in serialized offsets
    pub fn range(&self) -> Range<CursorPosition> {
        self.start()..self.end()
    }

    /// Check if selection is reversed (head before anchor)
    pub fn is_reversed(&self) -> bool {
        self.head < self.anchor
    }

    /// Extend selection to new head position
    pub fn extend_to(&mut self, pos: CursorPosition) {
        self.head = pos;
    }

    /// Collapse selection to head position
    pub fn collapse(&mut self) {
        self.anchor = self.head;
    }
}
