//! Live node sequence backing the editable surface.
//!
//! The surface is a flat list of inline nodes: freely editable text runs and
//! atomic variable nodes. All positions are offsets in the *serialized* string
//! space, where a variable node is as long as its `{{name}}` token. Every
//! mutation honours atomicity: a variable node is inserted whole, removed
//! whole, or left alone.

use std::ops::Range;

use crate::template::{self, PartRef, Segment, TemplatePart};
use crate::util::{char_len, char_to_byte};

use super::cursor::Caret;

/// One inline node of the editable surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditableNode {
    /// Editable text run
    Text(String),
    /// Atomic variable placeholder
    Variable(String),
}

impl EditableNode {
    /// Whether this node can only be inserted or removed as a whole
    pub fn is_atomic(&self) -> bool {
        matches!(self, EditableNode::Variable(_))
    }

    /// Serialized length in characters
    pub fn serialized_len(&self) -> usize {
        self.as_part().serialized_len()
    }

    pub fn variable_name(&self) -> Option<&str> {
        match self {
            EditableNode::Variable(name) => Some(name),
            EditableNode::Text(_) => None,
        }
    }
}

impl TemplatePart for EditableNode {
    fn as_part(&self) -> PartRef<'_> {
        match self {
            EditableNode::Text(content) => PartRef::Text(content),
            EditableNode::Variable(name) => PartRef::Variable(name),
        }
    }
}

impl From<Segment> for EditableNode {
    /// A variable segment whose name can't form a token becomes its literal text
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Text { content } => EditableNode::Text(content),
            Segment::Variable { name } if template::is_valid_name(&name) => {
                EditableNode::Variable(name)
            }
            Segment::Variable { name } => EditableNode::Text(template::variable_token(&name)),
        }
    }
}

impl From<&EditableNode> for Segment {
    fn from(node: &EditableNode) -> Self {
        match node {
            EditableNode::Text(content) => Segment::text(content.clone()),
            EditableNode::Variable(name) => Segment::variable(name.clone()),
        }
    }
}

/// Ordered sequence of editable nodes.
///
/// Kept normalized after every mutation: no empty text nodes and no two
/// adjacent text nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<EditableNode>,
}

impl NodeList {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build a node list from parsed segments
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut list = Self {
            nodes: segments.into_iter().map(EditableNode::from).collect(),
        };
        list.normalize();
        list
    }

    /// Parse a template string into a node list
    pub fn from_value(value: &str) -> Self {
        Self::from_segments(template::parse(value))
    }

    pub fn nodes(&self) -> &[EditableNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&EditableNode> {
        self.nodes.get(index)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Segments equivalent to the current nodes
    pub fn segments(&self) -> Vec<Segment> {
        self.nodes.iter().map(Segment::from).collect()
    }

    /// Serialize to a template string
    pub fn serialize(&self) -> String {
        template::serialize(&self.nodes)
    }

    /// Serialize with line separators collapsed to spaces
    pub fn serialize_single_line(&self) -> String {
        template::serialize_single_line(&self.nodes)
    }

    /// Total serialized length in characters
    pub fn serialized_len(&self) -> usize {
        self.nodes.iter().map(EditableNode::serialized_len).sum()
    }

    /// Serialized offset at which node `index` starts
    pub fn node_start(&self, index: usize) -> usize {
        self.nodes
            .iter()
            .take(index)
            .map(EditableNode::serialized_len)
            .sum()
    }

    /// Serialized range covered by node `index`
    pub fn node_range(&self, index: usize) -> Option<Range<usize>> {
        let node = self.nodes.get(index)?;
        let start = self.node_start(index);
        Some(start..start + node.serialized_len())
    }

    /// Iterate nodes with their serialized ranges
    pub fn iter_ranges(
        &self,
    ) -> impl Iterator<Item = (usize, Range<usize>, &EditableNode)> + '_ {
        let mut start = 0;
        self.nodes.iter().enumerate().map(move |(i, node)| {
            let len = node.serialized_len();
            let range = start..start + len;
            start += len;
            (i, range, node)
        })
    }

    // =========================================================================
    // Offset <-> caret resolution
    // =========================================================================

    /// Move an offset out of any variable token it falls inside.
    ///
    /// Offsets strictly inside `{{name}}` resolve to the nearer token edge;
    /// a tie resolves after the token. Offsets past the end clamp to the end.
    pub fn snap(&self, offset: usize) -> usize {
        let offset = offset.min(self.serialized_len());
        for (_, range, node) in self.iter_ranges() {
            if range.start >= offset {
                break;
            }
            if node.is_atomic() && offset < range.end {
                return if offset - range.start < range.end - offset {
                    range.start
                } else {
                    range.end
                };
            }
        }
        offset
    }

    /// Resolve a serialized offset to a live caret.
    ///
    /// Prefers a position inside a text node; between two variable nodes (or
    /// on an empty list) the caret sits on the node boundary.
    pub fn caret_at(&self, offset: usize) -> Caret {
        let offset = self.snap(offset);
        let mut boundary = self.nodes.len();
        for (i, range, node) in self.iter_ranges() {
            if let EditableNode::Text(_) = node {
                if range.start <= offset && offset <= range.end {
                    return Caret::InText {
                        node: i,
                        offset: offset - range.start,
                    };
                }
            }
            if range.start >= offset {
                boundary = i;
                break;
            }
        }
        Caret::Boundary { index: boundary }
    }

    /// Serialized offset of a caret: sum the lengths of every node before it,
    /// plus the in-node offset when it sits inside a text node.
    pub fn caret_offset(&self, caret: Caret) -> usize {
        let mut offset = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            match caret {
                Caret::InText { node: target, offset: inner } if target == i => {
                    return match node {
                        EditableNode::Text(content) => offset + inner.min(char_len(content)),
                        // Stale caret on a variable: resolve to the boundary before it
                        EditableNode::Variable(_) => offset,
                    };
                }
                Caret::Boundary { index } if index == i => return offset,
                _ => {}
            }
            offset += node.serialized_len();
        }
        offset
    }

    /// Serialized text of everything before `offset`.
    ///
    /// Variable nodes are rendered as `{{name}}`. Never mutates the list.
    pub fn prefix(&self, offset: usize) -> String {
        let mut out = String::new();
        for (_, range, node) in self.iter_ranges() {
            if range.start >= offset {
                break;
            }
            match node {
                EditableNode::Text(content) if range.end > offset => {
                    let byte = char_to_byte(content, offset - range.start);
                    out.push_str(&content[..byte]);
                }
                EditableNode::Variable(_) if range.end > offset => {}
                _ => node.as_part().write_to(&mut out),
            }
        }
        out
    }

    // =========================================================================
    // Neighbour queries used by deletion and movement
    // =========================================================================

    /// Index and start offset of the variable node that ends exactly at `offset`
    pub fn variable_ending_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.iter_ranges()
            .find(|(_, range, node)| node.is_atomic() && range.end == offset && offset > 0)
            .map(|(i, range, _)| (i, range.start))
    }

    /// Index and end offset of the variable node that starts exactly at `offset`
    pub fn variable_starting_at(&self, offset: usize) -> Option<(usize, usize)> {
        self.iter_ranges()
            .find(|(_, range, node)| node.is_atomic() && range.start == offset)
            .map(|(i, range, _)| (i, range.end))
    }

    /// The text character occupying `[offset, offset + 1)`, if it belongs to a text node
    pub fn text_char_at(&self, offset: usize) -> Option<char> {
        self.iter_ranges().find_map(|(_, range, node)| match node {
            EditableNode::Text(content) if range.contains(&offset) => {
                content.chars().nth(offset - range.start)
            }
            _ => None,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Split the list at `offset`, returning the node index where an insertion
    /// at that offset belongs.
    fn split_at(&mut self, offset: usize) -> usize {
        let offset = self.snap(offset);
        let mut start = 0;
        for i in 0..self.nodes.len() {
            if offset == start {
                return i;
            }
            let len = self.nodes[i].serialized_len();
            if offset < start + len {
                if let EditableNode::Text(content) = &mut self.nodes[i] {
                    let byte = char_to_byte(content, offset - start);
                    let tail = content.split_off(byte);
                    self.nodes.insert(i + 1, EditableNode::Text(tail));
                }
                return i + 1;
            }
            start += len;
        }
        self.nodes.len()
    }

    /// Merge adjacent text nodes and drop empty ones
    fn normalize(&mut self) {
        let mut merged: Vec<EditableNode> = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            match node {
                EditableNode::Text(content) if content.is_empty() => {}
                EditableNode::Text(content) => {
                    if let Some(EditableNode::Text(prev)) = merged.last_mut() {
                        prev.push_str(&content);
                    } else {
                        merged.push(EditableNode::Text(content));
                    }
                }
                variable => merged.push(variable),
            }
        }
        self.nodes = merged;
    }

    /// Insert plain text at `offset`. Returns the offset the text was actually
    /// inserted at (offsets inside a variable token are snapped to its edge).
    pub fn insert_text(&mut self, offset: usize, text: &str) -> usize {
        let at = self.snap(offset);
        if text.is_empty() {
            return at;
        }
        let index = self.split_at(at);
        self.nodes.insert(index, EditableNode::Text(text.to_string()));
        self.normalize();
        at
    }

    /// Insert an atomic variable node at `offset`. Returns the node's start
    /// offset, or `None` if `name` can't form a `{{name}}` token.
    pub fn insert_variable(&mut self, offset: usize, name: &str) -> Option<usize> {
        if !template::is_valid_name(name) {
            return None;
        }
        let at = self.snap(offset);
        let index = self.split_at(at);
        self.nodes.insert(index, EditableNode::Variable(name.to_string()));
        self.normalize();
        Some(at)
    }

    /// Delete the serialized range `[start, end)`.
    ///
    /// A variable node partially covered by the range is removed whole, so the
    /// range actually deleted may be wider than requested; it is returned.
    /// Empty or out-of-bounds ranges are a no-op returning `None`.
    pub fn delete_range(&mut self, range: Range<usize>) -> Option<Range<usize>> {
        let total = self.serialized_len();
        let mut start = range.start.min(total);
        let mut end = range.end.min(total);
        if start >= end {
            return None;
        }

        for (_, node_range, node) in self.iter_ranges() {
            if node.is_atomic() && node_range.start < end && node_range.end > start {
                start = start.min(node_range.start);
                end = end.max(node_range.end);
            }
        }

        let mut offset = 0;
        let mut kept = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            let len = node.serialized_len();
            let node_range = offset..offset + len;
            offset += len;

            if node_range.end <= start || node_range.start >= end {
                kept.push(node);
                continue;
            }
            if let EditableNode::Text(content) = node {
                let cut_from = start.saturating_sub(node_range.start);
                let cut_to = (end - node_range.start).min(len);
                let head = &content[..char_to_byte(&content, cut_from)];
                let tail = &content[char_to_byte(&content, cut_to)..];
                kept.push(EditableNode::Text(format!("{head}{tail}")));
            }
        }
        self.nodes = kept;
        self.normalize();
        Some(start..end)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(value: &str) -> NodeList {
        NodeList::from_value(value)
    }

    #[test]
    fn test_from_value_builds_nodes() {
        let nodes = list("Hi {{first_name}}!");
        assert_eq!(
            nodes.nodes(),
            &[
                EditableNode::Text("Hi ".into()),
                EditableNode::Variable("first_name".into()),
                EditableNode::Text("!".into()),
            ]
        );
        assert_eq!(nodes.serialized_len(), 18);
        assert_eq!(nodes.serialize(), "Hi {{first_name}}!");
    }

    #[test]
    fn test_snap_inside_variable() {
        // "ab{{x}}cd": variable spans 2..7
        let nodes = list("ab{{x}}cd");
        assert_eq!(nodes.snap(3), 2);
        assert_eq!(nodes.snap(4), 2);
        assert_eq!(nodes.snap(5), 7);
        assert_eq!(nodes.snap(6), 7);
        assert_eq!(nodes.snap(2), 2);
        assert_eq!(nodes.snap(7), 7);
        assert_eq!(nodes.snap(100), 9);
    }

    #[test]
    fn test_caret_prefers_text_nodes() {
        let nodes = list("ab{{x}}cd");
        assert_eq!(nodes.caret_at(2), Caret::InText { node: 0, offset: 2 });
        assert_eq!(nodes.caret_at(7), Caret::InText { node: 2, offset: 0 });
        assert_eq!(nodes.caret_at(9), Caret::InText { node: 2, offset: 2 });
    }

    #[test]
    fn test_caret_between_variables_is_boundary() {
        let nodes = list("{{a}}{{b}}");
        assert_eq!(nodes.caret_at(0), Caret::Boundary { index: 0 });
        assert_eq!(nodes.caret_at(5), Caret::Boundary { index: 1 });
        assert_eq!(nodes.caret_at(10), Caret::Boundary { index: 2 });
        assert_eq!(NodeList::new().caret_at(0), Caret::Boundary { index: 0 });
    }

    #[test]
    fn test_caret_offset_round_trips() {
        let nodes = list("Hi {{first_name}} there {{a}}{{b}}");
        for offset in 0..=nodes.serialized_len() {
            let snapped = nodes.snap(offset);
            assert_eq!(nodes.caret_offset(nodes.caret_at(offset)), snapped);
        }
    }

    #[test]
    fn test_prefix() {
        let nodes = list("Hi {{first_name}} @fo");
        assert_eq!(nodes.prefix(0), "");
        assert_eq!(nodes.prefix(3), "Hi ");
        assert_eq!(nodes.prefix(17), "Hi {{first_name}}");
        assert_eq!(nodes.prefix(21), "Hi {{first_name}} @fo");
    }

    #[test]
    fn test_insert_text_merges() {
        let mut nodes = list("ab{{x}}cd");
        assert_eq!(nodes.insert_text(1, "Z"), 1);
        assert_eq!(nodes.serialize(), "aZb{{x}}cd");
        assert_eq!(nodes.len(), 3);

        nodes.insert_text(8, "!");
        assert_eq!(nodes.serialize(), "aZb{{x}}!cd");
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_insert_text_inside_variable_snaps() {
        let mut nodes = list("{{abc}}");
        // offset 5 is closer to the end (7) than the start (0)
        assert_eq!(nodes.insert_text(5, "!"), 7);
        assert_eq!(nodes.serialize(), "{{abc}}!");
    }

    #[test]
    fn test_insert_variable_splits_text() {
        let mut nodes = list("Hello world");
        assert_eq!(nodes.insert_variable(6, "name"), Some(6));
        assert_eq!(nodes.serialize(), "Hello {{name}}world");
        assert_eq!(nodes.len(), 3);
        assert!(nodes.get(1).unwrap().is_atomic());
    }

    #[test]
    fn test_insert_variable_rejects_non_word_name() {
        let mut nodes = list("Hello");
        assert_eq!(nodes.insert_variable(5, "first-name"), None);
        assert_eq!(nodes.insert_variable(5, ""), None);
        assert_eq!(nodes.nodes(), &[EditableNode::Text("Hello".into())]);
    }

    #[test]
    fn test_from_segments_keeps_invalid_variable_as_text() {
        let nodes = NodeList::from_segments(vec![
            Segment::text("Hi "),
            Segment::variable("first-name"),
            Segment::variable("email"),
        ]);
        assert_eq!(
            nodes.nodes(),
            &[
                EditableNode::Text("Hi {{first-name}}".into()),
                EditableNode::Variable("email".into()),
            ]
        );
        assert_eq!(
            NodeList::from_value(&nodes.serialize()).nodes(),
            nodes.nodes()
        );
    }

    #[test]
    fn test_delete_range_in_text() {
        let mut nodes = list("hello {{x}}");
        assert_eq!(nodes.delete_range(0..2), Some(0..2));
        assert_eq!(nodes.serialize(), "llo {{x}}");
    }

    #[test]
    fn test_delete_range_widens_to_whole_variable() {
        let mut nodes = list("ab{{name}}cd");
        // Touches only the middle of the token
        assert_eq!(nodes.delete_range(4..6), Some(2..10));
        assert_eq!(nodes.serialize(), "abcd");
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_delete_range_noop() {
        let mut nodes = list("abc");
        assert_eq!(nodes.delete_range(2..2), None);
        assert_eq!(nodes.delete_range(5..9), None);
        assert_eq!(nodes.serialize(), "abc");
    }

    #[test]
    fn test_delete_range_utf8() {
        let mut nodes = list("héllo");
        nodes.delete_range(1..2);
        assert_eq!(nodes.serialize(), "hllo");
    }

    #[test]
    fn test_variable_neighbours() {
        let nodes = list("a{{x}} b");
        assert_eq!(nodes.variable_ending_at(6), Some((1, 1)));
        assert_eq!(nodes.variable_starting_at(1), Some((1, 6)));
        assert_eq!(nodes.variable_ending_at(7), None);
        assert_eq!(nodes.text_char_at(6), Some(' '));
        assert_eq!(nodes.text_char_at(2), None);
    }
}
