//! TemplateEditor - the editable surface with cursor, selection and mentions.

use std::sync::Arc;

use crate::catalog::VariableCatalog;
use crate::commands::Cmd;
use crate::mention::{MentionAction, MentionMachine, MentionView};
use crate::template::{is_valid_name, variable_token_len};
use crate::util::{char_len, collapse_line_breaks};

use super::constraints::EditConstraints;
use super::cursor::{Caret, CursorPosition};
use super::messages::{EditMsg, Key, MoveTarget};
use super::node::NodeList;
use super::selection::Selection;

/// Editable surface for a template string.
///
/// Owns its node tree exclusively. The external owner supplies values through
/// [`set_value`](Self::set_value) and receives user changes as
/// [`Cmd::ValueChanged`] from [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    /// Live node tree
    nodes: NodeList,
    /// Live cursor inside the tree
    caret: Caret,
    /// Selection in serialized offsets; `head` tracks the caret
    selection: Selection,
    /// Mode and special characters
    pub constraints: EditConstraints,
    /// Mention autocomplete state
    mention: MentionMachine,
    /// Whether the surface has focus
    focused: bool,
    /// Last value emitted to, or received from, the owner
    last_value: String,
}

impl TemplateEditor {
    /// Create an empty editor
    pub fn new(constraints: EditConstraints, catalog: Arc<VariableCatalog>) -> Self {
        let mention = MentionMachine::new(constraints.trigger, catalog);
        Self {
            nodes: NodeList::new(),
            caret: Caret::start(),
            selection: Selection::collapsed(0),
            constraints,
            mention,
            focused: false,
            last_value: String::new(),
        }
    }

    /// Create an editor showing `value`
    pub fn with_value(
        value: &str,
        constraints: EditConstraints,
        catalog: Arc<VariableCatalog>,
    ) -> Self {
        let mut editor = Self::new(constraints, catalog);
        editor.set_value(value);
        editor
    }

    /// Current serialized value (line separators collapsed in single-line mode)
    pub fn value(&self) -> String {
        if self.constraints.allow_multiline {
            self.nodes.serialize()
        } else {
            self.nodes.serialize_single_line()
        }
    }

    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn mention(&self) -> &MentionMachine {
        &self.mention
    }

    /// Suggestion list to render, if a mention is being composed
    pub fn mention_view(&self) -> Option<MentionView<'_>> {
        self.mention.view()
    }

    pub fn catalog(&self) -> &VariableCatalog {
        self.mention.catalog()
    }

    // =========================================================================
    // External value synchronization
    // =========================================================================

    /// Accept a value from the owner.
    ///
    /// The tree is rebuilt only when `value`, as this mode would display it,
    /// differs from the current serialization, i.e. the change did not
    /// originate here. Never emits a change notification. Returns true if the
    /// tree was rebuilt.
    pub fn set_value(&mut self, value: &str) -> bool {
        self.last_value = value.to_string();
        let displayed = if self.constraints.allow_multiline {
            value.to_string()
        } else {
            collapse_line_breaks(value)
        };
        if self.value() == displayed {
            return false;
        }
        self.rebuild(&displayed);
        true
    }

    /// Replace the whole tree from `value`, keeping the cursor at the end
    fn rebuild(&mut self, value: &str) {
        tracing::debug!(len = value.len(), focused = self.focused, "rebuilding surface");
        self.nodes = NodeList::from_value(value);
        self.mention.cancel();
        self.set_cursor_at_end();
    }

    /// Compare the serialization with the last emitted value and report a change.
    /// Also re-runs mention trigger detection.
    fn on_user_edit(&mut self) -> Option<Cmd> {
        self.detect_mention();
        let value = self.value();
        if value == self.last_value {
            return Some(Cmd::Redraw);
        }
        tracing::trace!(%value, "value changed");
        self.last_value = value.clone();
        Some(Cmd::ValueChanged(value))
    }

    fn detect_mention(&mut self) -> bool {
        let text_before = self.text_before_cursor();
        let cursor = self.cursor_position();
        self.mention.detect(&text_before, cursor)
    }

    // =========================================================================
    // Cursor / selection tracking
    // =========================================================================

    /// Serialized offset of the live cursor
    pub fn cursor_position(&self) -> CursorPosition {
        self.nodes.caret_offset(self.caret)
    }

    /// Place the cursor at a serialized offset.
    ///
    /// Offsets inside a variable token resolve to the nearest token edge.
    pub fn set_cursor_position(&mut self, offset: CursorPosition) {
        self.caret = self.nodes.caret_at(offset);
        self.selection = Selection::collapsed(self.cursor_position());
    }

    pub fn set_cursor_at_end(&mut self) {
        self.set_cursor_position(self.nodes.serialized_len());
    }

    /// Place the cursor right after node `index` (end of surface if out of range)
    pub fn set_cursor_after_node(&mut self, index: usize) {
        let offset = self
            .nodes
            .node_range(index)
            .map(|range| range.end)
            .unwrap_or_else(|| self.nodes.serialized_len());
        self.set_cursor_position(offset);
    }

    /// Serialized text before the cursor, variables as `{{name}}`
    pub fn text_before_cursor(&self) -> String {
        self.nodes.prefix(self.cursor_position())
    }

    pub fn is_cursor_at_start(&self) -> bool {
        self.cursor_position() == 0
    }

    pub fn is_cursor_at_end(&self) -> bool {
        self.cursor_position() == self.nodes.serialized_len()
    }

    /// Move the head to `offset`, extending or collapsing the selection
    fn move_head(&mut self, offset: CursorPosition, extend_selection: bool) {
        self.caret = self.nodes.caret_at(offset);
        let head = self.cursor_position();
        if extend_selection && self.constraints.allow_selection {
            self.selection.extend_to(head);
        } else {
            self.selection = Selection::collapsed(head);
        }
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Move left by one character, or over a whole variable node
    pub fn move_left(&mut self, extend_selection: bool) {
        if !extend_selection && self.has_selection() {
            let start = self.selection.start();
            self.move_head(start, false);
            return;
        }
        let pos = self.cursor_position();
        if pos == 0 {
            return;
        }
        let target = match self.nodes.variable_ending_at(pos) {
            Some((_, start)) => start,
            None => pos - 1,
        };
        self.move_head(target, extend_selection);
    }

    /// Move right by one character, or over a whole variable node
    pub fn move_right(&mut self, extend_selection: bool) {
        if !extend_selection && self.has_selection() {
            let end = self.selection.end();
            self.move_head(end, false);
            return;
        }
        let pos = self.cursor_position();
        if pos >= self.nodes.serialized_len() {
            return;
        }
        let target = match self.nodes.variable_starting_at(pos) {
            Some((_, end)) => end,
            None => pos + 1,
        };
        self.move_head(target, extend_selection);
    }

    pub fn move_to_start(&mut self, extend_selection: bool) {
        self.move_head(0, extend_selection);
    }

    pub fn move_to_end(&mut self, extend_selection: bool) {
        self.move_head(self.nodes.serialized_len(), extend_selection);
    }

    pub fn select_all(&mut self) {
        if !self.constraints.allow_selection {
            return;
        }
        self.move_head(0, false);
        self.move_head(self.nodes.serialized_len(), true);
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Delete the selected range (widened over any partially covered variable)
    fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        match self.nodes.delete_range(self.selection.range()) {
            Some(deleted) => {
                self.set_cursor_position(deleted.start);
                true
            }
            None => {
                self.selection.collapse();
                false
            }
        }
    }

    /// Insert a typed character. Returns false if the mode rejects it.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if !self.constraints.is_char_allowed(ch) {
            return false;
        }
        let mut buf = [0u8; 4];
        self.insert_raw(ch.encode_utf8(&mut buf))
    }

    /// Insert text at the cursor, replacing any selection
    pub fn insert_text(&mut self, text: &str) -> bool {
        let text = self.constraints.sanitize(text);
        self.insert_raw(&text)
    }

    /// Paste plain text. Line separators collapse to spaces in single-line mode.
    pub fn paste(&mut self, text: &str) -> bool {
        tracing::debug!(len = text.len(), "paste");
        self.insert_text(text)
    }

    /// Insert a line break; rejected in single-line mode
    pub fn insert_newline(&mut self) -> bool {
        self.insert_char('\n')
    }

    fn insert_raw(&mut self, text: &str) -> bool {
        let replaced = self.delete_selection();
        if text.is_empty() {
            return replaced;
        }
        let at = self.nodes.insert_text(self.cursor_position(), text);
        self.set_cursor_position(at + char_len(text));
        true
    }

    /// Insert a variable node at the cursor followed by one separator, and
    /// move the cursor past the separator.
    ///
    /// While a mention is being composed, the trigger and query are replaced.
    /// Names that can't form a `{{name}}` token are rejected.
    pub fn insert_variable(&mut self, name: &str) -> bool {
        if !is_valid_name(name) {
            tracing::warn!(%name, "rejecting invalid variable name");
            return false;
        }
        match self.mention.state().map(|state| state.anchor_offset) {
            Some(anchor_offset) => {
                self.mention.cancel();
                self.replace_with_variable(anchor_offset, name)
            }
            None => {
                self.delete_selection();
                let at = self.cursor_position();
                self.place_variable(at, name)
            }
        }
    }

    /// Replace `[anchor_offset, cursor)` with a variable node.
    /// Leaves the text alone if `name` is not a valid identifier.
    fn replace_with_variable(&mut self, anchor_offset: usize, name: &str) -> bool {
        if !is_valid_name(name) {
            tracing::warn!(%name, "rejecting invalid variable name");
            return false;
        }
        let cursor = self.cursor_position();
        let start = anchor_offset.min(cursor);
        self.nodes.delete_range(start..cursor);
        self.place_variable(start, name)
    }

    /// Insert `{{name}}` plus one separator at `offset`, cursor after the separator
    fn place_variable(&mut self, offset: usize, name: &str) -> bool {
        let Some(start) = self.nodes.insert_variable(offset, name) else {
            tracing::warn!(%name, "rejecting invalid variable name");
            return false;
        };
        let after = start + variable_token_len(name);
        let mut buf = [0u8; 4];
        let separator = self.constraints.effective_separator().encode_utf8(&mut buf);
        self.nodes.insert_text(after, separator);
        self.set_cursor_position(after + 1);
        self.focused = true;
        true
    }

    /// Backspace.
    ///
    /// With a collapsed cursor right after `{{name}}<separator>`, the separator
    /// and the variable go together; right after `{{name}}`, the variable goes
    /// alone. Otherwise one character is removed.
    pub fn delete_backward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let pos = self.cursor_position();
        if pos == 0 {
            return false;
        }

        let separator = self.constraints.effective_separator();
        let start = if let Some((_, start)) = self
            .nodes
            .variable_ending_at(pos - 1)
            .filter(|_| self.nodes.text_char_at(pos - 1) == Some(separator))
        {
            tracing::debug!(start, end = pos, "deleting variable and separator");
            start
        } else if let Some((_, start)) = self.nodes.variable_ending_at(pos) {
            tracing::debug!(start, end = pos, "deleting variable");
            start
        } else {
            pos - 1
        };

        match self.nodes.delete_range(start..pos) {
            Some(deleted) => {
                self.set_cursor_position(deleted.start);
                true
            }
            None => false,
        }
    }

    /// Delete key.
    ///
    /// With a collapsed cursor right before `{{name}}`, the variable and one
    /// following separator (if present) go together. Otherwise one character
    /// is removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let pos = self.cursor_position();
        if pos >= self.nodes.serialized_len() {
            return false;
        }

        let end = match self.nodes.variable_starting_at(pos) {
            Some((_, end)) => {
                tracing::debug!(start = pos, end, "deleting variable forward");
                if self.nodes.text_char_at(end) == Some(self.constraints.effective_separator()) {
                    end + 1
                } else {
                    end
                }
            }
            None => pos + 1,
        };

        match self.nodes.delete_range(pos..end) {
            Some(deleted) => {
                self.set_cursor_position(deleted.start);
                true
            }
            None => false,
        }
    }

    /// Remove everything
    pub fn clear(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.nodes.clear();
        self.set_cursor_position(0);
        true
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focus(&mut self) -> bool {
        let changed = !self.focused;
        self.focused = true;
        changed
    }

    /// Focus left the surface and the suggestion list: stop composing
    pub fn blur(&mut self) -> bool {
        let was_focused = std::mem::replace(&mut self.focused, false);
        self.mention.cancel() || was_focused
    }

    // =========================================================================
    // Message dispatch
    // =========================================================================

    /// Apply a message. Produces at most one value-change notification.
    pub fn update(&mut self, msg: EditMsg) -> Option<Cmd> {
        #[cfg(debug_assertions)]
        {
            self.update_traced(msg)
        }
        #[cfg(not(debug_assertions))]
        {
            self.update_inner(msg)
        }
    }

    #[cfg(debug_assertions)]
    fn update_traced(&mut self, msg: EditMsg) -> Option<Cmd> {
        use crate::tracing::SurfaceSnapshot;

        let _span = tracing::debug_span!("update", msg = ?msg).entered();
        let before = SurfaceSnapshot::from_editor(self);

        let result = self.update_inner(msg);

        let after = SurfaceSnapshot::from_editor(self);
        if let Some(diff) = before.diff(&after) {
            tracing::trace!(target: "surface", %diff, "state changed");
        }
        self.assert_invariants();
        result
    }

    fn update_inner(&mut self, msg: EditMsg) -> Option<Cmd> {
        match msg {
            // === Movement ===
            EditMsg::Move(target) => self.apply_move(target, false),
            EditMsg::MoveWithSelection(target) => self.apply_move(target, true),
            EditMsg::SetCursor(offset) => {
                self.set_cursor_position(offset);
                self.after_move()
            }
            EditMsg::SelectAll => {
                self.select_all();
                self.after_move()
            }

            // === Insertion ===
            EditMsg::InsertChar(ch) => self.edit(|ed| ed.insert_char(ch)),
            EditMsg::InsertText(text) => self.edit(|ed| ed.insert_text(&text)),
            EditMsg::InsertNewline => self.edit(Self::insert_newline),
            EditMsg::Paste(text) => self.edit(|ed| ed.paste(&text)),
            EditMsg::InsertVariable(name) => self.edit(|ed| ed.insert_variable(&name)),

            // === Deletion ===
            EditMsg::DeleteBackward => self.edit(Self::delete_backward),
            EditMsg::DeleteForward => self.edit(Self::delete_forward),

            // === Mention suggestions ===
            EditMsg::MentionNext => redraw_if(self.mention.select_next()),
            EditMsg::MentionPrev => redraw_if(self.mention.select_prev()),
            EditMsg::MentionHover(index) => redraw_if(self.mention.select(index)),
            EditMsg::MentionCommit => {
                let action = self.mention.commit();
                self.apply_mention_action(action)
            }
            EditMsg::MentionCommitIndex(index) => {
                let action = self.mention.commit_index(index);
                self.apply_mention_action(action)
            }
            EditMsg::MentionCancel => redraw_if(self.mention.cancel()),

            // === Focus ===
            EditMsg::Focus => redraw_if(self.focus()),
            EditMsg::Blur => redraw_if(self.blur()),

            EditMsg::Key(key) => self.handle_key(key),
        }
    }

    /// Route a raw key: the mention machine sees it first, anything it leaves
    /// alone becomes default editing.
    pub fn handle_key(&mut self, key: Key) -> Option<Cmd> {
        match self.mention.handle_key(key) {
            MentionAction::Ignored => {}
            action => return self.apply_mention_action(action),
        }

        let msg = match key {
            Key::Char(ch) => EditMsg::InsertChar(ch),
            Key::Enter => EditMsg::InsertNewline,
            Key::Backspace => EditMsg::DeleteBackward,
            Key::Delete => EditMsg::DeleteForward,
            Key::Left => EditMsg::Move(MoveTarget::Left),
            Key::Right => EditMsg::Move(MoveTarget::Right),
            Key::Home => EditMsg::Move(MoveTarget::Start),
            Key::End => EditMsg::Move(MoveTarget::End),
            // Left to the host (focus traversal, list navigation elsewhere)
            Key::Tab | Key::Escape | Key::Up | Key::Down => return None,
        };
        self.update_inner(msg)
    }

    fn apply_mention_action(&mut self, action: MentionAction) -> Option<Cmd> {
        match action {
            MentionAction::Ignored => None,
            MentionAction::Handled => Some(Cmd::Redraw),
            MentionAction::Commit {
                name,
                anchor_offset,
            } => {
                if self.replace_with_variable(anchor_offset, &name) {
                    self.on_user_edit()
                } else {
                    Some(Cmd::Redraw)
                }
            }
        }
    }

    fn apply_move(&mut self, target: MoveTarget, extend_selection: bool) -> Option<Cmd> {
        let before = (self.caret, self.selection);
        match target {
            MoveTarget::Left => self.move_left(extend_selection),
            MoveTarget::Right => self.move_right(extend_selection),
            MoveTarget::Start => self.move_to_start(extend_selection),
            MoveTarget::End => self.move_to_end(extend_selection),
        }
        if before == (self.caret, self.selection) {
            return None;
        }
        self.after_move()
    }

    /// A composing mention follows the cursor; an idle one stays idle
    fn after_move(&mut self) -> Option<Cmd> {
        if self.mention.is_composing() {
            self.detect_mention();
        }
        Some(Cmd::Redraw)
    }

    fn edit(&mut self, op: impl FnOnce(&mut Self) -> bool) -> Option<Cmd> {
        if op(self) {
            self.on_user_edit()
        } else {
            None
        }
    }

    /// Debug check that every mutation path kept the tree well formed
    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use super::node::EditableNode;

        let mut prev_was_text = false;
        for node in self.nodes.nodes() {
            match node {
                EditableNode::Text(content) => {
                    debug_assert!(!content.is_empty(), "empty text node");
                    debug_assert!(!prev_was_text, "adjacent text nodes");
                    prev_was_text = true;
                }
                EditableNode::Variable(name) => {
                    debug_assert!(is_valid_name(name), "malformed variable node {name:?}");
                    prev_was_text = false;
                }
            }
        }
        let pos = self.cursor_position();
        debug_assert_eq!(self.nodes.snap(pos), pos, "cursor inside a variable");
        debug_assert!(
            self.constraints.allow_multiline || !self.nodes.serialize().contains('\n'),
            "line break in single-line surface"
        );
    }
}

fn redraw_if(changed: bool) -> Option<Cmd> {
    changed.then_some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<VariableCatalog> {
        Arc::new(VariableCatalog::from_names([
            "first_name",
            "last_name",
            "referral_link",
        ]))
    }

    fn editor(value: &str) -> TemplateEditor {
        TemplateEditor::with_value(value, EditConstraints::multi_line(), catalog())
    }

    #[test]
    fn test_with_value_places_cursor_at_end() {
        let ed = editor("Hi {{first_name}}");
        assert_eq!(ed.value(), "Hi {{first_name}}");
        assert_eq!(ed.cursor_position(), 17);
        assert!(ed.is_cursor_at_end());
    }

    #[test]
    fn test_empty_editor_cursor_is_zero() {
        let ed = editor("");
        assert_eq!(ed.cursor_position(), 0);
        assert!(ed.is_cursor_at_start());
        assert!(ed.is_cursor_at_end());
    }

    #[test]
    fn test_set_value_skips_rebuild_when_equal() {
        let mut ed = editor("abc");
        ed.set_cursor_position(1);
        assert!(!ed.set_value("abc"));
        assert_eq!(ed.cursor_position(), 1);

        assert!(ed.set_value("xyz {{a}}"));
        assert_eq!(ed.cursor_position(), 9);
    }

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut ed = editor("hllo");
        ed.set_cursor_position(1);
        assert!(ed.insert_char('e'));
        assert_eq!(ed.value(), "hello");
        assert_eq!(ed.cursor_position(), 2);
    }

    #[test]
    fn test_insert_variable_adds_separator() {
        let mut ed = editor("Hello !");
        ed.set_cursor_position(6);
        assert!(ed.insert_variable("first_name"));
        assert_eq!(ed.value(), "Hello {{first_name}} !");
        assert_eq!(ed.cursor_position(), 21);
        assert!(ed.is_focused());
    }

    #[test]
    fn test_insert_variable_rejects_bad_names() {
        let mut ed = editor("x");
        assert!(!ed.insert_variable(""));
        assert!(!ed.insert_variable("first name"));
        assert_eq!(ed.value(), "x");
    }

    #[test]
    fn test_mention_commit_of_invalid_name_keeps_text() {
        let mut ed = editor("Hi ");
        ed.update(EditMsg::InsertText("@fir".into()));
        assert!(ed.mention().is_composing());
        assert!(!ed.replace_with_variable(3, "first-name"));
        assert_eq!(ed.value(), "Hi @fir");
        assert_eq!(
            ed.apply_mention_action(MentionAction::Commit {
                name: "first-name".into(),
                anchor_offset: 3,
            }),
            Some(Cmd::Redraw)
        );
        assert_eq!(ed.value(), "Hi @fir");
        assert_eq!(ed.nodes().len(), 1);
    }

    #[test]
    fn test_line_break_separator_in_single_line_mode() {
        let constraints = EditConstraints::single_line().with_separator('\n');
        let mut ed = TemplateEditor::new(constraints, catalog());
        ed.update(EditMsg::InsertText("@fir".into()));
        assert_eq!(
            ed.update(EditMsg::Key(Key::Enter)),
            Some(Cmd::ValueChanged("{{first_name}} ".into()))
        );
        assert_eq!(ed.update(EditMsg::DeleteBackward), Some(Cmd::ValueChanged(String::new())));
    }

    #[test]
    fn test_single_line_echo_does_not_rebuild() {
        let mut ed = TemplateEditor::with_value("a\nb", EditConstraints::single_line(), catalog());
        ed.set_cursor_position(1);
        assert!(!ed.set_value("a\nb"));
        assert_eq!(ed.cursor_position(), 1);
        assert!(ed.set_value("a\nc"));
        assert_eq!(ed.value(), "a c");
    }

    #[test]
    fn test_set_cursor_inside_variable_snaps() {
        let mut ed = editor("a{{first_name}}b");
        ed.set_cursor_position(3);
        assert_eq!(ed.cursor_position(), 1);
        ed.set_cursor_position(13);
        assert_eq!(ed.cursor_position(), 15);
    }

    #[test]
    fn test_move_over_variable() {
        let mut ed = editor("a{{x}}b");
        ed.set_cursor_position(1);
        ed.move_right(false);
        assert_eq!(ed.cursor_position(), 6);
        ed.move_left(false);
        assert_eq!(ed.cursor_position(), 1);
    }

    #[test]
    fn test_text_before_cursor() {
        let mut ed = editor("Hi {{first_name}} there");
        ed.set_cursor_position(19);
        assert_eq!(ed.text_before_cursor(), "Hi {{first_name}} t");
    }

    #[test]
    fn test_backspace_plain_character() {
        let mut ed = editor("abc");
        assert!(ed.delete_backward());
        assert_eq!(ed.value(), "ab");
        assert_eq!(ed.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut ed = editor("abc");
        ed.set_cursor_position(0);
        assert!(!ed.delete_backward());
        assert_eq!(ed.value(), "abc");
    }

    #[test]
    fn test_delete_selection_widens_over_variable() {
        let mut ed = editor("ab{{x}}cd");
        ed.set_cursor_position(1);
        ed.move_right(true);
        ed.move_right(true);
        assert_eq!(ed.selection().range(), 1..7);
        assert!(ed.delete_backward());
        assert_eq!(ed.value(), "acd");
        assert_eq!(ed.cursor_position(), 1);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut ed = editor("hello {{x}}");
        ed.select_all();
        assert!(ed.insert_char('!'));
        assert_eq!(ed.value(), "!");
    }

    #[test]
    fn test_update_emits_only_on_change() {
        let mut ed = editor("a");
        assert_eq!(
            ed.update(EditMsg::InsertChar('b')),
            Some(Cmd::ValueChanged("ab".into()))
        );
        assert_eq!(ed.update(EditMsg::Move(MoveTarget::Left)), Some(Cmd::Redraw));
        assert_eq!(ed.update(EditMsg::Move(MoveTarget::Start)), Some(Cmd::Redraw));
        assert_eq!(ed.update(EditMsg::Move(MoveTarget::Start)), None);
        assert_eq!(ed.update(EditMsg::DeleteBackward), None);
    }

    #[test]
    fn test_single_line_rejects_newline() {
        let mut ed = TemplateEditor::new(EditConstraints::single_line(), catalog());
        assert!(!ed.insert_newline());
        assert_eq!(ed.update(EditMsg::Key(Key::Enter)), None);
        assert_eq!(ed.value(), "");
    }

    #[test]
    fn test_single_line_rebuild_collapses_breaks() {
        let ed = TemplateEditor::with_value("a\nb", EditConstraints::single_line(), catalog());
        assert_eq!(ed.value(), "a b");
    }

    #[test]
    fn test_blur_cancels_mention() {
        let mut ed = editor("");
        ed.update(EditMsg::Focus);
        ed.update(EditMsg::InsertText("@fi".into()));
        assert!(ed.mention().is_composing());
        assert_eq!(ed.update(EditMsg::Blur), Some(Cmd::Redraw));
        assert!(!ed.mention().is_composing());
        assert_eq!(ed.value(), "@fi");
    }

    #[test]
    fn test_moving_away_ends_composition() {
        let mut ed = editor("");
        ed.update(EditMsg::InsertText("x @fi".into()));
        assert!(ed.mention().is_composing());
        ed.update(EditMsg::Move(MoveTarget::Start));
        assert!(!ed.mention().is_composing());
    }
}
