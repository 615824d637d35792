//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use vartext::editable::{EditConstraints, EditMsg, Key, TemplateEditor};
use vartext::{Cmd, VariableCatalog};

/// Catalog used across tests, in display order
pub fn test_catalog() -> Arc<VariableCatalog> {
    Arc::new(VariableCatalog::from_names([
        "first_name",
        "last_name",
        "email",
        "referral_link",
        "reward_amount",
    ]))
}

/// Multi-line editor showing `value`, cursor at the end
pub fn test_editor(value: &str) -> TemplateEditor {
    TemplateEditor::with_value(value, EditConstraints::multi_line(), test_catalog())
}

/// Single-line editor showing `value`, cursor at the end
pub fn test_single_line_editor(value: &str) -> TemplateEditor {
    TemplateEditor::with_value(value, EditConstraints::single_line(), test_catalog())
}

/// Multi-line editor showing `value` with the cursor at `offset`
pub fn test_editor_at(value: &str, offset: usize) -> TemplateEditor {
    let mut editor = test_editor(value);
    editor.set_cursor_position(offset);
    editor
}

/// Type `text` one key at a time, returning every emitted value
pub fn type_text(editor: &mut TemplateEditor, text: &str) -> Vec<String> {
    text.chars()
        .filter_map(|ch| editor.update(EditMsg::Key(Key::Char(ch))))
        .filter_map(Cmd::into_value)
        .collect()
}

/// Press a key, returning the emitted value if any
pub fn press(editor: &mut TemplateEditor, key: Key) -> Option<String> {
    editor.update(EditMsg::Key(key)).and_then(Cmd::into_value)
}

/// Query of the mention being composed, if any
pub fn mention_query(editor: &TemplateEditor) -> Option<String> {
    editor.mention().state().map(|state| state.query.clone())
}
