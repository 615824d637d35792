//! Editable surface for template strings with atomic variable placeholders.
//!
//! The surface mirrors a template string as a tree of inline nodes that the
//! user edits directly:
//! - subject lines and SMS previews (single-line)
//! - email bodies and long-form messages (multi-line)
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`NodeList`]: Normalized sequence of [`EditableNode`]s with offset-space
//!   mutations that never split a variable
//! - [`Caret`] / [`CursorPosition`]: Live cursor in the tree and its serialized offset
//! - [`Selection`]: Anchor/head range in serialized offsets
//! - [`TemplateEditor`]: Main state container tying nodes, cursor, selection
//!   and the mention machine together
//! - [`EditConstraints`]: Single-line vs. multi-line mode, trigger and separator
//! - [`EditMsg`] / [`Key`]: Unified message types for all editing operations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vartext::catalog::VariableCatalog;
//! use vartext::editable::{EditConstraints, EditMsg, Key, TemplateEditor};
//!
//! let mut editor = TemplateEditor::new(
//!     EditConstraints::single_line(),
//!     Arc::new(VariableCatalog::builtin()),
//! );
//!
//! editor.update(EditMsg::InsertText("Hi @fir".into()));
//! editor.update(EditMsg::Key(Key::Enter));
//!
//! assert_eq!(editor.value(), "Hi {{first_name}} ");
//! ```

mod constraints;
mod cursor;
mod messages;
mod node;
mod selection;
mod state;

// Re-export main types
pub use constraints::{
    is_valid_separator, is_valid_trigger, EditConstraints, DEFAULT_SEPARATOR, DEFAULT_TRIGGER,
};
pub use cursor::{Caret, CursorPosition};
pub use messages::{EditMsg, Key, MoveTarget};
pub use node::{EditableNode, NodeList};
pub use selection::Selection;
pub use state::TemplateEditor;
