//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! cursor, node tree and mention state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=surface=trace` - per-message state diffs
//! - `RUST_LOG=vartext::mention=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/vartext/logs/vartext.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::TemplateEditor;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// `~/.config/vartext/logs/vartext.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG; stderr keeps stdout clean for CLI output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "vartext.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of surface state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub cursor: usize,
    pub selection: (usize, usize),
    pub node_count: usize,
    pub serialized_len: usize,
    pub focused: bool,
    /// `(query, selected_index)` while composing
    pub mention: Option<(String, usize)>,
}

impl SurfaceSnapshot {
    pub fn from_editor(editor: &TemplateEditor) -> Self {
        let selection = editor.selection();
        Self {
            cursor: editor.cursor_position(),
            selection: (selection.anchor, selection.head),
            node_count: editor.nodes().len(),
            serialized_len: editor.nodes().serialized_len(),
            focused: editor.is_focused(),
            mention: editor
                .mention()
                .state()
                .map(|state| (state.query.clone(), state.selected_index)),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SurfaceSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.cursor != other.cursor {
            changes.push(format!("cursor: {} → {}", self.cursor, other.cursor));
        }
        if self.selection != other.selection && other.selection.0 != other.selection.1 {
            changes.push(format!(
                "selection: {}..{}",
                other.selection.0, other.selection.1
            ));
        }
        if self.node_count != other.node_count || self.serialized_len != other.serialized_len {
            changes.push(format!(
                "nodes: {}/{} → {}/{}",
                self.node_count, self.serialized_len, other.node_count, other.serialized_len
            ));
        }
        if self.focused != other.focused {
            changes.push(format!(
                "focus {}",
                if other.focused { "gained" } else { "lost" }
            ));
        }
        if self.mention != other.mention {
            match &other.mention {
                Some((query, selected)) => {
                    changes.push(format!("mention: {:?} #{}", query, selected))
                }
                None => changes.push("mention: idle".to_string()),
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
