//! Command-line driver for the template engine
//!
//! Supports:
//! - Parsing a template into segments (JSON)
//! - Serializing segments back into a template
//! - Replaying a script of editor messages against a fresh editor

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::editable::{EditMsg, TemplateEditor};
use crate::template::{self, Segment};

/// Template-variable text editing engine
#[derive(Parser, Debug)]
#[command(name = "vartext", version, about = "Template-variable text editing engine")]
pub struct CliArgs {
    /// Config file (defaults to ~/.config/vartext/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Parse a template string and print its segments as JSON
    Parse {
        /// Template string, e.g. "Hi {{first_name}}"
        template: String,
    },

    /// Serialize a JSON segment list back into a template string
    Serialize {
        /// Segments as printed by `parse`
        segments: String,
    },

    /// Replay a YAML/JSON list of editor messages and report emitted values
    Replay {
        /// Script file
        #[arg(long, value_name = "FILE")]
        script: PathBuf,

        /// Initial value supplied by the owner
        #[arg(long, default_value = "")]
        value: String,

        /// Variable catalog file (overrides config)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Edit on a single physical line (overrides config)
        #[arg(long)]
        single_line: bool,
    },
}

/// Outcome of a replayed script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Every value emitted, in order
    pub changes: Vec<String>,
    /// Final serialized value
    pub value: String,
    /// Final cursor offset
    pub cursor: usize,
    /// Mention query if still composing
    pub mention: Option<String>,
    /// Candidate names if still composing
    pub candidates: Vec<String>,
}

/// Read a script file; `.json` is parsed as JSON, anything else as YAML
pub fn load_script(path: &Path) -> Result<Vec<EditMsg>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script at {}", path.display()))?;

    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let script = if is_json {
        serde_json::from_str(&content).context("Failed to parse JSON script")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse YAML script")?
    };
    Ok(script)
}

/// Serialize a JSON segment list, rejecting variables that wouldn't parse back
pub fn serialize_segments(json: &str) -> Result<String> {
    let segments: Vec<Segment> = serde_json::from_str(json).context("Invalid segment JSON")?;
    for segment in &segments {
        if let Segment::Variable { name } = segment {
            if !template::is_valid_name(name) {
                bail!("Invalid variable name {name:?}: expected one or more of [A-Za-z0-9_]");
            }
        }
    }
    Ok(template::serialize(&segments))
}

/// Feed `script` to `editor`, owner-style: every emitted value is recorded
/// and handed straight back through `set_value`.
pub fn replay(editor: &mut TemplateEditor, script: Vec<EditMsg>) -> ReplayReport {
    let mut changes = Vec::new();
    for msg in script {
        if let Some(value) = editor.update(msg).and_then(|cmd| cmd.into_value()) {
            editor.set_value(&value);
            changes.push(value);
        }
    }

    let view = editor.mention_view();
    ReplayReport {
        changes,
        value: editor.value(),
        cursor: editor.cursor_position(),
        mention: view.as_ref().map(|view| view.query.to_string()),
        candidates: view
            .map(|view| view.candidates.iter().map(|def| def.name.clone()).collect())
            .unwrap_or_default(),
    }
}

/// Execute a parsed command line
pub fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    match args.command {
        CliCommand::Parse { template } => {
            let segments = template::parse(&template);
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        CliCommand::Serialize { segments } => {
            println!("{}", serialize_segments(&segments)?);
        }
        CliCommand::Replay {
            script,
            value,
            catalog,
            single_line,
        } => {
            let config = EngineConfig {
                single_line: single_line || config.single_line,
                catalog: catalog.or(config.catalog),
                ..config
            };
            let catalog = config.load_catalog()?;
            let script = load_script(&script)?;
            tracing::info!(steps = script.len(), "replaying script");

            let mut editor = TemplateEditor::with_value(&value, config.constraints(), catalog);
            let report = replay(&mut editor, script);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
