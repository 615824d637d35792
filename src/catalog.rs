//! Variable catalog
//!
//! The read-only, ordered list of variables a user can insert. The editor
//! never mutates it and never validates template variables against it;
//! membership checks are for the presentation layer (e.g. flagging unknown
//! placeholders).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::template::is_valid_name;

/// A variable that can be inserted into a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableDef {
    /// Identifier used inside `{{...}}`
    pub name: String,
    /// Human-readable description shown in the suggestion list
    #[serde(default)]
    pub description: String,
}

impl VariableDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Built-in variables available to every campaign template
pub static BUILTIN_VARIABLES: &[(&str, &str)] = &[
    ("first_name", "Recipient's first name"),
    ("last_name", "Recipient's last name"),
    ("email", "Recipient's email address"),
    ("company_name", "Name of the sending company"),
    ("referral_link", "Recipient's personal referral link"),
    ("reward_amount", "Reward earned per successful referral"),
    ("unsubscribe_link", "One-click unsubscribe URL"),
];

/// Ordered list of insertable variables.
///
/// Only names that form a valid `{{name}}` token are kept; anything else is
/// dropped with a warning when the catalog is built or deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<VariableDef>", into = "Vec<VariableDef>")]
pub struct VariableCatalog {
    variables: Vec<VariableDef>,
}

impl From<Vec<VariableDef>> for VariableCatalog {
    fn from(variables: Vec<VariableDef>) -> Self {
        Self::new(variables)
    }
}

impl From<VariableCatalog> for Vec<VariableDef> {
    fn from(catalog: VariableCatalog) -> Self {
        catalog.variables
    }
}

impl VariableCatalog {
    pub fn new(variables: Vec<VariableDef>) -> Self {
        let variables = variables
            .into_iter()
            .filter(|def| {
                let valid = is_valid_name(&def.name);
                if !valid {
                    tracing::warn!(name = %def.name, "skipping catalog entry with invalid name");
                }
                valid
            })
            .collect();
        Self { variables }
    }

    /// Catalog of names without descriptions
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| VariableDef::new(name, ""))
                .collect(),
        )
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self {
            variables: BUILTIN_VARIABLES
                .iter()
                .map(|(name, description)| VariableDef::new(*name, *description))
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse variable catalog JSON")
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse variable catalog YAML")
    }

    /// Load a catalog file, picking YAML for `.yaml`/`.yml` and JSON otherwise
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog at {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );
        let catalog = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
        .with_context(|| format!("Invalid catalog at {}", path.display()))?;

        tracing::info!(
            "Loaded {} variables from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|def| def.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Variables whose name contains `query`, ignoring case, in catalog order.
    /// An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&VariableDef> {
        let needle = query.to_lowercase();
        self.variables
            .iter()
            .filter(|def| def.name.to_lowercase().contains(&needle))
            .collect()
    }
}
