//! Engine configuration persistence
//!
//! Stores preferences in `~/.config/vartext/config.yaml`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::VariableCatalog;
use crate::editable::{
    is_valid_separator, is_valid_trigger, EditConstraints, DEFAULT_SEPARATOR, DEFAULT_TRIGGER,
};

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Character that opens a mention query
    #[serde(default = "default_trigger")]
    pub trigger: char,

    /// Plain character inserted after a committed variable
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Edit on a single physical line by default
    #[serde(default)]
    pub single_line: bool,

    /// Variable catalog file (JSON or YAML); the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

fn default_trigger() -> char {
    DEFAULT_TRIGGER
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            separator: default_separator(),
            single_line: false,
            catalog: None,
        }
    }
}

impl EngineConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    Self::validated(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace unusable special characters with their defaults
    fn validated(mut self) -> Self {
        if !is_valid_trigger(self.trigger) {
            tracing::warn!(
                "Invalid trigger {:?} in config, using {:?}",
                self.trigger,
                DEFAULT_TRIGGER
            );
            self.trigger = DEFAULT_TRIGGER;
        }
        if !is_valid_separator(self.separator) {
            tracing::warn!(
                "Invalid separator {:?} in config, using {:?}",
                self.separator,
                DEFAULT_SEPARATOR
            );
            self.separator = DEFAULT_SEPARATOR;
        }
        self
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Editing constraints for this configuration
    pub fn constraints(&self) -> EditConstraints {
        let base = if self.single_line {
            EditConstraints::single_line()
        } else {
            EditConstraints::multi_line()
        };
        base.with_trigger(self.trigger).with_separator(self.separator)
    }

    /// Load the configured catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<Arc<VariableCatalog>> {
        let catalog = match &self.catalog {
            Some(path) => VariableCatalog::load(path)?,
            None => VariableCatalog::builtin(),
        };
        Ok(Arc::new(catalog))
    }
}
