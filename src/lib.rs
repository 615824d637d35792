//! vartext - template-variable text editing engine
//!
//! This crate provides the core types and logic for editing template strings
//! such as `Hi {{first_name}}, here is your link: {{referral_link}}`, where
//! each `{{variable}}` is an atomic placeholder in an otherwise free-form
//! editable surface with mention-style autocomplete.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod mention;
pub mod template;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use catalog::{VariableCatalog, VariableDef};
pub use commands::Cmd;
pub use config::EngineConfig;
pub use editable::{EditMsg, TemplateEditor};
pub use template::Segment;
