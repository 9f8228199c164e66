//! Error types for cstyle
//!
//! Configuration and rule-selection problems are fatal and surface before
//! any file is processed. Per-file problems (unreadable bytes, malformed
//! constructs) never become errors here: the engine records them as notes
//! and keeps going.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// One or more input roots do not exist
    #[error("Input path(s) not found: {}", display_paths(.paths))]
    MissingInput { paths: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Requested rule identifiers that the registry does not know
    #[error("Unknown rule ID(s): {}. Available rules: {}", .ids.join(", "), .available.join(", "))]
    Unknown {
        ids: Vec<String>,
        available: Vec<String>,
    },

    /// Invalid built-in rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Invalid regex pattern in a rule definition
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

/// Top-level error type for cstyle
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Source file is not valid UTF-8
    #[error("Encoding error in {}", .file.display())]
    Encoding { file: PathBuf },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
