//! Parsing and validation for cstyle.toml configuration files

use crate::error::ConfigError;
use crate::rules::Limits;
use crate::rules::builtin::BUILTIN_IDS;
use crate::types::{GlobPattern, RuleId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "cstyle.toml";

/// Commented template written by `cstyle init`
pub const DEFAULT_CONFIG: &str = r#"# cstyle configuration

[style]
version = "1"

# Files to process, relative to each input path
include = ["**/*.c", "**/*.cpp", "**/*.cc", "**/*.cxx", "**/*.h", "**/*.hpp"]
exclude = ["**/build/**"]

# Rules to run when --rules is not given; omit to run every rule
# rules = ["A1", "A4", "A5", "A6", "A7", "A8", "CL1", "CL5", "DV1", "DV3", "P1"]

[limits]
function_min = 4
function_max = 40
file_min = 4
file_max = 400
tab_width = 4

[output]
format = "human"  # human | jsonl
color = "auto"    # auto | always | never
"#;

/// Main configuration struct for cstyle.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Metadata and file selection
    pub style: StyleMeta,

    /// Numeric limits for the size rules and tab expansion
    #[serde(default)]
    pub limits: Limits,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads an explicit config file, or `cstyle.toml` from `dir` if present
    ///
    /// A missing default file means defaults; a missing explicit file is an
    /// error.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(path)
        } else {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.style.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.style.version
            )));
        }

        let pattern_sets = [("include", &self.style.include), ("exclude", &self.style.exclude)];
        for (kind, patterns) in pattern_sets {
            for pattern in patterns {
                globset::Glob::new(pattern.as_str()).map_err(|e| {
                    ConfigError::Validation(format!(
                        "Invalid {} glob pattern '{}': {}",
                        kind,
                        pattern.as_str(),
                        e
                    ))
                })?;
            }
        }

        let limits = &self.limits;
        if limits.function_max == 0 || limits.function_min > limits.function_max {
            return Err(ConfigError::Validation(format!(
                "Invalid function limits: {}-{}",
                limits.function_min, limits.function_max
            )));
        }
        if limits.file_min > limits.file_max {
            return Err(ConfigError::Validation(format!(
                "Invalid file limits: {}-{}",
                limits.file_min, limits.file_max
            )));
        }
        if limits.tab_width == 0 {
            return Err(ConfigError::Validation(
                "tab_width must be at least 1".to_string(),
            ));
        }

        if let Some(rules) = &self.style.rules {
            let unknown: Vec<&str> = rules
                .iter()
                .map(RuleId::as_str)
                .filter(|id| !BUILTIN_IDS.contains(id))
                .collect();
            if !unknown.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Unknown rule ID(s) in [style] rules: {}",
                    unknown.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Rules selected by the configuration, as strings for the registry
    pub fn rule_selection(&self) -> Vec<String> {
        self.style
            .rules
            .as_ref()
            .map(|rules| rules.iter().map(|id| id.to_string()).collect())
            .unwrap_or_default()
    }
}

/// `[style]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// File patterns to include
    #[serde(default = "default_include")]
    pub include: Vec<GlobPattern>,

    /// File patterns to exclude
    #[serde(default)]
    pub exclude: Vec<GlobPattern>,

    /// Rules to run; None means every rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleId>>,
}

impl Default for StyleMeta {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            include: default_include(),
            exclude: Vec::new(),
            rules: None,
        }
    }
}

fn default_include() -> Vec<GlobPattern> {
    vec![GlobPattern::new("**/*")]
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
