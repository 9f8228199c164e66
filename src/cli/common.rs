//! Helpers shared across CLI commands: configuration, input validation,
//! file discovery and rule selection

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::config::{ColorOption, Config, OutputFormat as ConfigFormat};
use crate::engine::file_walker::{FileEntry, FileWalker, FileWalkerError};
use crate::error::{ConfigError, RuleError, StyleError};
use crate::rules::RuleRegistry;
use std::path::{Path, PathBuf};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Flags that apply to every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub color: Option<ColorChoice>,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

/// Error shared by the commands that run rules
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("File walker error: {0}")]
    FileWalker(#[from] FileWalkerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StyleError> for CommandError {
    fn from(error: StyleError) -> Self {
        match error {
            StyleError::Config(e) => CommandError::Config(e),
            StyleError::Rule(e) => CommandError::Rule(e),
            StyleError::Io(e) => CommandError::Io(e),
            StyleError::Encoding { file } => CommandError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8 in {}", file.display()),
            )),
        }
    }
}

impl CommandError {
    /// Exit code for a fatal error; TOML syntax errors get their own code
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Loads `--config`, or `cstyle.toml` from the working directory
pub(crate) fn load_config(options: &GlobalOptions) -> Result<Config, ConfigError> {
    Config::discover(options.config.as_deref(), Path::new("."))
}

/// Fails if any input path does not exist, listing all of them
pub(crate) fn check_inputs(paths: &[PathBuf]) -> Result<(), ConfigError> {
    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingInput { paths: missing })
    }
}

/// Walks every input path with the configured include/exclude patterns
pub(crate) fn discover_files(
    paths: &[PathBuf],
    config: &Config,
) -> Result<Vec<FileEntry>, FileWalkerError> {
    let mut all_files = Vec::new();
    for path in paths {
        let walker = FileWalker::new(path, &config.style.include, &config.style.exclude)?;
        for result in walker.walk() {
            all_files.push(result?);
        }
    }
    tracing::debug!(files = all_files.len(), "discovered files");
    Ok(all_files)
}

/// Built-in registry sized by the configured limits
pub(crate) fn build_registry(config: &Config) -> Result<RuleRegistry, RuleError> {
    RuleRegistry::builtin(&config.limits)
}

/// `--rules` if given, otherwise `[style] rules`, otherwise everything
pub(crate) fn requested_rules(cli_rules: &[String], config: &Config) -> Vec<String> {
    if cli_rules.is_empty() {
        config.rule_selection()
    } else {
        cli_rules.to_vec()
    }
}

pub(crate) fn output_format(cli: Option<OutputFormat>, config: &Config) -> ConfigFormat {
    cli.map(ConfigFormat::from).unwrap_or(config.output.format)
}

pub(crate) fn color(options: &GlobalOptions, config: &Config) -> ColorOption {
    options.color.map(ColorOption::from).unwrap_or(config.output.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlobPattern;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_inputs_lists_every_missing_path() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().to_path_buf();
        let gone = dir.path().join("gone");
        let also_gone = dir.path().join("also_gone.c");

        assert!(check_inputs(std::slice::from_ref(&present)).is_ok());
        match check_inputs(&[present, gone.clone(), also_gone.clone()]) {
            Err(ConfigError::MissingInput { paths }) => assert_eq!(paths, vec![gone, also_gone]),
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_files_with_empty_paths() {
        let files = discover_files(&[], &Config::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_files_applies_config_patterns() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("Main.c"), "int main()\n").unwrap();
        fs::write(dir.path().join("build/Gen.c"), "int x;\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "text\n").unwrap();

        let mut config = Config::default();
        config.style.exclude = vec![GlobPattern::new("build/**")];

        let files = discover_files(&[dir.path().to_path_buf()], &config).unwrap();
        let names: Vec<String> = files.iter().map(FileEntry::file_name).collect();
        assert_eq!(names, vec!["Main.c"]);
    }

    #[test]
    fn test_cli_rules_override_config() {
        let mut config = Config::default();
        config.style.rules = Some(vec![crate::types::RuleId::new("A1").unwrap()]);

        assert_eq!(requested_rules(&[], &config), vec!["A1"]);
        assert_eq!(
            requested_rules(&["CL5".to_string()], &config),
            vec!["CL5"]
        );
        assert!(requested_rules(&[], &Config::default()).is_empty());
    }

    #[test]
    fn test_parse_errors_have_their_own_exit_code() {
        let parse = Config::parse("[style").unwrap_err();
        assert_eq!(CommandError::from(parse).exit_code(), EXIT_PARSE_ERROR);

        let missing = ConfigError::MissingInput { paths: vec![] };
        assert_eq!(CommandError::from(missing).exit_code(), EXIT_ERROR);
    }

    #[test]
    fn test_cli_flags_override_output_config() {
        let mut config = Config::default();
        config.output.format = ConfigFormat::Jsonl;
        assert_eq!(output_format(None, &config), ConfigFormat::Jsonl);
        assert_eq!(
            output_format(Some(OutputFormat::Human), &config),
            ConfigFormat::Human
        );

        let options = GlobalOptions {
            color: Some(ColorChoice::Always),
            ..GlobalOptions::default()
        };
        assert_eq!(color(&options, &config), ColorOption::Always);
        assert_eq!(color(&GlobalOptions::default(), &config), ColorOption::Auto);
    }
}
