//! Configuration loading tests against files on disk

use cstyle::config::{CONFIG_FILE, ColorOption, Config, DEFAULT_CONFIG, OutputFormat};
use cstyle::error::ConfigError;
use cstyle::rules::{Limits, RuleRegistry};
use cstyle::types::Mode;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_full_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(
        &path,
        r#"
[style]
version = "1"
include = ["src/**/*.c", "include/**/*.h"]
exclude = ["**/third_party/**"]
rules = ["A1", "A6", "P1"]

[limits]
function_min = 2
function_max = 60
file_min = 1
file_max = 1000
tab_width = 2

[output]
format = "jsonl"
color = "always"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.style.include.len(), 2);
    assert_eq!(config.style.exclude[0].as_str(), "**/third_party/**");
    assert_eq!(config.rule_selection(), vec!["A1", "A6", "P1"]);
    assert_eq!(
        config.limits,
        Limits {
            function_min: 2,
            function_max: 60,
            file_min: 1,
            file_max: 1000,
            tab_width: 2,
        }
    );
    assert_eq!(config.output.format, OutputFormat::Jsonl);
    assert_eq!(config.output.color, ColorOption::Always);
}

#[test]
fn test_configured_rules_select_dispatcher() {
    let config = Config::parse(
        "[style]\nversion = \"1\"\nrules = [\"cl5\", \"A1\"]\n",
    )
    .unwrap();
    let registry = RuleRegistry::builtin(&config.limits).unwrap();
    let dispatcher = registry
        .select(Mode::Check, &config.rule_selection())
        .unwrap();
    let ids: Vec<&str> = dispatcher
        .rule_ids()
        .into_iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(ids, vec!["A1", "CL5"]);
}

#[test]
fn test_default_template_matches_defaults() {
    let config = Config::parse(DEFAULT_CONFIG).unwrap();
    assert_eq!(config.limits, Limits::default());
    assert!(config.rule_selection().is_empty());
    assert_eq!(config.output.color, ColorOption::Auto);
}

#[test]
fn test_missing_version_is_a_parse_error() {
    let err = Config::parse("[style]\ninclude = [\"**/*.c\"]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_zero_function_max_rejected() {
    let err = Config::parse(
        "[style]\nversion = \"1\"\n[limits]\nfunction_min = 0\nfunction_max = 0\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("function limits")));
}
