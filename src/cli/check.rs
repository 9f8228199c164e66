//! Check command implementation
//!
//! Loads configuration, validates the rule selection and the input paths,
//! runs every selected check rule over every discovered file in parallel
//! and prints the diagnostics.

use crate::cli::args::OutputFormat;
use crate::cli::common::{
    CommandError, EXIT_FINDINGS, EXIT_SUCCESS, GlobalOptions, build_registry, check_inputs,
    color, discover_files, load_config, output_format, requested_rules,
};
use crate::config::OutputFormat as ConfigFormat;
use crate::engine::ExecutionEngine;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::types::Mode;
use std::path::PathBuf;

/// Run the check command
///
/// # Returns
///
/// Exit code:
/// - 0: no diagnostics
/// - 1: at least one diagnostic
/// - 2: configuration, rule or I/O error
/// - 3: configuration file does not parse
pub fn run_check(
    paths: &[PathBuf],
    rules: &[String],
    format: Option<OutputFormat>,
    options: &GlobalOptions,
) -> i32 {
    match run_check_inner(paths, rules, format, options) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FINDINGS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Returns whether the run was clean
fn run_check_inner(
    paths: &[PathBuf],
    rules: &[String],
    format: Option<OutputFormat>,
    options: &GlobalOptions,
) -> Result<bool, CommandError> {
    let config = load_config(options)?;
    let registry = build_registry(&config)?;
    let dispatcher = registry
        .select(Mode::Check, &requested_rules(rules, &config))?
        .verbose(options.verbose);
    check_inputs(paths)?;

    let files = discover_files(paths, &config)?;
    if files.is_empty() {
        tracing::warn!("no files found to check");
    }

    let engine = ExecutionEngine::new(dispatcher);
    let result = engine.check(&files);

    match output_format(format, &config) {
        ConfigFormat::Human => HumanFormatter::new(color(options, &config)).print_check(&result)?,
        ConfigFormat::Jsonl => JsonlFormatter::new().print_check(&result)?,
    }

    Ok(!result.has_findings())
}
