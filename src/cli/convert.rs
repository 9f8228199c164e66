//! Convert command implementation
//!
//! Runs the selected convert rules over every discovered file and writes
//! the results under the output directory, mirroring each file's path
//! relative to its input root.

use crate::cli::common::{
    CommandError, EXIT_SUCCESS, GlobalOptions, build_registry, check_inputs, color,
    discover_files, load_config, requested_rules,
};
use crate::engine::{ExecutionEngine, write_conversions};
use crate::output::HumanFormatter;
use crate::types::Mode;
use std::path::{Path, PathBuf};

/// Run the convert command
///
/// Returns 0 when every file was processed (files with encoding errors are
/// reported and skipped), or the error exit code.
pub fn run_convert(
    paths: &[PathBuf],
    out: &Path,
    rules: &[String],
    options: &GlobalOptions,
) -> i32 {
    match run_convert_inner(paths, out, rules, options) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run_convert_inner(
    paths: &[PathBuf],
    out: &Path,
    rules: &[String],
    options: &GlobalOptions,
) -> Result<(), CommandError> {
    let config = load_config(options)?;
    let registry = build_registry(&config)?;
    let dispatcher = registry
        .select(Mode::Convert, &requested_rules(rules, &config))?
        .verbose(options.verbose);
    check_inputs(paths)?;

    let files = discover_files(paths, &config)?;
    if files.is_empty() {
        tracing::warn!("no files found to convert");
    }

    let engine = ExecutionEngine::new(dispatcher);
    let written = write_conversions(engine.convert(&files), out)?;

    HumanFormatter::new(color(options, &config)).print_converted(&written)?;
    Ok(())
}
