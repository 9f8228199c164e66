//! List command implementation
//!
//! Prints every registered rule ID, its description and which modes it
//! supports.

use crate::cli::args::OutputFormat;
use crate::cli::common::{
    CommandError, EXIT_SUCCESS, GlobalOptions, build_registry, color, load_config,
    output_format,
};
use crate::config::OutputFormat as ConfigFormat;
use crate::output::{HumanFormatter, JsonlFormatter};

/// Run the list command
pub fn run_list(format: Option<OutputFormat>, options: &GlobalOptions) -> i32 {
    match run_list_inner(format, options) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run_list_inner(
    format: Option<OutputFormat>,
    options: &GlobalOptions,
) -> Result<(), CommandError> {
    let config = load_config(options)?;
    let rules = build_registry(&config)?.describe();

    match output_format(format, &config) {
        ConfigFormat::Human => HumanFormatter::new(color(options, &config)).print_rules(&rules)?,
        ConfigFormat::Jsonl => JsonlFormatter::new().print_rules(&rules)?,
    }
    Ok(())
}
