//! cstyle CLI entry point

use clap::Parser;
use cstyle::cli::common::EXIT_ERROR;
use cstyle::cli::init::InitOutcome;
use cstyle::cli::{Cli, Command, GlobalOptions};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = GlobalOptions {
        color: cli.color,
        verbose: cli.verbose,
        config: cli.config,
    };

    let exit_code = match cli.command {
        Command::Init { force } => match cstyle::cli::init::run_init(force) {
            Ok(InitOutcome::Created) => {
                println!("Created cstyle.toml.");
                0
            }
            Ok(InitOutcome::Overwritten) => {
                println!("Overwrote cstyle.toml.");
                0
            }
            Ok(InitOutcome::Skipped) => {
                println!("cstyle.toml already exists; use --force to overwrite it.");
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Command::Check {
            paths,
            rules,
            format,
        } => cstyle::cli::check::run_check(&paths, &rules, format, &options),
        Command::Convert { paths, out, rules } => {
            cstyle::cli::convert::run_convert(&paths, &out, &rules, &options)
        }
        Command::List { format } => cstyle::cli::list::run_list(format, &options),
    };

    process::exit(exit_code);
}

/// Logs go to stderr: `warn` by default, `debug` with `--verbose`, and
/// `RUST_LOG` wins over both
fn init_tracing(verbose: bool) {
    let default = if verbose { "cstyle=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
