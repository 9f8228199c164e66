//! CLI argument parsing using clap

use crate::config::{ColorOption, OutputFormat as ConfigFormat};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for cstyle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl From<OutputFormat> for ConfigFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => ConfigFormat::Human,
            OutputFormat::Jsonl => ConfigFormat::Jsonl,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<ColorChoice> for ColorOption {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorOption::Auto,
            ColorChoice::Always => ColorOption::Always,
            ColorChoice::Never => ColorOption::Never,
        }
    }
}

/// cstyle CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "cstyle")]
#[command(about = "Style auditor and auto-corrector for C-like source files")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (overrides [output] color)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Log every rule applied to every file, and every rename
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./cstyle.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available cstyle subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report style violations
    Check {
        /// Paths to check (defaults to current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Comma-separated rule IDs to run (defaults to every rule)
        #[arg(short, long, value_delimiter = ',')]
        rules: Vec<String>,

        /// Output format (overrides [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Rewrite files into an output directory
    Convert {
        /// Paths to convert (defaults to current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Directory receiving the converted tree
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Comma-separated rule IDs to apply (defaults to every rule)
        #[arg(short, long, value_delimiter = ',')]
        rules: Vec<String>,
    },

    /// List every rule with its description
    List {
        /// Output format (overrides [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Write a default cstyle.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_default_args() {
        let cli = Cli::parse_from(["cstyle", "check"]);
        match cli.command {
            Command::Check {
                paths,
                rules,
                format,
            } => {
                assert_eq!(paths, vec![PathBuf::from(".")]);
                assert!(rules.is_empty());
                assert_eq!(format, None);
            }
            _ => panic!("Expected Check command"),
        }
        assert_eq!(cli.color, None);
        assert!(!cli.verbose);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_check_rules_are_comma_separated() {
        let cli = Cli::parse_from(["cstyle", "check", "src/", "--rules", "A1,cl5", "-r", "P1"]);
        match cli.command {
            Command::Check { paths, rules, .. } => {
                assert_eq!(paths, vec![PathBuf::from("src/")]);
                assert_eq!(rules, vec!["A1", "cl5", "P1"]);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_check_short_format() {
        let cli = Cli::parse_from(["cstyle", "check", "-f", "jsonl"]);
        match cli.command {
            Command::Check { format, .. } => {
                assert_eq!(format, Some(OutputFormat::Jsonl));
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_convert_requires_out() {
        assert!(Cli::try_parse_from(["cstyle", "convert", "src"]).is_err());

        let cli = Cli::parse_from(["cstyle", "convert", "src", "--out", "build/styled"]);
        match cli.command {
            Command::Convert { paths, out, rules } => {
                assert_eq!(paths, vec![PathBuf::from("src")]);
                assert_eq!(out, PathBuf::from("build/styled"));
                assert!(rules.is_empty());
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_init_with_force() {
        let cli = Cli::parse_from(["cstyle", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "cstyle", "list", "--color", "never", "-v", "--config", "alt.toml",
        ]);
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_invalid_format() {
        assert!(Cli::try_parse_from(["cstyle", "check", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_help_contains_about() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Style auditor"));
    }
}
