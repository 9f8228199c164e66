//! CLI argument parsing and command dispatch

pub mod args;
pub mod check;
pub mod common;
pub mod convert;
pub mod init;
pub mod list;

pub use args::{Cli, ColorChoice, Command, OutputFormat};
pub use common::GlobalOptions;
