//! Initialize a cstyle project
//!
//! Writes a commented default `cstyle.toml` into the working directory.

use crate::config::{CONFIG_FILE, DEFAULT_CONFIG};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target exists but is not a regular file
    #[error("Path '{}' exists but is not a file", .0.display())]
    NotAFile(PathBuf),
}

/// What init did with the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// Left alone because it already existed and `--force` was not given
    Skipped,
    Overwritten,
}

/// Run the init command in the working directory
pub fn run_init(force: bool) -> Result<InitOutcome, InitError> {
    init_in(Path::new("."), force)
}

/// Writes the default configuration into `dir`
///
/// # Errors
///
/// Returns `InitError::NotAFile` if `cstyle.toml` is a directory, and
/// `InitError::Io` if writing fails.
pub fn init_in(dir: &Path, force: bool) -> Result<InitOutcome, InitError> {
    let path = dir.join(CONFIG_FILE);

    if path.exists() {
        if !path.is_file() {
            return Err(InitError::NotAFile(path));
        }
        if !force {
            return Ok(InitOutcome::Skipped);
        }
        fs::write(&path, DEFAULT_CONFIG)?;
        Ok(InitOutcome::Overwritten)
    } else {
        fs::write(&path, DEFAULT_CONFIG)?;
        Ok(InitOutcome::Created)
    }
}
