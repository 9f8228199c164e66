#![forbid(unsafe_code)]

//! File discovery and parallel per-file rule execution

pub mod executor;
pub mod file_walker;

pub use executor::{
    ConvertReport, ExecutionEngine, ExecutionResult, FileNote, FileReport, WrittenFile,
    read_lines, write_conversions,
};
pub use file_walker::{FileEntry, FileWalker, FileWalkerError};
