#![forbid(unsafe_code)]

//! cstyle: a rule-based style auditor and auto-corrector for C-like sources
//!
//! Each rule has a stable short ID (`A1`, `CL5`, `DV1`, ...) and comes in a
//! check variant that reports diagnostics and a convert variant that
//! rewrites the file. The rule core works on in-memory lines; the engine,
//! configuration and CLI layers around it handle the filesystem.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod syntax;
pub mod types;

pub use error::{ConfigError, RuleError, StyleError};

pub use types::{GlobPattern, Language, LineTag, Mode, RuleId};
