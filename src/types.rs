#![forbid(unsafe_code)]

//! Core domain types for cstyle
//!
//! This module defines the fundamental types shared by the rule core, the
//! engine and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Source languages handled by cstyle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// `.c` translation unit
    C,
    /// `.cpp` / `.cc` / `.cxx` translation unit
    Cpp,
    /// `.h` / `.hpp` header
    Header,
}

impl Language {
    /// Detects the language from a file name or path by extension
    pub fn detect(path: impl AsRef<Path>) -> Option<Language> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext {
            "c" => Some(Language::C),
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            "h" | "hpp" | "hh" => Some(Language::Header),
            _ => None,
        }
    }
}

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only ASCII alphanumeric characters,
/// e.g. `A6` or `CL5`. Lower-case input is normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(RuleId(id.to_ascii_uppercase()))
    }

    /// Creates a RuleId for a built-in rule
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(
            !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        RuleId(id.to_string())
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value.clone()).ok_or_else(|| format!("Invalid rule ID '{}'", value))
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// Whether a rule pass reports diagnostics or rewrites the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Check,
    Convert,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Check => write!(f, "check"),
            Mode::Convert => write!(f, "convert"),
        }
    }
}

/// Syntactic category of a single source line
///
/// The declaration order of the section variants is the canonical section
/// order of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineTag {
    SystemInclude,
    UserInclude,
    TypeDecl,
    Global,
    FuncDecl,
    FuncImpl,
    Blank,
    Other,
}

impl LineTag {
    /// Canonical section order
    pub const CANONICAL_ORDER: [LineTag; 6] = [
        LineTag::SystemInclude,
        LineTag::UserInclude,
        LineTag::TypeDecl,
        LineTag::Global,
        LineTag::FuncDecl,
        LineTag::FuncImpl,
    ];

    /// Position in the canonical order, or None for `Blank` and `Other`
    pub fn section_rank(self) -> Option<usize> {
        Self::CANONICAL_ORDER.iter().position(|tag| *tag == self)
    }

    /// Returns true if this tag opens or continues a file section
    pub fn is_section(self) -> bool {
        self.section_rank().is_some()
    }
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineTag::SystemInclude => "SystemInclude",
            LineTag::UserInclude => "UserInclude",
            LineTag::TypeDecl => "TypeDecl",
            LineTag::Global => "Global",
            LineTag::FuncDecl => "FuncDecl",
            LineTag::FuncImpl => "FuncImpl",
            LineTag::Blank => "Blank",
            LineTag::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A glob pattern for file matching
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}
