#![forbid(unsafe_code)]

//! Core rule traits and the values they exchange with the dispatcher

use crate::types::{Language, RuleId};
use serde::{Deserialize, Serialize};

/// One file handed to a rule: its name and its lines
///
/// The core only ever borrows the lines; it never reads or writes files.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// File name without directories, e.g. `Main.c`
    pub file_name: &'a str,

    /// Lines without their terminators; line `n` is `lines[n - 1]`
    pub lines: &'a [String],
}

impl<'a> SourceFile<'a> {
    pub fn new(file_name: &'a str, lines: &'a [String]) -> Self {
        Self { file_name, lines }
    }

    /// Language detected from the file name
    pub fn language(&self) -> Option<Language> {
        Language::detect(self.file_name)
    }
}

/// A single style violation reported by a check rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// ID of the rule that produced this diagnostic
    pub rule_id: RuleId,

    /// Line number (1-indexed); 0 for findings about the whole file
    pub line: u32,

    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule_id: &RuleId, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.clone(),
            line: u32::try_from(line).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }

    /// A diagnostic about the file as a whole
    pub fn file_level(rule_id: &RuleId, message: impl Into<String>) -> Self {
        Self::new(rule_id, 0, message)
    }

    pub fn is_file_level(&self) -> bool {
        self.line == 0
    }
}

/// Output of a convert rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The rewritten lines
    pub lines: Vec<String>,

    /// Suggested new file name, if the rule renames the file
    pub file_name: Option<String>,
}

impl Conversion {
    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            file_name: None,
        }
    }

    /// Leaves the file untouched
    pub fn unchanged(file: &SourceFile<'_>) -> Self {
        Self::lines(file.lines.to_vec())
    }
}

/// Numeric limits shared by the size rules and the tab expander
///
/// Deserialized from the `[limits]` table of `cstyle.toml`; missing keys
/// take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub function_min: usize,
    pub function_max: usize,
    pub file_min: usize,
    pub file_max: usize,
    pub tab_width: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            function_min: 4,
            function_max: 40,
            file_min: 4,
            file_max: 400,
            tab_width: 4,
        }
    }
}

/// A rule that reports diagnostics
///
/// The trait is `Send + Sync` so one registry can serve files processed in
/// parallel.
pub trait CheckRule: Send + Sync {
    fn id(&self) -> &RuleId;

    fn description(&self) -> &str;

    /// Returns diagnostics in ascending line order
    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic>;
}

/// A rule that rewrites a file
pub trait ConvertRule: Send + Sync {
    fn id(&self) -> &RuleId;

    fn description(&self) -> &str;

    fn convert(&self, file: &SourceFile<'_>) -> Conversion;
}

/// A registered rule implementation, tagged by what it produces
pub enum RuleKind {
    Check(Box<dyn CheckRule>),
    Convert(Box<dyn ConvertRule>),
}

impl RuleKind {
    pub fn id(&self) -> &RuleId {
        match self {
            RuleKind::Check(rule) => rule.id(),
            RuleKind::Convert(rule) => rule.id(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            RuleKind::Check(rule) => rule.description(),
            RuleKind::Convert(rule) => rule.description(),
        }
    }
}

impl std::fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            RuleKind::Check(_) => "Check",
            RuleKind::Convert(_) => "Convert",
        };
        f.debug_struct("RuleKind")
            .field("kind", &kind)
            .field("id", self.id())
            .finish()
    }
}
