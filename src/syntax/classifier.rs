#![forbid(unsafe_code)]

//! Line classifier
//!
//! Tags a line with its syntactic section by trying a fixed sequence of
//! patterns; the first pattern that matches wins.

use crate::syntax::lexer::code_views;
use crate::types::LineTag;
use regex::Regex;
use std::sync::LazyLock;

static SYSTEM_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*include\s*<[^>]*>").expect("valid regex"));

static USER_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*#\s*include\s*"[^"]*""#).expect("valid regex"));

static TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#\s*define|const|enum|struct|union|typedef)\b").expect("valid regex")
});

// Top-level declarations start in column 0.
static GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_]\w*[\s*]+)+\**[A-Za-z_]\w*\s*(?:\[[^\]]*\]\s*)*(?:=.*)?;\s*$")
        .expect("valid regex")
});

static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:[A-Za-z_]\w*\s*\**\s+)+?)\**\s*([A-Za-z_]\w*)\s*\(([^()]*)\)\s*(.*)$")
        .expect("valid regex")
});

/// Words that start statements, never declarations
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "else", "if", "while", "for", "switch", "do", "goto", "case", "default", "sizeof",
    "typedef", "break", "continue",
];

/// What follows the parameter list of a function signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEnd {
    /// `;`: a prototype
    Semicolon,
    /// `{` on the same line
    Brace,
    /// Nothing yet; the brace may follow on a later line
    Open,
}

/// A function signature recognized on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub end: SignatureEnd,
}

/// Matches `<return type> <name>(<params>)` on a code view of a line
pub fn signature(view: &str) -> Option<Signature> {
    let caps = SIGNATURE.captures(view)?;
    let return_type = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();

    if is_statement_keyword(name)
        || return_type
            .split(|c: char| c.is_whitespace() || c == '*')
            .any(is_statement_keyword)
    {
        return None;
    }

    let rest = caps.get(4).map_or("", |m| m.as_str()).trim();
    let end = if rest.starts_with(';') && rest[1..].trim().is_empty() {
        SignatureEnd::Semicolon
    } else if rest.starts_with('{') {
        SignatureEnd::Brace
    } else if rest.is_empty() {
        SignatureEnd::Open
    } else {
        return None;
    };

    Some(Signature {
        name: name.to_string(),
        end,
    })
}

pub fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word)
}

/// Classifies one raw line
///
/// Comments are not stripped here; use [`classify_lines`] for a whole file.
pub fn classify(line: &str) -> LineTag {
    classify_view(line, line)
}

/// Classifies every line of a file
///
/// Lines whose code view is empty (blank lines and lines that are only
/// comment) are tagged `Blank`.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LineTag> {
    let views = code_views(lines);
    lines
        .iter()
        .zip(&views)
        .map(|(line, view)| {
            if view.trim().is_empty() {
                LineTag::Blank
            } else {
                classify_view(line.as_ref(), view)
            }
        })
        .collect()
}

fn classify_view(line: &str, view: &str) -> LineTag {
    if line.trim().is_empty() {
        return LineTag::Blank;
    }
    if SYSTEM_INCLUDE.is_match(line) {
        return LineTag::SystemInclude;
    }
    if USER_INCLUDE.is_match(line) {
        return LineTag::UserInclude;
    }
    if TYPE_DECL.is_match(view) {
        return LineTag::TypeDecl;
    }
    let view = view.trim_end();
    if GLOBAL.is_match(view) && !starts_with_statement_keyword(view) {
        return LineTag::Global;
    }
    match signature(view).map(|sig| sig.end) {
        Some(SignatureEnd::Semicolon) => LineTag::FuncDecl,
        Some(SignatureEnd::Brace | SignatureEnd::Open) => LineTag::FuncImpl,
        None => {
            let trimmed = line.trim_start();
            if trimmed.starts_with("//") || trimmed.starts_with("/*") {
                LineTag::Blank
            } else {
                LineTag::Other
            }
        }
    }
}

fn starts_with_statement_keyword(view: &str) -> bool {
    view.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find(|word| !word.is_empty())
        .is_some_and(is_statement_keyword)
}
