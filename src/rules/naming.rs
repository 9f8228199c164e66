#![forbid(unsafe_code)]

//! DV1 / DV3: Hungarian identifier prefixes
//!
//! Both rules read declarations of the form
//! `<qualifiers> <type> [*] <name> [<array>] (= | ; | ,)` and compare every
//! declared name in the declarator list against the prefix required by the
//! type-prefix table. DV1 requires the base prefix only; DV3 also stacks `p`
//! for pointers and `a` for arrays in front of it.
//!
//! Conversion happens in two passes. The first collects a rename map from
//! every misnamed declaration; the second rewrites each whole identifier in
//! code segments, leaving literals, comments and `#include` lines alone. A
//! name whose declarations need different prefixes is left as it is.

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::classifier::is_statement_keyword;
use crate::syntax::prefix::{base_prefix, compose_prefix, is_qualifier, is_type_keyword};
use crate::syntax::{Lexer, SegmentKind, code_views};
use crate::types::RuleId;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<spec>[A-Za-z_]\w*(?:\s+[A-Za-z_]\w*)*)(?P<sep>\s*\*+\s*|\s+)(?P<name>[A-Za-z_]\w*)\s*(?P<array>\[[^\]]*\])?\s*[=;,]",
    )
    .expect("valid regex")
});

/// One entry of a declarator list, e.g. `*p`, `table[4]` or `n = f(a, b)`
static DECLARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<stars>\*+)?\s*(?P<name>[A-Za-z_]\w*)\s*(?P<array>\[[^\]]*\])?\s*(?:=.*)?$",
    )
    .expect("valid regex")
});

static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*include\b").expect("valid regex"));

/// Leading words that make a line a statement rather than a declaration
const NON_DECLARATION_LEADERS: &[&str] = &["delete", "throw", "using", "namespace", "new"];

/// Which prefix a declaration must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Base prefix of the type only (DV1)
    Base,
    /// Pointer and array markers stacked on the base prefix (DV3)
    Composed,
}

/// A declaration recognized on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Type words with qualifiers removed, e.g. `unsigned int`
    pub type_spelling: String,
    pub pointer: bool,
    pub array: bool,
}

/// Outcome of checking one declaration against a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Conforms,
    Misnamed { expected: String },
    UnknownType,
}

impl NamingPolicy {
    /// Prefix the declared name must start with, or None for an unknown type
    pub fn expected_prefix(self, decl: &Declaration) -> Option<String> {
        let base = base_prefix(&decl.type_spelling)?;
        Some(match self {
            NamingPolicy::Base => base.to_string(),
            NamingPolicy::Composed => compose_prefix(base, decl.pointer, decl.array),
        })
    }

    pub fn judge(self, decl: &Declaration) -> Verdict {
        let Some(expected) = self.expected_prefix(decl) else {
            return Verdict::UnknownType;
        };
        if decl.name.starts_with(&expected) {
            Verdict::Conforms
        } else {
            Verdict::Misnamed { expected }
        }
    }
}

/// Parses every declarator of the declaration on a code view
///
/// `int *p, n = f(a, b);` yields `p` and `n`, each with its own pointer and
/// array markers. Lines that are not declarations yield nothing.
pub fn declarations(view: &str) -> Vec<Declaration> {
    if view.trim_start().starts_with('#') {
        return vec![];
    }
    let Some(caps) = DECLARATION.captures(view) else {
        return vec![];
    };
    let (Some(spec), Some(sep)) = (caps.name("spec"), caps.name("sep")) else {
        return vec![];
    };

    let leader = spec.as_str().split_whitespace().next().unwrap_or_default();
    if is_statement_keyword(leader) || NON_DECLARATION_LEADERS.contains(&leader) {
        return vec![];
    }

    let type_words: Vec<&str> = spec
        .as_str()
        .split_whitespace()
        .filter(|word| !is_qualifier(word))
        .collect();
    if type_words.is_empty() {
        return vec![];
    }
    let type_spelling = type_words.join(" ");

    declarator_list(&view[sep.start()..])
        .into_iter()
        .filter_map(|part| DECLARATOR.captures(part))
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str();
            if is_reserved(name) {
                return None;
            }
            Some(Declaration {
                name: name.to_string(),
                type_spelling: type_spelling.clone(),
                pointer: caps.name("stars").is_some(),
                array: caps.name("array").is_some(),
            })
        })
        .collect()
}

/// Splits a declarator list on top-level commas, stopping at the `;`
///
/// Commas inside parentheses, brackets and initializer braces stay with
/// their declarator.
fn declarator_list(rest: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&rest[start..i]);
                start = i + 1;
            }
            b';' if depth == 0 => {
                parts.push(&rest[start..i]);
                return parts;
            }
            _ => {}
        }
    }
    parts.push(&rest[start..]);
    parts
}

fn is_reserved(word: &str) -> bool {
    is_statement_keyword(word)
        || is_type_keyword(word)
        || is_qualifier(word)
        || matches!(word, "struct" | "union" | "enum")
}

/// Original identifier to corrected identifier, first insertion wins
#[derive(Debug, Default)]
pub struct RenameMap {
    renames: HashMap<String, String>,
    targets: HashSet<String>,
}

impl RenameMap {
    /// Records a rename unless `from` is already mapped or `to` is already
    /// somebody else's target
    pub fn insert(&mut self, from: &str, to: &str) -> bool {
        if self.renames.contains_key(from) || self.targets.contains(to) {
            return false;
        }
        self.renames.insert(from.to_string(), to.to_string());
        self.targets.insert(to.to_string());
        true
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.renames.get(from).map(String::as_str)
    }

    pub fn contains(&self, from: &str) -> bool {
        self.renames.contains_key(from)
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Rewrites every whole identifier of one code segment
    fn rewrite(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut last = 0;
        for (start, end) in identifiers(code) {
            if let Some(to) = self.get(&code[start..end]) {
                out.push_str(&code[last..start]);
                out.push_str(to);
                last = end;
            }
        }
        out.push_str(&code[last..]);
        out
    }
}

/// Byte ranges of the identifiers in a code segment
///
/// Numbers are skipped whole, so the `e5` of `1e5` is never an identifier.
fn identifiers(code: &str) -> Vec<(usize, usize)> {
    let bytes = code.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && is_word(bytes[i]) {
                i += 1;
            }
            found.push((start, i));
        } else if b.is_ascii_digit() {
            while i < bytes.len() && (is_word(bytes[i]) || bytes[i] == b'.') {
                i += 1;
            }
        } else {
            i += 1;
        }
    }

    found
}

/// Capitalizes the first character and puts the prefix in front
fn prefixed_name(prefix: &str, name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Shared implementation of DV1 and DV3
#[derive(Debug, Clone)]
pub struct HungarianNaming {
    id: RuleId,
    policy: NamingPolicy,
}

impl HungarianNaming {
    /// DV1: base-prefix policy
    pub fn base() -> Self {
        Self {
            id: RuleId::from_static("DV1"),
            policy: NamingPolicy::Base,
        }
    }

    /// DV3: composed-prefix policy
    pub fn composed() -> Self {
        Self {
            id: RuleId::from_static("DV3"),
            policy: NamingPolicy::Composed,
        }
    }

    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    fn describe(&self) -> &'static str {
        match self.policy {
            NamingPolicy::Base => "Identifier starts with its type prefix",
            NamingPolicy::Composed => {
                "Identifier starts with its pointer/array markers and type prefix"
            }
        }
    }

    /// First pass: builds the rename map for a whole file
    pub fn plan_renames(&self, lines: &[String]) -> RenameMap {
        let decls: Vec<Declaration> = code_views(lines)
            .iter()
            .flat_map(|view| declarations(view))
            .collect();
        let existing = file_identifiers(lines);

        let mut required: HashMap<&str, HashSet<Option<String>>> = HashMap::new();
        for decl in &decls {
            required
                .entry(decl.name.as_str())
                .or_default()
                .insert(self.policy.expected_prefix(decl));
        }

        let mut renames = RenameMap::default();
        let mut refused: HashSet<&str> = HashSet::new();

        for decl in &decls {
            let Verdict::Misnamed { expected } = self.policy.judge(decl) else {
                continue;
            };
            if renames.contains(&decl.name) || refused.contains(decl.name.as_str()) {
                continue;
            }
            if required.get(decl.name.as_str()).is_some_and(|set| set.len() > 1) {
                tracing::warn!(
                    rule = %self.id,
                    name = %decl.name,
                    "rename refused: declarations of this name need different prefixes"
                );
                refused.insert(&decl.name);
                continue;
            }

            let target = prefixed_name(&expected, &decl.name);
            if existing.contains(&target) || !renames.insert(&decl.name, &target) {
                tracing::warn!(
                    rule = %self.id,
                    from = %decl.name,
                    to = %target,
                    "rename refused: target identifier already in use"
                );
                refused.insert(&decl.name);
                continue;
            }
            tracing::debug!(
                rule = %self.id,
                from = %decl.name,
                to = %target,
                "renaming identifier"
            );
        }

        renames
    }
}

/// Every identifier that appears in code anywhere in the file
fn file_identifiers(lines: &[String]) -> HashSet<String> {
    let mut lexer = Lexer::new();
    let mut found = HashSet::new();
    for line in lines {
        for seg in lexer.segments(line) {
            if seg.kind == SegmentKind::Code {
                for (start, end) in identifiers(seg.text) {
                    found.insert(seg.text[start..end].to_string());
                }
            }
        }
    }
    found
}

/// Second pass: applies a rename map to every line
pub fn apply_renames(lines: &[String], renames: &RenameMap) -> Vec<String> {
    if renames.is_empty() {
        return lines.to_vec();
    }

    let mut lexer = Lexer::new();
    lines
        .iter()
        .map(|line| {
            let segments = lexer.segments(line);
            if INCLUDE.is_match(line) {
                return line.clone();
            }
            segments
                .iter()
                .map(|seg| match seg.kind {
                    SegmentKind::Code => renames.rewrite(seg.text),
                    _ => seg.text.to_string(),
                })
                .collect()
        })
        .collect()
}

impl CheckRule for HungarianNaming {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        self.describe()
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (idx, view) in code_views(file.lines).iter().enumerate() {
            for decl in declarations(view) {
                let message = match self.policy.judge(&decl) {
                    Verdict::Conforms => continue,
                    Verdict::Misnamed { expected } => format!(
                        "variable '{}' should start with '{}' (type '{}')",
                        decl.name, expected, decl.type_spelling
                    ),
                    Verdict::UnknownType => format!(
                        "variable '{}' has unknown type '{}'",
                        decl.name, decl.type_spelling
                    ),
                };
                diagnostics.push(Diagnostic::new(&self.id, idx + 1, message));
            }
        }

        diagnostics
    }
}

impl ConvertRule for HungarianNaming {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        self.describe()
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let renames = self.plan_renames(file.lines);
        Conversion::lines(apply_renames(file.lines, &renames))
    }
}
