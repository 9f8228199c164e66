#![forbid(unsafe_code)]

//! A5 (file name case) and P1 (header guards)

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::code_views;
use crate::types::{Language, RuleId};
use regex::Regex;
use std::sync::LazyLock;

static IFNDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*ifndef\s+(\w+)\s*$").expect("valid regex"));

static DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+(\w+)\s*$").expect("valid regex"));

/// The `#ifndef NAME` / `#define NAME` pair opening a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// 0-indexed line of the `#ifndef`
    pub ifndef_idx: usize,
    /// 0-indexed line of the `#define`
    pub define_idx: usize,
    pub ifndef_name: String,
    pub define_name: String,
}

/// Finds a guard formed by the first two code lines of a file
pub fn find_guard(lines: &[String]) -> Option<Guard> {
    let views = code_views(lines);
    let mut code_lines = views
        .iter()
        .enumerate()
        .filter(|(_, view)| !view.trim().is_empty());

    let (ifndef_idx, first) = code_lines.next()?;
    let ifndef_name = IFNDEF.captures(first)?.get(1)?.as_str().to_string();
    let (define_idx, second) = code_lines.next()?;
    let define_name = DEFINE.captures(second)?.get(1)?.as_str().to_string();

    Some(Guard {
        ifndef_idx,
        define_idx,
        ifndef_name,
        define_name,
    })
}

/// Guard macro derived from a file name: `util.h` becomes `UTIL_H`
pub fn guard_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// File name with its first character upper-cased
pub fn capitalized(file_name: &str) -> String {
    let mut chars = file_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct FileNameCase {
    id: RuleId,
}

impl FileNameCase {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("A5"),
        }
    }
}

impl Default for FileNameCase {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for FileNameCase {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "File name starts with an uppercase letter"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        if file.file_name.starts_with(char::is_lowercase) {
            vec![Diagnostic::file_level(
                &self.id,
                format!(
                    "file name '{}' should start with an uppercase letter",
                    file.file_name
                ),
            )]
        } else {
            vec![]
        }
    }
}

impl ConvertRule for FileNameCase {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "File name starts with an uppercase letter"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let renamed = capitalized(file.file_name);
        Conversion {
            lines: file.lines.to_vec(),
            file_name: (renamed != file.file_name).then_some(renamed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeaderGuard {
    id: RuleId,
}

impl HeaderGuard {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("P1"),
        }
    }
}

impl Default for HeaderGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for HeaderGuard {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Header guard matches the file name"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        if file.language() != Some(Language::Header) {
            return vec![];
        }

        let expected = guard_name(file.file_name);
        let Some(guard) = find_guard(file.lines) else {
            return vec![Diagnostic::file_level(
                &self.id,
                format!("missing header guard '{}'", expected),
            )];
        };

        [
            (guard.ifndef_idx, &guard.ifndef_name, "#ifndef"),
            (guard.define_idx, &guard.define_name, "#define"),
        ]
        .into_iter()
        .filter(|(_, name, _)| **name != expected)
        .map(|(idx, name, directive)| {
            Diagnostic::new(
                &self.id,
                idx + 1,
                format!("{} '{}' should be '{}'", directive, name, expected),
            )
        })
        .collect()
    }
}

impl ConvertRule for HeaderGuard {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Header guard matches the file name"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        if file.language() != Some(Language::Header) {
            return Conversion::unchanged(file);
        }

        let expected = guard_name(file.file_name);
        let mut lines = file.lines.to_vec();

        match find_guard(file.lines) {
            Some(guard) => {
                lines[guard.ifndef_idx] = format!("#ifndef {}", expected);
                lines[guard.define_idx] = format!("#define {}", expected);
            }
            None => {
                let mut guarded = vec![
                    format!("#ifndef {}", expected),
                    format!("#define {}", expected),
                    String::new(),
                ];
                guarded.append(&mut lines);
                guarded.push(String::new());
                guarded.push(format!("#endif // {}", expected));
                lines = guarded;
            }
        }

        Conversion::lines(lines)
    }
}
