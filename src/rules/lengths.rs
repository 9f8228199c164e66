#![forbid(unsafe_code)]

//! A6 (function length) and A7 (file length)

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, Limits, SourceFile};
use crate::syntax::scan_functions;
use crate::types::{Language, RuleId};

pub const SPLIT_MARKER: &str = "// Function split due to length";

#[derive(Debug, Clone)]
pub struct FunctionLength {
    id: RuleId,
    min: usize,
    max: usize,
}

impl FunctionLength {
    pub fn new(limits: &Limits) -> Self {
        Self {
            id: RuleId::from_static("A6"),
            min: limits.function_min,
            max: limits.function_max,
        }
    }
}

impl CheckRule for FunctionLength {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Function length within limits"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        scan_functions(file.lines)
            .into_iter()
            .filter(|record| !(self.min..=self.max).contains(&record.line_count()))
            .map(|record| {
                Diagnostic::new(
                    &self.id,
                    record.start_line,
                    format!(
                        "function '{}' has {} lines (allowed {}-{})",
                        record.name,
                        record.line_count(),
                        self.min,
                        self.max
                    ),
                )
            })
            .collect()
    }
}

impl ConvertRule for FunctionLength {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Function length within limits"
    }

    /// Marks the point where an over-long function should be split
    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let mut lines = file.lines.to_vec();

        for record in scan_functions(file.lines).iter().rev() {
            if record.line_count() <= self.max {
                continue;
            }
            // 0-indexed position right after the function's max-th line
            let at = record.start_line - 1 + self.max;
            if lines[at].trim() == SPLIT_MARKER {
                continue;
            }
            let indent_len = lines[at - 1].len() - lines[at - 1].trim_start().len();
            let marker = format!("{}{}", &lines[at - 1][..indent_len], SPLIT_MARKER);
            tracing::debug!(
                rule = %self.id,
                function = %record.name,
                line = at + 1,
                "marking split point"
            );
            lines.insert(at, marker);
        }

        Conversion::lines(lines)
    }
}

#[derive(Debug, Clone)]
pub struct FileLength {
    id: RuleId,
    min: usize,
    max: usize,
}

impl FileLength {
    pub fn new(limits: &Limits) -> Self {
        Self {
            id: RuleId::from_static("A7"),
            min: limits.file_min,
            max: limits.file_max,
        }
    }
}

impl CheckRule for FileLength {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "C file length within limits"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let count = file.lines.len();
        if file.language() != Some(Language::C) || (self.min..=self.max).contains(&count) {
            return vec![];
        }
        vec![Diagnostic::file_level(
            &self.id,
            format!("file has {} lines (allowed {}-{})", count, self.min, self.max),
        )]
    }
}

impl ConvertRule for FileLength {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "C file length within limits"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        if file.language() != Some(Language::C) {
            return Conversion::unchanged(file);
        }

        let mut lines = file.lines.to_vec();
        if lines.len() < self.min {
            lines.resize(self.min, String::new());
        } else if lines.len() > self.max {
            tracing::warn!(
                rule = %self.id,
                file = file.file_name,
                dropped = lines.len() - self.max,
                "truncating file to {} lines",
                self.max
            );
            lines.truncate(self.max);
        }
        Conversion::lines(lines)
    }
}
