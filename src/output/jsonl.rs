#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! One JSON object per line, in a deterministic order:
//! 1. Diagnostic and note records, file by file in input order
//! 2. One summary record

use crate::engine::ExecutionResult;
use crate::rules::RuleInfo;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Formats check results as JSONL
    pub fn format(&self, result: &ExecutionResult) -> String {
        let mut output = String::new();

        for report in &result.reports {
            if let Some(note) = &report.note {
                push_record(
                    &mut output,
                    &NoteRecord {
                        record_type: "note",
                        file: &report.path,
                        message: note.to_string(),
                    },
                );
            }
            for diagnostic in &report.diagnostics {
                push_record(
                    &mut output,
                    &DiagnosticRecord {
                        record_type: "diagnostic",
                        rule: diagnostic.rule_id.as_str(),
                        file: &report.path,
                        line: diagnostic.line,
                        message: &diagnostic.message,
                    },
                );
            }
        }

        push_record(
            &mut output,
            &SummaryRecord {
                record_type: "summary",
                files_checked: result.files_checked,
                rules_executed: result.rules_executed,
                diagnostics: result.total_diagnostics(),
                notes: result.total_notes(),
                passed: !result.has_findings(),
            },
        );

        output
    }

    /// Formats the rule table as JSONL, one record per rule
    pub fn format_rules(&self, rules: &[RuleInfo]) -> String {
        let mut output = String::new();
        for rule in rules {
            push_record(
                &mut output,
                &RuleRecord {
                    record_type: "rule",
                    id: rule.id.as_str(),
                    description: &rule.description,
                    check: rule.check,
                    convert: rule.convert,
                },
            );
        }
        output
    }

    pub fn print_check(&self, result: &ExecutionResult) -> io::Result<()> {
        io::stdout().lock().write_all(self.format(result).as_bytes())
    }

    pub fn print_rules(&self, rules: &[RuleInfo]) -> io::Result<()> {
        io::stdout().lock().write_all(self.format_rules(rules).as_bytes())
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct DiagnosticRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    file: &'a Path,
    /// 0 for findings about the whole file
    line: u32,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct NoteRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    file: &'a Path,
    message: String,
}

#[derive(Debug, Serialize)]
struct SummaryRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    files_checked: usize,
    rules_executed: usize,
    diagnostics: usize,
    notes: usize,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    id: &'a str,
    description: &'a str,
    check: bool,
    convert: bool,
}
