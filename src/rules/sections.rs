#![forbid(unsafe_code)]

//! A8: canonical section order
//!
//! Lines inside function bodies never open a section, so a prototype or a
//! `#define` in a body does not count. A header guard's `#define` is not a
//! type declaration either.

use crate::rules::headers::find_guard;
use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::{FunctionRecord, classify_lines, scan_functions};
use crate::types::{LineTag, RuleId};

/// Section tags of a file, with body and guard lines demoted to `Other`
fn section_tags(lines: &[String]) -> (Vec<LineTag>, Vec<FunctionRecord>) {
    let mut tags = classify_lines(lines);
    let records = scan_functions(lines);

    for record in &records {
        tags[record.start_line - 1] = LineTag::FuncImpl;
        for line in record.start_line + 1..=record.end_line {
            tags[line - 1] = LineTag::Other;
        }
    }
    if let Some(guard) = find_guard(lines) {
        tags[guard.define_idx] = LineTag::Other;
    }

    (tags, records)
}

/// Distinct sections in first-seen order, each with its first line (1-indexed)
pub fn section_trace(lines: &[String]) -> Vec<(LineTag, usize)> {
    let (tags, _) = section_tags(lines);
    let mut trace: Vec<(LineTag, usize)> = Vec::new();
    for (idx, tag) in tags.into_iter().enumerate() {
        if tag.is_section() && !trace.iter().any(|(seen, _)| *seen == tag) {
            trace.push((tag, idx + 1));
        }
    }
    trace
}

/// For each out-of-order section, the highest-ranked section seen before it
fn inversions(trace: &[(LineTag, usize)]) -> Vec<(LineTag, usize, LineTag)> {
    let mut found = Vec::new();
    let mut highest: Option<LineTag> = None;

    for &(tag, line) in trace {
        match highest {
            Some(prev) if prev.section_rank() > tag.section_rank() => {
                found.push((tag, line, prev));
            }
            _ => highest = Some(tag),
        }
    }

    found
}

#[derive(Debug, Clone)]
pub struct SectionOrder {
    id: RuleId,
}

impl SectionOrder {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("A8"),
        }
    }
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for SectionOrder {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Canonical section order with main implemented first"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = inversions(&section_trace(file.lines))
            .into_iter()
            .map(|(tag, line, prev)| {
                Diagnostic::new(
                    &self.id,
                    line,
                    format!("section '{}' appears after '{}'", tag, prev),
                )
            })
            .collect();

        let records = scan_functions(file.lines);
        if let Some(main_idx) = records.iter().position(|record| record.name == "main") {
            for record in &records[..main_idx] {
                diagnostics.push(Diagnostic::new(
                    &self.id,
                    record.start_line,
                    format!("function '{}' is implemented before 'main'", record.name),
                ));
            }
        }

        diagnostics.sort_by_key(|d| d.line);
        diagnostics
    }
}

impl ConvertRule for SectionOrder {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Canonical section order with main implemented first"
    }

    /// Regroups lines by section
    ///
    /// Lines that are not a section start follow the section they come after.
    /// Anything before the first section stays at the top.
    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let (tags, _) = section_tags(file.lines);
        let mut preamble = Vec::new();
        let mut buckets: [Vec<String>; 6] = Default::default();
        let mut current: Option<usize> = None;

        for (line, tag) in file.lines.iter().zip(tags) {
            if let Some(rank) = tag.section_rank() {
                current = Some(rank);
            }
            match current {
                Some(rank) => buckets[rank].push(line.clone()),
                None => preamble.push(line.clone()),
            }
        }

        let mut lines = preamble;
        for bucket in buckets {
            lines.extend(bucket);
        }
        Conversion::lines(lines)
    }
}
