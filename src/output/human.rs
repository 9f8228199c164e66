#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Diagnostics are grouped under their file, in the order files were given
//! to the engine. Colors go through `termcolor`, so the same code writes to
//! a terminal or to an in-memory buffer in tests.

use crate::config::ColorOption;
use crate::engine::{ExecutionResult, FileReport, WrittenFile};
use crate::rules::RuleInfo;
use std::io::{self, IsTerminal};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human output formatter
pub struct HumanFormatter {
    choice: ColorChoice,
}

impl HumanFormatter {
    /// Creates a formatter for stdout with the given color preference
    pub fn new(color: ColorOption) -> Self {
        let choice = match color {
            ColorOption::Always => ColorChoice::Always,
            ColorOption::Never => ColorChoice::Never,
            ColorOption::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
            ColorOption::Auto => ColorChoice::Never,
        };
        Self { choice }
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.choice)
    }

    pub fn print_check(&self, result: &ExecutionResult) -> io::Result<()> {
        write_check(&mut self.stdout(), result)
    }

    pub fn print_rules(&self, rules: &[RuleInfo]) -> io::Result<()> {
        write_rules(&mut self.stdout(), rules)
    }

    pub fn print_converted(&self, written: &[WrittenFile]) -> io::Result<()> {
        write_converted(&mut self.stdout(), written)
    }
}

/// Writes check results grouped by file, followed by a one-line summary
pub fn write_check<W: WriteColor>(out: &mut W, result: &ExecutionResult) -> io::Result<()> {
    for report in &result.reports {
        write_file_report(out, report)?;
    }

    let files_with_findings = result
        .reports
        .iter()
        .filter(|r| !r.diagnostics.is_empty())
        .count();

    if !result.reports.iter().all(|r| r.diagnostics.is_empty() && r.note.is_none()) {
        writeln!(out)?;
    }
    let total = result.total_diagnostics();
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(
        out,
        "Checked {} file(s) with {} rule(s): ",
        result.files_checked, result.rules_executed
    )?;
    if total == 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "no diagnostics")?;
    } else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(
            out,
            "{} diagnostic(s) in {} file(s)",
            total, files_with_findings
        )?;
    }
    out.reset()?;
    let notes = result.total_notes();
    if notes > 0 {
        write!(out, ", {} file(s) skipped", notes)?;
    }
    writeln!(out)
}

fn write_file_report<W: WriteColor>(out: &mut W, report: &FileReport) -> io::Result<()> {
    if report.diagnostics.is_empty() && report.note.is_none() {
        return Ok(());
    }

    write_path(out, &report.path)?;

    if let Some(note) = &report.note {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "  note")?;
        out.reset()?;
        writeln!(out, ": {}", note)?;
    }

    for diagnostic in &report.diagnostics {
        if diagnostic.is_file_level() {
            write!(out, "  {:>5}  ", "file")?;
        } else {
            write!(out, "  {:>5}  ", diagnostic.line)?;
        }
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(out, "{:<4}", diagnostic.rule_id.as_str())?;
        out.reset()?;
        writeln!(out, " {}", diagnostic.message)?;
    }
    Ok(())
}

fn write_path<W: WriteColor>(out: &mut W, path: &Path) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true).set_underline(true))?;
    write!(out, "{}", path.display())?;
    out.reset()?;
    writeln!(out)
}

/// Writes one row per rule: ID, modes and description
pub fn write_rules<W: WriteColor>(out: &mut W, rules: &[RuleInfo]) -> io::Result<()> {
    if rules.is_empty() {
        return writeln!(out, "No rules are registered.");
    }

    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{:<6}{:<15}DESCRIPTION", "ID", "MODES")?;
    out.reset()?;

    for rule in rules {
        let modes = match (rule.check, rule.convert) {
            (true, true) => "check, convert",
            (true, false) => "check",
            (false, true) => "convert",
            (false, false) => "-",
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<6}", rule.id.as_str())?;
        out.reset()?;
        writeln!(out, "{:<15}{}", modes, rule.description)?;
    }
    Ok(())
}

/// Writes where each converted file went, and which files were skipped
pub fn write_converted<W: WriteColor>(out: &mut W, written: &[WrittenFile]) -> io::Result<()> {
    let mut converted = 0;
    for file in written {
        match &file.outcome {
            Ok(target) => {
                converted += 1;
                writeln!(out, "{} -> {}", file.source.display(), target.display())?;
            }
            Err(note) => {
                write!(out, "{} ", file.source.display())?;
                out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(out, "skipped")?;
                out.reset()?;
                writeln!(out, ": {}", note)?;
            }
        }
    }
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "Converted {} of {} file(s)", converted, written.len())?;
    out.reset()?;
    writeln!(out)
}
