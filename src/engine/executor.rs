#![forbid(unsafe_code)]

//! Parallel execution engine for running rules across files
//!
//! Files are independent: each is read, split into lines and handed to the
//! dispatcher on its own rayon task. Results come back in input order. A
//! file that cannot be decoded or read produces a note instead of
//! diagnostics, and the run carries on.

use crate::engine::file_walker::FileEntry;
use crate::error::StyleError;
use crate::rules::{Conversion, Diagnostic, Dispatcher, SourceFile};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a file produced no rule output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNote {
    /// File content is not valid UTF-8
    EncodingError,
    /// File could not be read
    ReadError(String),
}

impl std::fmt::Display for FileNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileNote::EncodingError => write!(f, "encoding error - unable to process"),
            FileNote::ReadError(reason) => write!(f, "read error: {}", reason),
        }
    }
}

/// Check-mode outcome for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub note: Option<FileNote>,
}

/// Convert-mode outcome for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub path: PathBuf,
    /// Path relative to the walked root, used to mirror the output tree
    pub relative: PathBuf,
    pub outcome: Result<Conversion, FileNote>,
}

impl ConvertReport {
    /// Where the converted file goes under `out_dir`
    ///
    /// Mirrors the relative path, swapping in the renamed file name if a
    /// rule suggested one. None if the file could not be converted.
    pub fn target(&self, out_dir: &Path) -> Option<PathBuf> {
        let conversion = self.outcome.as_ref().ok()?;
        let mut target = out_dir.join(&self.relative);
        if let Some(name) = &conversion.file_name {
            target.set_file_name(name);
        }
        Some(target)
    }
}

/// Where a converted file was written, or why it was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub source: PathBuf,
    pub outcome: Result<PathBuf, FileNote>,
}

/// Result of running check rules over a set of files
#[derive(Debug)]
pub struct ExecutionResult {
    /// One report per file, in input order
    pub reports: Vec<FileReport>,
    pub files_checked: usize,
    pub rules_executed: usize,
}

impl ExecutionResult {
    pub fn total_diagnostics(&self) -> usize {
        self.reports.iter().map(|r| r.diagnostics.len()).sum()
    }

    pub fn total_notes(&self) -> usize {
        self.reports.iter().filter(|r| r.note.is_some()).count()
    }

    /// True if any file produced a diagnostic
    pub fn has_findings(&self) -> bool {
        self.reports.iter().any(|r| !r.diagnostics.is_empty())
    }
}

/// Execution engine that runs a dispatcher over files in parallel
pub struct ExecutionEngine<'r> {
    dispatcher: Dispatcher<'r>,
}

impl<'r> ExecutionEngine<'r> {
    pub fn new(dispatcher: Dispatcher<'r>) -> Self {
        Self { dispatcher }
    }

    /// Runs the selected check rules against every file
    pub fn check(&self, files: &[FileEntry]) -> ExecutionResult {
        let reports = files
            .par_iter()
            .map(|file| self.check_file(file))
            .collect();

        ExecutionResult {
            reports,
            files_checked: files.len(),
            rules_executed: self.dispatcher.rule_ids().len(),
        }
    }

    /// Runs the selected convert rules against every file
    pub fn convert(&self, files: &[FileEntry]) -> Vec<ConvertReport> {
        files
            .par_iter()
            .map(|file| ConvertReport {
                path: file.path.clone(),
                relative: file.relative.clone(),
                outcome: read_lines(&file.path).map_err(into_note).map(|lines| {
                    let name = file.file_name();
                    self.dispatcher.convert(&SourceFile::new(&name, &lines))
                }),
            })
            .collect()
    }

    fn check_file(&self, file: &FileEntry) -> FileReport {
        match read_lines(&file.path) {
            Ok(lines) => {
                let name = file.file_name();
                FileReport {
                    path: file.path.clone(),
                    diagnostics: self.dispatcher.check(&SourceFile::new(&name, &lines)),
                    note: None,
                }
            }
            Err(e) => FileReport {
                path: file.path.clone(),
                diagnostics: vec![],
                note: Some(into_note(e)),
            },
        }
    }
}

/// Reads a file as lines without terminators
///
/// # Errors
///
/// Returns `StyleError::Encoding` if the content is not UTF-8 and
/// `StyleError::Io` if the file cannot be read.
pub fn read_lines(path: &Path) -> Result<Vec<String>, StyleError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| StyleError::Encoding {
        file: path.to_path_buf(),
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Writes every successful conversion under `out_dir`
///
/// # Errors
///
/// Returns `StyleError::Io` on the first file that cannot be written.
pub fn write_conversions(
    reports: Vec<ConvertReport>,
    out_dir: &Path,
) -> Result<Vec<WrittenFile>, StyleError> {
    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        let target = report.target(out_dir);
        let outcome = match (report.outcome, target) {
            (Ok(conversion), Some(target)) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, join_lines(&conversion.lines))?;
                tracing::debug!(
                    source = %report.path.display(),
                    target = %target.display(),
                    "wrote converted file"
                );
                Ok(target)
            }
            (Err(note), _) => Err(note),
            (Ok(_), None) => continue,
        };
        written.push(WrittenFile {
            source: report.path,
            outcome,
        });
    }
    Ok(written)
}

fn join_lines(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    if !lines.is_empty() {
        content.push('\n');
    }
    content
}

fn into_note(error: StyleError) -> FileNote {
    match error {
        StyleError::Encoding { file } => {
            tracing::warn!(file = %file.display(), "skipping file with invalid encoding");
            FileNote::EncodingError
        }
        other => {
            tracing::warn!("skipping unreadable file: {}", other);
            FileNote::ReadError(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Limits, RuleRegistry};
    use crate::types::Mode;
    use tempfile::TempDir;

    fn entry(dir: &TempDir, name: &str, bytes: &[u8]) -> FileEntry {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        FileEntry::new(path, PathBuf::from(name)).unwrap()
    }

    #[test]
    fn test_check_reports_in_input_order() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            entry(&dir, "A.c", b"int x=1;\n"),
            entry(&dir, "B.c", b"int iY = 2;\n"),
        ];
        let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
        let engine = ExecutionEngine::new(registry.select(Mode::Check, &["CL5"]).unwrap());

        let result = engine.check(&files);
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.rules_executed, 1);
        assert_eq!(result.reports[0].diagnostics.len(), 1);
        assert!(result.reports[1].diagnostics.is_empty());
        assert!(result.has_findings());
    }

    #[test]
    fn test_encoding_error_becomes_note() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            entry(&dir, "Bad.c", &[0x69, 0x6e, 0x74, 0xff, 0xfe, 0x0a]),
            entry(&dir, "Good.c", b"int x=1;\n"),
        ];
        let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
        let engine = ExecutionEngine::new(registry.select(Mode::Check, &["CL5"]).unwrap());

        let result = engine.check(&files);
        assert_eq!(result.reports[0].note, Some(FileNote::EncodingError));
        assert!(result.reports[0].diagnostics.is_empty());
        assert_eq!(result.reports[1].diagnostics.len(), 1);
        assert_eq!(result.total_notes(), 1);
    }

    #[test]
    fn test_convert_outcomes() {
        let dir = TempDir::new().unwrap();
        let files = vec![entry(&dir, "main.c", b"int main() {\n    return 0;\n}\n")];
        let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
        let engine =
            ExecutionEngine::new(registry.select(Mode::Convert, &["A5", "CL1"]).unwrap());

        let reports = engine.convert(&files);
        let conversion = reports[0].outcome.as_ref().unwrap();
        assert_eq!(conversion.file_name.as_deref(), Some("Main.c"));
        assert_eq!(conversion.lines[0], "int main()");
        assert_eq!(reports[0].relative, PathBuf::from("main.c"));
    }

    #[test]
    fn test_write_conversions_mirrors_tree() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir(input.path().join("lib")).unwrap();
        let path = input.path().join("lib/util.c");
        fs::write(&path, "int x=1;\n").unwrap();
        let files = vec![FileEntry::new(path, PathBuf::from("lib/util.c")).unwrap()];

        let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
        let engine =
            ExecutionEngine::new(registry.select(Mode::Convert, &["A5", "CL5"]).unwrap());
        let written = write_conversions(engine.convert(&files), out.path()).unwrap();

        let target = out.path().join("lib/Util.c");
        assert_eq!(written[0].outcome, Ok(target.clone()));
        assert_eq!(fs::read_to_string(target).unwrap(), "int x = 1;\n");
    }

    #[test]
    fn test_write_conversions_keeps_notes() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let files = vec![entry(&dir, "Bad.c", &[0xff, 0x0a])];
        let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
        let engine = ExecutionEngine::new(registry.select(Mode::Convert, &["A1"]).unwrap());

        let written = write_conversions(engine.convert(&files), out.path()).unwrap();
        assert_eq!(written[0].outcome, Err(FileNote::EncodingError));
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_read_lines_strips_terminators() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Crlf.c");
        fs::write(&path, "a\r\nb\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["a", "b"]);
    }
}
