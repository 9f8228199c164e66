#![forbid(unsafe_code)]

//! Function boundary scanner
//!
//! A two-state machine over the code views of a file. While seeking, a line
//! that carries a function signature opens a body if an opening brace shows
//! up on it or within [`BRACE_LOOKAHEAD`] following lines. Inside a body,
//! each line moves the brace depth by its opens minus closes, and the body
//! ends when the depth returns to zero. A parameter list may continue over
//! up to [`BRACE_LOOKAHEAD`] lines before its closing `)`.
//!
//! Nested functions are not supported: there is a single depth counter.

use crate::syntax::classifier::{SignatureEnd, signature};
use crate::syntax::lexer::code_views;

/// How many lines after a signature may hold its opening brace
pub const BRACE_LOOKAHEAD: usize = 3;

/// A function body found by the scanner (1-indexed, inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl FunctionRecord {
    /// Length in lines, signature and closing brace included
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// True if `line` (1-indexed) lies after the signature line and within the body
    pub fn contains_body_line(&self, line: usize) -> bool {
        line > self.start_line && line <= self.end_line
    }
}

#[derive(Debug)]
enum ScanState {
    Seeking,
    InBody {
        name: String,
        start: usize,
        depth: i64,
    },
}

/// Scans a file and returns its function bodies in line order
///
/// A body whose closing brace never arrives produces no record.
pub fn scan_functions<S: AsRef<str>>(lines: &[S]) -> Vec<FunctionRecord> {
    let views = code_views(lines);
    let mut records = Vec::new();
    let mut state = ScanState::Seeking;
    let mut idx = 0;

    while idx < views.len() {
        match state {
            ScanState::Seeking => {
                if let Some((name, brace_idx)) = opening_brace_line(&views, idx) {
                    state = ScanState::InBody {
                        name,
                        start: idx,
                        depth: 0,
                    };
                    idx = brace_idx;
                    continue;
                }
            }
            ScanState::InBody {
                ref name,
                start,
                ref mut depth,
            } => {
                let (opens, closes) = brace_counts(&views[idx]);
                *depth += opens - closes;
                if *depth <= 0 {
                    records.push(FunctionRecord {
                        name: name.clone(),
                        start_line: start + 1,
                        end_line: idx + 1,
                    });
                    state = ScanState::Seeking;
                }
            }
        }
        idx += 1;
    }

    records
}

/// If `views[idx]` is a signature whose brace arrives in time, returns the
/// function name and the index of the line holding the brace
fn opening_brace_line(views: &[String], idx: usize) -> Option<(String, usize)> {
    let (joined, close_idx) = joined_signature(views, idx)?;
    let sig = signature(&joined)?;
    match sig.end {
        SignatureEnd::Semicolon => None,
        SignatureEnd::Brace => Some((sig.name, close_idx)),
        SignatureEnd::Open => {
            let last = (close_idx + BRACE_LOOKAHEAD).min(views.len().saturating_sub(1));
            for (offset, view) in views[close_idx + 1..=last].iter().enumerate() {
                if view.contains('{') {
                    return Some((sig.name, close_idx + 1 + offset));
                }
                if view.contains(';') {
                    return None;
                }
            }
            None
        }
    }
}

/// Joins `views[idx]` with the lines that complete its parameter list
///
/// Returns the joined text and the index of the line holding the closing
/// `)`, or None if the list stays open past the look-ahead window.
fn joined_signature(views: &[String], idx: usize) -> Option<(String, usize)> {
    let mut joined = views[idx].clone();
    let mut end = idx;
    while open_parens(&joined) > 0 {
        end += 1;
        if end >= views.len() || end - idx > BRACE_LOOKAHEAD {
            return None;
        }
        joined.push(' ');
        joined.push_str(views[end].trim());
    }
    Some((joined, end))
}

fn open_parens(view: &str) -> i64 {
    view.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

fn brace_counts(view: &str) -> (i64, i64) {
    view.chars().fold((0, 0), |(opens, closes), c| match c {
        '{' => (opens + 1, closes),
        '}' => (opens, closes + 1),
        _ => (opens, closes),
    })
}
