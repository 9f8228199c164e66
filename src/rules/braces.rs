#![forbid(unsafe_code)]

//! CL1: opening braces on their own line

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::code_views;
use crate::types::RuleId;

const INDENT_STEP: usize = 4;

#[derive(Debug, Clone)]
pub struct BracePlacement {
    id: RuleId,
}

impl BracePlacement {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("CL1"),
        }
    }
}

impl Default for BracePlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for BracePlacement {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Opening brace on its own line"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        code_views(file.lines)
            .iter()
            .enumerate()
            .flat_map(|(idx, view)| {
                block_braces(view).into_iter().map(move |_| {
                    Diagnostic::new(
                        &self.id,
                        idx + 1,
                        "opening brace should be on its own line",
                    )
                })
            })
            .collect()
    }
}

impl ConvertRule for BracePlacement {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Opening brace on its own line"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let views = code_views(file.lines);
        let mut out = Vec::with_capacity(file.lines.len());

        for (line, view) in file.lines.iter().zip(&views) {
            let braces = block_braces(view);
            if braces.is_empty() {
                out.push(line.clone());
            } else {
                out.extend(split_at_braces(line, &braces));
            }
        }

        Conversion::lines(out)
    }
}

/// Byte offsets of block-opening braces that share their line with code
///
/// A brace whose previous non-space character is one of `= , { ( [ ? :`
/// opens an initializer or compound literal and is left alone.
fn block_braces(view: &str) -> Vec<usize> {
    let bytes = view.as_bytes();
    let mut braces = Vec::new();
    let mut prev: Option<u8> = None;

    for (idx, &b) in bytes.iter().enumerate() {
        if b == b'{'
            && let Some(p) = prev
            && !matches!(p, b'=' | b',' | b'{' | b'(' | b'[' | b'?' | b':')
        {
            braces.push(idx);
        }
        if !b.is_ascii_whitespace() {
            prev = Some(b);
        }
    }

    braces
}

/// Splits a line so each brace at `braces` gets a line of its own
///
/// Code between braces is indented one step deeper than the brace before it.
fn split_at_braces(line: &str, braces: &[usize]) -> Vec<String> {
    let indent = &line[..line.len() - line.trim_start().len()];
    let mut out = vec![line[..braces[0]].trim_end().to_string()];

    for (k, &at) in braces.iter().enumerate() {
        out.push(format!("{}{}{{", indent, " ".repeat(INDENT_STEP * k)));
        let end = braces.get(k + 1).copied().unwrap_or(line.len());
        let piece = line[at + 1..end].trim();
        if !piece.is_empty() {
            out.push(format!("{}{}{}", indent, " ".repeat(INDENT_STEP * (k + 1)), piece));
        }
    }

    out
}
