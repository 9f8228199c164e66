#![forbid(unsafe_code)]

//! A4: block comments
//!
//! Check mode reports every line on which a block comment opens. Convert
//! mode folds each block comment, however many lines it spans, into a single
//! `//` comment attached to the code that surrounded it.

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::{Lexer, SegmentKind};
use crate::types::RuleId;

#[derive(Debug, Clone)]
pub struct BlockComments {
    id: RuleId,
}

impl BlockComments {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("A4"),
        }
    }
}

impl Default for BlockComments {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for BlockComments {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "No block comments"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let mut lexer = Lexer::new();
        let mut diagnostics = Vec::new();

        for (idx, line) in file.lines.iter().enumerate() {
            let opens = lexer.segments(line).iter().any(|seg| {
                matches!(seg.kind, SegmentKind::BlockComment { opens: true, .. })
            });
            if opens {
                diagnostics.push(Diagnostic::new(
                    &self.id,
                    idx + 1,
                    "block comment found; use '//' comments",
                ));
            }
        }

        diagnostics
    }
}

impl ConvertRule for BlockComments {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "No block comments"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let mut lexer = Lexer::new();
        let mut out = Vec::with_capacity(file.lines.len());
        let mut folded = FoldedLine::default();

        for line in file.lines {
            let segments = lexer.segments(line);
            let has_block = segments.iter().any(|seg| seg.kind.is_block_comment());
            if !has_block && folded.is_empty() {
                out.push(line.clone());
                continue;
            }

            for seg in &segments {
                match seg.kind {
                    SegmentKind::Code | SegmentKind::Str | SegmentKind::Char => {
                        folded.push_code(seg.text)
                    }
                    SegmentKind::LineComment => {
                        folded.push_comment(seg.text.trim_start_matches('/'))
                    }
                    SegmentKind::BlockComment { opens, closes } => {
                        folded.push_comment(block_comment_text(seg.text, opens, closes))
                    }
                }
            }

            if !lexer.in_block_comment() {
                out.push(std::mem::take(&mut folded).render());
            }
        }

        // Unterminated block comment at end of file
        if !folded.is_empty() {
            out.push(folded.render());
        }

        Conversion::lines(out)
    }
}

/// Code and comment text gathered from the lines of one folded comment
#[derive(Debug, Default)]
struct FoldedLine {
    code: String,
    comment: Vec<String>,
    touched: bool,
}

impl FoldedLine {
    fn is_empty(&self) -> bool {
        !self.touched
    }

    fn push_code(&mut self, text: &str) {
        self.touched = true;
        if self.code.trim().is_empty() {
            self.code.push_str(text);
        } else if !text.trim().is_empty() {
            self.code.truncate(self.code.trim_end().len());
            self.code.push(' ');
            self.code.push_str(text.trim_start());
        }
    }

    fn push_comment(&mut self, text: &str) {
        self.touched = true;
        let text = text.trim();
        if !text.is_empty() {
            self.comment.push(text.to_string());
        }
    }

    fn render(self) -> String {
        let code = self.code.trim_end();
        if self.comment.is_empty() {
            return code.to_string();
        }
        let text = self.comment.join(" ");
        if code.trim().is_empty() {
            format!("{}// {}", code, text)
        } else {
            format!("{} // {}", code, text)
        }
    }
}

/// Strips delimiters and decorative stars from a block comment piece
fn block_comment_text(text: &str, opens: bool, closes: bool) -> &str {
    let mut text = text;
    if opens {
        text = text.strip_prefix("/*").unwrap_or(text);
    }
    if closes {
        text = text.strip_suffix("*/").unwrap_or(text);
    }
    text.trim().trim_matches('*').trim()
}
