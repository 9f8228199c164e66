#![forbid(unsafe_code)]

//! Line-oriented lexical segmenter
//!
//! Splits each line into code, literal and comment segments. The only state
//! carried from one line to the next is whether a block comment is still
//! open; string and character literals end at end of line.

/// Lexical category of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    Str,
    Char,
    LineComment,
    /// Part of a block comment. `opens` is set when the `/*` delimiter is on
    /// this line, `closes` when the `*/` delimiter is.
    BlockComment {
        opens: bool,
        closes: bool,
    },
}

impl SegmentKind {
    pub fn is_block_comment(self) -> bool {
        matches!(self, SegmentKind::BlockComment { .. })
    }
}

/// A contiguous slice of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    /// Byte offset of the segment within its line
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LexState {
    #[default]
    Code,
    BlockComment,
}

/// Segmenter carrying block-comment state across lines
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    state: LexState,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the previous line ended inside an unterminated block comment
    pub fn in_block_comment(&self) -> bool {
        self.state == LexState::BlockComment
    }

    /// Splits one line into segments, advancing the carried state
    ///
    /// The concatenation of the returned segment texts is always `line`.
    pub fn segments<'a>(&mut self, line: &'a str) -> Vec<Segment<'a>> {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut out = Vec::new();
        let mut i = 0;

        if self.state == LexState::BlockComment {
            match find_comment_close(bytes, 0) {
                Some(end) => {
                    out.push(segment(line, 0, end, block(false, true)));
                    self.state = LexState::Code;
                    i = end;
                }
                None => {
                    if len > 0 {
                        out.push(segment(line, 0, len, block(false, false)));
                    }
                    return out;
                }
            }
        }

        let mut code_start = i;
        while i < len {
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    push_code(&mut out, line, code_start, i);
                    out.push(segment(line, i, len, SegmentKind::LineComment));
                    return out;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    push_code(&mut out, line, code_start, i);
                    match find_comment_close(bytes, i + 2) {
                        Some(end) => {
                            out.push(segment(line, i, end, block(true, true)));
                            i = end;
                            code_start = end;
                        }
                        None => {
                            out.push(segment(line, i, len, block(true, false)));
                            self.state = LexState::BlockComment;
                            return out;
                        }
                    }
                }
                quote @ (b'"' | b'\'') => {
                    push_code(&mut out, line, code_start, i);
                    let end = literal_end(bytes, i, quote);
                    let kind = if quote == b'"' {
                        SegmentKind::Str
                    } else {
                        SegmentKind::Char
                    };
                    out.push(segment(line, i, end, kind));
                    i = end;
                    code_start = end;
                }
                _ => i += 1,
            }
        }

        push_code(&mut out, line, code_start, len);
        out
    }

    /// Renders the code view of one line, advancing the carried state
    ///
    /// Comments become spaces and literal contents become `_`, keeping the
    /// quotes. Every byte offset of the view matches the original line.
    pub fn code_view(&mut self, line: &str) -> String {
        let mut view = String::with_capacity(line.len());
        for seg in self.segments(line) {
            match seg.kind {
                SegmentKind::Code => view.push_str(seg.text),
                SegmentKind::Str | SegmentKind::Char => {
                    for (idx, c) in seg.text.char_indices() {
                        let is_quote = c == '"' || c == '\'';
                        let is_edge = idx == 0 || idx + c.len_utf8() == seg.text.len();
                        if is_quote && is_edge {
                            view.push(c);
                        } else {
                            pad(&mut view, c.len_utf8(), '_');
                        }
                    }
                }
                SegmentKind::LineComment | SegmentKind::BlockComment { .. } => {
                    pad(&mut view, seg.text.len(), ' ');
                }
            }
        }
        view
    }
}

/// Code views of a whole file, computed with one carried lexer
pub fn code_views<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut lexer = Lexer::new();
    lines
        .iter()
        .map(|line| lexer.code_view(line.as_ref()))
        .collect()
}

fn block(opens: bool, closes: bool) -> SegmentKind {
    SegmentKind::BlockComment { opens, closes }
}

fn segment(line: &str, start: usize, end: usize, kind: SegmentKind) -> Segment<'_> {
    Segment {
        kind,
        start,
        text: &line[start..end],
    }
}

fn push_code<'a>(out: &mut Vec<Segment<'a>>, line: &'a str, start: usize, end: usize) {
    if end > start {
        out.push(segment(line, start, end, SegmentKind::Code));
    }
}

fn pad(view: &mut String, count: usize, fill: char) {
    for _ in 0..count {
        view.push(fill);
    }
}

/// Byte offset just past the `*/` at or after `from`
fn find_comment_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j + 1 < bytes.len() {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return Some(j + 2);
        }
        j += 1;
    }
    None
}

/// Byte offset just past the closing quote, or end of line if unterminated
fn literal_end(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<SegmentKind> {
        Lexer::new().segments(line).iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_plain_code_is_one_segment() {
        assert_eq!(kinds("int x = 5;"), vec![SegmentKind::Code]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_segments_reassemble_line() {
        let line = r#"printf("a=%d /* no */", x); /* yes */ y = 'c'; // tail"#;
        let joined: String = Lexer::new()
            .segments(line)
            .iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_comment_markers_inside_string_are_code() {
        assert_eq!(
            kinds(r#"s = "/* not a comment */";"#),
            vec![SegmentKind::Code, SegmentKind::Str, SegmentKind::Code]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let segs = Lexer::new().segments(r#"s = "a\"b"; t"#);
        assert_eq!(segs[1].kind, SegmentKind::Str);
        assert_eq!(segs[1].text, r#""a\"b""#);
        assert_eq!(segs[2].text, "; t");
    }

    #[test]
    fn test_block_comment_state_carries_across_lines() {
        let mut lexer = Lexer::new();
        let first = lexer.segments("int a; /* start");
        assert_eq!(first[1].kind, block(true, false));
        assert!(lexer.in_block_comment());

        let middle = lexer.segments(" * middle");
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].kind, block(false, false));

        let last = lexer.segments(" end */ int b;");
        assert_eq!(last[0].kind, block(false, true));
        assert_eq!(last[1].kind, SegmentKind::Code);
        assert!(!lexer.in_block_comment());
    }

    #[test]
    fn test_code_view_preserves_offsets() {
        let line = r#"x="é=" + y; // c=d"#;
        let view = Lexer::new().code_view(line);
        assert_eq!(view.len(), line.len());
        assert!(view.starts_with("x=\"___\" + y;"));
        assert!(!view.contains("c=d"));
    }

    #[test]
    fn test_code_views_blank_out_multiline_comment() {
        let views = code_views(&["/* a = b", "c = d */ e = f;"]);
        assert_eq!(views[0].trim(), "");
        assert_eq!(views[1].trim(), "e = f;");
    }

    #[test]
    fn test_unterminated_string_runs_to_end_of_line() {
        let segs = Lexer::new().segments("s = \"open");
        assert_eq!(segs.last().unwrap().kind, SegmentKind::Str);
        assert_eq!(segs.last().unwrap().text, "\"open");
    }
}
