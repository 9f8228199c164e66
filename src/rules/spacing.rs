#![forbid(unsafe_code)]

//! CL5: spaces around binary operators
//!
//! Lines are read through their code view, so operators inside literals and
//! comments never reach the tokenizer. Preprocessor lines are skipped. A `+`,
//! `-` or `*` in unary position is not a binary operator, and neither is a
//! `*` that belongs to a pointer declarator or cast. An operator right after
//! a cast such as `(int)-x` is unary.
//!
//! Parenthesized groups are expressions unless they are the parameter list of
//! a declared function or the header of a `for` loop, so `if (a*b > c)` and
//! `f(x, a*b)` are checked while `Node *make(Node *a, Node *b)` is not.

use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::syntax::prefix::{is_qualifier, is_type_keyword};
use crate::syntax::code_views;
use crate::types::RuleId;

/// Operators recognized by the tokenizer, longest first
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "->", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "<<", ">>", "::", "=", "+", "-", "*", "/", "%", "<", ">", "!", "&",
    "|", "^", "~", "?", ":",
];

/// Operators that must be surrounded by spaces
const CHECKED: &[&str] = &["==", "!=", "<=", ">=", "=", "+", "-", "*", "/", "&&", "||"];

/// Words after which `+`, `-` and `*` are unary
const UNARY_AFTER: &[&str] = &["return", "case", "sizeof"];

/// Words that are followed by an expression rather than a declarator
const EXPRESSION_KEYWORDS: &[&str] = &[
    "if", "while", "switch", "return", "sizeof", "case", "else", "do", "goto",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier, number or literal
    Word(&'a str),
    Op(&'a str),
    Punct(u8),
}

#[derive(Debug, Clone, Copy)]
struct Spanned<'a> {
    token: Token<'a>,
    start: usize,
    end: usize,
}

/// A checked operator missing a space on at least one side
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hit {
    op: String,
    start: usize,
    end: usize,
    before: bool,
    after: bool,
}

#[derive(Debug, Clone)]
pub struct OperatorSpacing {
    id: RuleId,
}

impl OperatorSpacing {
    pub fn new() -> Self {
        Self {
            id: RuleId::from_static("CL5"),
        }
    }
}

impl Default for OperatorSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRule for OperatorSpacing {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Spaces around binary operators"
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (idx, view) in code_views(file.lines).iter().enumerate() {
            for hit in unspaced_operators(view) {
                diagnostics.push(Diagnostic::new(
                    &self.id,
                    idx + 1,
                    format!("missing spaces around operator '{}'", hit.op),
                ));
            }
        }
        diagnostics
    }
}

impl ConvertRule for OperatorSpacing {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        "Spaces around binary operators"
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let views = code_views(file.lines);
        let lines = file
            .lines
            .iter()
            .zip(&views)
            .map(|(line, view)| {
                let mut fixed = line.clone();
                for hit in unspaced_operators(view).iter().rev() {
                    if hit.after {
                        fixed.insert(hit.end, ' ');
                    }
                    if hit.before {
                        fixed.insert(hit.start, ' ');
                    }
                }
                fixed
            })
            .collect();
        Conversion::lines(lines)
    }
}

fn unspaced_operators(view: &str) -> Vec<Hit> {
    if view.trim_start().starts_with('#') {
        return vec![];
    }

    let bytes = view.as_bytes();
    let tokens = tokenize(view);
    let mut hits = Vec::new();

    for (i, spanned) in tokens.iter().enumerate() {
        let Token::Op(op) = spanned.token else {
            continue;
        };
        if !CHECKED.contains(&op) {
            continue;
        }
        if matches!(op, "+" | "-" | "*") && is_unary(&tokens, i) {
            continue;
        }
        if op == "*" && is_pointer_declarator(&tokens, i, bytes) {
            continue;
        }
        if matches!(op, "+" | "-") && is_exponent_sign(&tokens, i) {
            continue;
        }

        let before = spanned.start > 0 && !bytes[spanned.start - 1].is_ascii_whitespace();
        let after = spanned.end < bytes.len() && !bytes[spanned.end].is_ascii_whitespace();
        if before || after {
            hits.push(Hit {
                op: op.to_string(),
                start: spanned.start,
                end: spanned.end,
                before,
                after,
            });
        }
    }

    hits
}

fn tokenize(view: &str) -> Vec<Spanned<'_>> {
    let bytes = view.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let start = i;

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let token = if is_word_byte(b) {
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            Token::Word(&view[start..i])
        } else if b == b'"' || b == b'\'' {
            i += 1;
            while i < bytes.len() && bytes[i] != b {
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            Token::Word(&view[start..i])
        } else if let Some(&op) = OPERATORS.iter().find(|op| view[i..].starts_with(**op)) {
            i += op.len();
            Token::Op(op)
        } else {
            i += 1;
            Token::Punct(b)
        };

        tokens.push(Spanned {
            token,
            start,
            end: i,
        });
    }

    tokens
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b >= 0x80
}

/// True if the operator at `i` has no left operand
fn is_unary(tokens: &[Spanned<'_>], i: usize) -> bool {
    match i.checked_sub(1).map(|p| tokens[p].token) {
        None => true,
        Some(Token::Op(_)) => true,
        Some(Token::Punct(b')')) => closes_cast(tokens, i - 1),
        Some(Token::Punct(p)) => p != b']',
        Some(Token::Word(w)) => UNARY_AFTER.contains(&w),
    }
}

/// Index of the `(` matching the `)` at `close`
fn matching_open(tokens: &[Spanned<'_>], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for j in (0..close).rev() {
        match tokens[j].token {
            Token::Punct(b')') => depth += 1,
            Token::Punct(b'(') if depth == 0 => return Some(j),
            Token::Punct(b'(') => depth -= 1,
            _ => {}
        }
    }
    None
}

/// True if the `)` at `close` ends a cast such as `(int)` or `(struct Node *)`
fn closes_cast(tokens: &[Spanned<'_>], close: usize) -> bool {
    let Some(open) = matching_open(tokens, close) else {
        return false;
    };
    // `sizeof(int)*n` and `f(x)-1` are operands, not casts
    if let Some(Token::Word(w)) = open.checked_sub(1).map(|p| tokens[p].token) {
        if !EXPRESSION_KEYWORDS.contains(&w) || w == "sizeof" {
            return false;
        }
    }

    let inner = &tokens[open + 1..close];
    let mut saw_type = false;
    let mut after_tag = false;
    for spanned in inner {
        match spanned.token {
            Token::Word(_) if after_tag => {
                saw_type = true;
                after_tag = false;
            }
            Token::Word(w) if matches!(w, "struct" | "union" | "enum") => after_tag = true,
            Token::Word(w) if is_type_keyword(w) || w.ends_with("_t") => saw_type = true,
            Token::Word(w) if is_qualifier(w) => {}
            Token::Op("*") => {}
            _ => return false,
        }
    }
    saw_type && !after_tag
}

/// True for the `*` of `int *p`, `FILE *fp`, `char **argv` or `(char *)`
fn is_pointer_declarator(tokens: &[Spanned<'_>], i: usize, bytes: &[u8]) -> bool {
    let next = bytes[tokens[i].end..]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .copied();
    if matches!(next, Some(b')' | b'*' | b',' | b'>')) {
        return true;
    }

    let Some(Token::Word(word)) = i.checked_sub(1).map(|p| tokens[p].token) else {
        return false;
    };
    if is_type_keyword(word) || word.ends_with("_t") {
        return true;
    }

    // The word before the `*` starts a declaration
    match i.checked_sub(2).map(|p| tokens[p].token) {
        None => true,
        Some(Token::Punct(b'(')) => opens_declarations(tokens, i - 2),
        Some(Token::Punct(b',')) => match enclosing_open(tokens, i - 2) {
            Enclosing::Paren(open) => opens_declarations(tokens, open),
            Enclosing::TopLevel => true,
            Enclosing::Initializer => false,
        },
        Some(Token::Punct(p)) => matches!(p, b';' | b'{' | b'}'),
        Some(Token::Word(w)) => is_declaration_leader(w),
        Some(Token::Op(_)) => false,
    }
}

fn is_declaration_leader(word: &str) -> bool {
    is_qualifier(word) || is_type_keyword(word) || matches!(word, "struct" | "union" | "enum")
}

/// What a comma belongs to
enum Enclosing {
    Paren(usize),
    /// A declarator list such as `int a, *b;`
    TopLevel,
    /// Brace or bracket contents
    Initializer,
}

fn enclosing_open(tokens: &[Spanned<'_>], comma: usize) -> Enclosing {
    let mut depth = 0usize;
    for j in (0..comma).rev() {
        match tokens[j].token {
            Token::Punct(b')' | b']' | b'}') => depth += 1,
            Token::Punct(b'(') if depth == 0 => return Enclosing::Paren(j),
            Token::Punct(b'[' | b'{') if depth == 0 => return Enclosing::Initializer,
            Token::Punct(b'(' | b'[' | b'{') => depth -= 1,
            Token::Punct(b';') if depth == 0 => return Enclosing::TopLevel,
            _ => {}
        }
    }
    Enclosing::TopLevel
}

/// True if the `(` at `open` starts a parameter list or a `for` header
///
/// A parameter list follows the name of a declared function: `int f(`,
/// `static Node make(` or `char *name(`. A call or a control condition
/// holds expressions.
fn opens_declarations(tokens: &[Spanned<'_>], open: usize) -> bool {
    let word_at = |k: Option<usize>| match k.map(|k| tokens[k].token) {
        Some(Token::Word(w)) => Some(w),
        _ => None,
    };

    let Some(name) = word_at(open.checked_sub(1)) else {
        return false;
    };
    if name == "for" {
        return true;
    }
    if EXPRESSION_KEYWORDS.contains(&name) {
        return false;
    }

    let mut before = open - 1;
    if matches!(before.checked_sub(1).map(|k| tokens[k].token), Some(Token::Op("*"))) {
        before -= 1;
    }
    match word_at(before.checked_sub(1)) {
        Some(w) if EXPRESSION_KEYWORDS.contains(&w) || UNARY_AFTER.contains(&w) => false,
        Some(w) => {
            is_declaration_leader(w) || w.ends_with("_t") || starts_statement(tokens, before - 1)
        }
        None => false,
    }
}

/// True if the token at `k` is the first of a statement
fn starts_statement(tokens: &[Spanned<'_>], k: usize) -> bool {
    match k.checked_sub(1).map(|p| tokens[p].token) {
        None => true,
        Some(Token::Punct(p)) => matches!(p, b';' | b'{' | b'}'),
        Some(Token::Word(w)) => is_qualifier(w),
        Some(Token::Op(_)) => false,
    }
}

/// True for the sign of a float exponent such as `1e-5`
fn is_exponent_sign(tokens: &[Spanned<'_>], i: usize) -> bool {
    let Some(prev) = i.checked_sub(1).map(|p| tokens[p]) else {
        return false;
    };
    match prev.token {
        Token::Word(w) => {
            prev.end == tokens[i].start
                && w.starts_with(|c: char| c.is_ascii_digit())
                && !w.starts_with("0x")
                && !w.starts_with("0X")
                && (w.ends_with('e') || w.ends_with('E'))
        }
        _ => false,
    }
}
