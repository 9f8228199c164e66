#![forbid(unsafe_code)]

//! Syntactic building blocks shared by the rules
//!
//! Everything here is line- or regex-oriented: there is no preprocessor and
//! no syntax tree.

pub mod classifier;
pub mod functions;
pub mod lexer;
pub mod prefix;

pub use classifier::{Signature, SignatureEnd, classify, classify_lines, signature};
pub use functions::{FunctionRecord, scan_functions};
pub use lexer::{Lexer, Segment, SegmentKind, code_views};
