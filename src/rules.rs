#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod braces;
pub mod builtin;
pub mod comments;
pub mod headers;
pub mod lengths;
pub mod naming;
mod regex_rule;
mod registry;
mod rule;
pub mod sections;
pub mod spacing;

pub use regex_rule::RegexRule;
pub use registry::{Dispatcher, RuleInfo, RuleRegistry};
pub use rule::{CheckRule, Conversion, ConvertRule, Diagnostic, Limits, RuleKind, SourceFile};
