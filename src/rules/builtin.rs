#![forbid(unsafe_code)]

//! Built-in rules
//!
//! Line-pattern rules are embedded at compile time using `include_str!`, so
//! the binary runs without external rule files. The remaining rules are
//! constructed directly. The returned order is the registry order.

use crate::error::RuleError;
use crate::rules::braces::BracePlacement;
use crate::rules::comments::BlockComments;
use crate::rules::headers::{FileNameCase, HeaderGuard};
use crate::rules::lengths::{FileLength, FunctionLength};
use crate::rules::naming::HungarianNaming;
use crate::rules::sections::SectionOrder;
use crate::rules::spacing::OperatorSpacing;
use crate::rules::{CheckRule, ConvertRule, Limits, RegexRule, RuleKind};

/// IDs of every built-in rule, in registry order
pub const BUILTIN_IDS: &[&str] = &[
    "A1", "A4", "A5", "A6", "A7", "A8", "CL1", "CL5", "DV1", "DV3", "P1",
];

/// Embedded line-pattern rule files
const BUILTIN_REGEX_RULES: &[(&str, &str)] = &[(
    "no-tabs",
    include_str!("../../builtin-rules/no-tabs.toml"),
)];

/// Builds every built-in rule, check and convert variants side by side
///
/// # Errors
///
/// Returns `RuleError` if an embedded rule definition does not parse. That
/// would be a packaging bug, but it is reported rather than panicking.
pub fn builtin_rules(limits: &Limits) -> Result<Vec<RuleKind>, RuleError> {
    let mut rules = Vec::new();

    for (name, content) in BUILTIN_REGEX_RULES {
        let rule = RegexRule::from_toml(content).map_err(|e| {
            RuleError::InvalidDefinition(format!("built-in rule '{}': {}", name, e))
        })?;
        let rule = rule.with_replacement(" ".repeat(limits.tab_width));
        push_both(&mut rules, rule);
    }

    push_both(&mut rules, BlockComments::new());
    push_both(&mut rules, FileNameCase::new());
    push_both(&mut rules, FunctionLength::new(limits));
    push_both(&mut rules, FileLength::new(limits));
    push_both(&mut rules, SectionOrder::new());
    push_both(&mut rules, BracePlacement::new());
    push_both(&mut rules, OperatorSpacing::new());
    push_both(&mut rules, HungarianNaming::base());
    push_both(&mut rules, HungarianNaming::composed());
    push_both(&mut rules, HeaderGuard::new());

    Ok(rules)
}

fn push_both<R>(rules: &mut Vec<RuleKind>, rule: R)
where
    R: CheckRule + ConvertRule + Clone + 'static,
{
    rules.push(RuleKind::Check(Box::new(rule.clone())));
    rules.push(RuleKind::Convert(Box::new(rule)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_load() {
        let rules = builtin_rules(&Limits::default()).unwrap();
        assert_eq!(rules.len(), 22);
    }

    #[test]
    fn test_builtin_order() {
        let rules = builtin_rules(&Limits::default()).unwrap();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id().as_str()).collect();
        ids.dedup();
        assert_eq!(ids, BUILTIN_IDS);
    }

    #[test]
    fn test_every_rule_has_check_and_convert() {
        let rules = builtin_rules(&Limits::default()).unwrap();
        for pair in rules.chunks(2) {
            assert!(matches!(pair[0], RuleKind::Check(_)));
            assert!(matches!(pair[1], RuleKind::Convert(_)));
            assert_eq!(pair[0].id(), pair[1].id());
        }
    }

    #[test]
    fn test_tab_width_feeds_tab_rule() {
        let rules = builtin_rules(&Limits {
            tab_width: 2,
            ..Limits::default()
        })
        .unwrap();
        let RuleKind::Convert(tabs) = &rules[1] else {
            panic!("expected convert variant");
        };
        let src = vec!["\tx;".to_string()];
        let out = tabs.convert(&crate::rules::SourceFile::new("Main.c", &src));
        assert_eq!(out.lines, vec!["  x;"]);
    }
}
