#![forbid(unsafe_code)]

//! Regex-based line rule
//!
//! A `RegexRule` is defined in TOML and matched against each line of a
//! file. In check mode every matching line yields one diagnostic; in convert
//! mode every match is replaced by the rule's fix text.

use crate::error::RuleError;
use crate::rules::{CheckRule, Conversion, ConvertRule, Diagnostic, SourceFile};
use crate::types::{Language, RuleId};
use regex::Regex;
use serde::Deserialize;

/// TOML structure for regex rule definitions
#[derive(Debug, Deserialize)]
struct RegexRuleDefinition {
    rule: RuleSection,
    #[serde(rename = "match")]
    match_section: MatchSection,
    #[serde(default)]
    fix: Option<FixSection>,
}

#[derive(Debug, Deserialize)]
struct RuleSection {
    id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct MatchSection {
    pattern: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    languages: Option<Vec<Language>>,
}

#[derive(Debug, Deserialize)]
struct FixSection {
    replacement: String,
}

/// A rule that matches each line against a regular expression
#[derive(Clone)]
pub struct RegexRule {
    id: RuleId,
    description: String,
    message: String,
    pattern: Regex,
    languages: Vec<Language>,
    replacement: Option<String>,
}

impl std::fmt::Debug for RegexRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexRule")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("pattern", &self.pattern.as_str())
            .field("languages", &self.languages)
            .field("replacement", &self.replacement)
            .finish()
    }
}

impl RegexRule {
    /// Parse a RegexRule from TOML content
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` if the TOML is malformed, a
    /// required field is missing or the rule ID is invalid, and
    /// `RuleError::InvalidRegex` if the pattern does not compile.
    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let def: RegexRuleDefinition = toml::from_str(content)
            .map_err(|e| RuleError::InvalidDefinition(format!("Failed to parse TOML: {}", e)))?;

        let id = RuleId::new(def.rule.id.clone()).ok_or_else(|| {
            RuleError::InvalidDefinition(format!("Invalid rule ID: {}", def.rule.id))
        })?;

        let pattern = Regex::new(&def.match_section.pattern).map_err(|e| {
            RuleError::InvalidRegex(format!(
                "Failed to compile pattern '{}': {}",
                def.match_section.pattern, e
            ))
        })?;

        let message = def
            .match_section
            .message
            .unwrap_or_else(|| def.rule.description.clone());

        Ok(RegexRule {
            id,
            description: def.rule.description,
            message,
            pattern,
            languages: def.match_section.languages.unwrap_or_default(),
            replacement: def.fix.map(|fix| fix.replacement),
        })
    }

    /// Replaces the fix text, e.g. to honor a configured tab width
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Empty `languages` means every language
    fn applies_to(&self, file: &SourceFile<'_>) -> bool {
        self.languages.is_empty()
            || file
                .language()
                .is_some_and(|language| self.languages.contains(&language))
    }
}

impl CheckRule for RegexRule {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        if !self.applies_to(file) {
            return vec![];
        }

        file.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.pattern.is_match(line))
            .map(|(idx, _)| Diagnostic::new(&self.id, idx + 1, self.message.clone()))
            .collect()
    }
}

impl ConvertRule for RegexRule {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let replacement = match &self.replacement {
            Some(replacement) if self.applies_to(file) => replacement,
            _ => return Conversion::unchanged(file),
        };

        Conversion::lines(
            file.lines
                .iter()
                .map(|line| {
                    self.pattern
                        .replace_all(line, regex::NoExpand(replacement))
                        .into_owned()
                })
                .collect(),
        )
    }
}
