#![forbid(unsafe_code)]

//! Rule registry and dispatcher
//!
//! The registry holds every rule in a fixed order. Selecting rules by ID
//! yields a [`Dispatcher`] that applies them to one file at a time: check
//! rules have their diagnostics concatenated, convert rules are chained so
//! each sees the previous one's output.

use crate::error::RuleError;
use crate::rules::builtin::builtin_rules;
use crate::rules::{Conversion, Diagnostic, Limits, RuleKind, SourceFile};
use crate::types::{Mode, RuleId};

/// Registry for storing rules in registry order
pub struct RuleRegistry {
    rules: Vec<RuleKind>,
}

/// Summary of one rule ID, as shown by `cstyle list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    pub id: RuleId,
    pub description: String,
    pub check: bool,
    pub convert: bool,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry holding every built-in rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if an embedded rule definition is invalid.
    pub fn builtin(limits: &Limits) -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for rule in builtin_rules(limits)? {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Adds a rule at the end of the registry order
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` if a rule of the same kind is
    /// already registered under this ID.
    pub fn register(&mut self, rule: RuleKind) -> Result<(), RuleError> {
        let duplicate = self.rules.iter().any(|existing| {
            existing.id() == rule.id()
                && std::mem::discriminant(existing) == std::mem::discriminant(&rule)
        });
        if duplicate {
            return Err(RuleError::InvalidDefinition(format!(
                "Duplicate rule ID '{}'",
                rule.id()
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Distinct rule IDs in registry order
    pub fn ids(&self) -> Vec<RuleId> {
        let mut ids: Vec<RuleId> = Vec::new();
        for rule in &self.rules {
            if !ids.contains(rule.id()) {
                ids.push(rule.id().clone());
            }
        }
        ids
    }

    pub fn contains(&self, id: &RuleId) -> bool {
        self.rules.iter().any(|rule| rule.id() == id)
    }

    /// One entry per rule ID in registry order
    pub fn describe(&self) -> Vec<RuleInfo> {
        self.ids()
            .into_iter()
            .map(|id| {
                let mut info = RuleInfo {
                    id: id.clone(),
                    description: String::new(),
                    check: false,
                    convert: false,
                };
                for rule in self.rules.iter().filter(|rule| *rule.id() == id) {
                    if info.description.is_empty() {
                        info.description = rule.description().to_string();
                    }
                    match rule {
                        RuleKind::Check(_) => info.check = true,
                        RuleKind::Convert(_) => info.convert = true,
                    }
                }
                info
            })
            .collect()
    }

    /// Validates requested IDs without selecting anything
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Unknown` listing every requested ID that is not
    /// registered, including strings that are not valid IDs at all.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<RuleId>, RuleError> {
        if requested.is_empty() {
            return Ok(self.ids());
        }

        let mut wanted = Vec::new();
        let mut unknown = Vec::new();
        for raw in requested {
            let raw = raw.as_ref();
            match RuleId::new(raw) {
                Some(id) if self.contains(&id) => {
                    if !wanted.contains(&id) {
                        wanted.push(id);
                    }
                }
                _ => unknown.push(raw.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(RuleError::Unknown {
                ids: unknown,
                available: self.ids().iter().map(|id| id.to_string()).collect(),
            });
        }

        // Registry order, not request order
        Ok(self
            .ids()
            .into_iter()
            .filter(|id| wanted.contains(id))
            .collect())
    }

    /// Builds a dispatcher for the requested rules in the given mode
    ///
    /// An empty request selects every rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Unknown` if any requested ID is unknown; nothing
    /// is selected in that case.
    pub fn select<S: AsRef<str>>(
        &self,
        mode: Mode,
        requested: &[S],
    ) -> Result<Dispatcher<'_>, RuleError> {
        let ids = self.resolve(requested)?;
        let rules = self
            .rules
            .iter()
            .filter(|rule| ids.contains(rule.id()))
            .filter(|rule| match mode {
                Mode::Check => matches!(rule, RuleKind::Check(_)),
                Mode::Convert => matches!(rule, RuleKind::Convert(_)),
            })
            .collect();

        Ok(Dispatcher {
            rules,
            mode,
            verbose: false,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a fixed, ordered selection of rules to files
///
/// Holds no per-file state, so one dispatcher can serve many files in
/// parallel.
pub struct Dispatcher<'r> {
    rules: Vec<&'r RuleKind>,
    mode: Mode,
    verbose: bool,
}

impl<'r> Dispatcher<'r> {
    /// Reports each rule applied to each file when set
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rule_ids(&self) -> Vec<&RuleId> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Runs every selected check rule, concatenating diagnostics in rule order
    pub fn check(&self, file: &SourceFile<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            if let RuleKind::Check(rule) = rule {
                let found = rule.check(file);
                if self.verbose {
                    tracing::info!(
                        file = file.file_name,
                        rule = %rule.id(),
                        diagnostics = found.len(),
                        "applied check rule"
                    );
                }
                diagnostics.extend(found);
            }
        }
        diagnostics
    }

    /// Threads the file through every selected convert rule
    ///
    /// Each rule sees the lines and file name produced by the previous one.
    pub fn convert(&self, file: &SourceFile<'_>) -> Conversion {
        let mut lines = file.lines.to_vec();
        let mut file_name = file.file_name.to_string();
        let mut renamed = false;

        for rule in &self.rules {
            if let RuleKind::Convert(rule) = rule {
                let out = rule.convert(&SourceFile::new(&file_name, &lines));
                if self.verbose {
                    tracing::info!(
                        file = file.file_name,
                        rule = %rule.id(),
                        lines = out.lines.len(),
                        "applied convert rule"
                    );
                }
                lines = out.lines;
                if let Some(name) = out.file_name {
                    file_name = name;
                    renamed = true;
                }
            }
        }

        Conversion {
            lines,
            file_name: renamed.then_some(file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RuleRegistry {
        RuleRegistry::builtin(&Limits::default()).unwrap()
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let result = registry.register(RuleKind::Check(Box::new(
            crate::rules::comments::BlockComments::new(),
        )));
        assert!(matches!(result, Err(RuleError::InvalidDefinition(_))));
    }

    #[test]
    fn test_unknown_ids_fail_fast_and_are_all_listed() {
        let registry = registry();
        let Err(RuleError::Unknown { ids, available }) =
            registry.select(Mode::Check, &["A1", "X9", "bad id"])
        else {
            panic!("expected unknown rule error");
        };
        assert_eq!(ids, vec!["X9", "bad id"]);
        assert_eq!(available.len(), 11);
    }

    #[test]
    fn test_selection_follows_registry_order() {
        let registry = registry();
        let dispatcher = registry.select(Mode::Check, &["cl5", "A4", "CL5"]).unwrap();
        let ids: Vec<&str> = dispatcher.rule_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["A4", "CL5"]);
    }

    #[test]
    fn test_empty_request_selects_everything() {
        let registry = registry();
        let dispatcher = registry.select::<&str>(Mode::Convert, &[]).unwrap();
        assert_eq!(dispatcher.rule_ids().len(), 11);
        assert_eq!(dispatcher.mode(), Mode::Convert);
    }

    #[test]
    fn test_check_merges_diagnostics_in_rule_order() {
        let registry = registry();
        let dispatcher = registry.select(Mode::Check, &["CL5", "A1"]).unwrap();
        let src = lines(&["int x=1;", "\tint iY = 2;"]);
        let diagnostics = dispatcher.check(&SourceFile::new("Main.c", &src));
        let ids: Vec<&str> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "CL5"]);
    }

    #[test]
    fn test_convert_threads_lines_and_name() {
        let registry = registry();
        let dispatcher = registry
            .select(Mode::Convert, &["A5", "CL1", "CL5"])
            .unwrap()
            .verbose(true);
        let src = lines(&["int main() {", "    return a+b;", "}"]);
        let out = dispatcher.convert(&SourceFile::new("main.c", &src));
        assert_eq!(out.file_name.as_deref(), Some("Main.c"));
        assert_eq!(
            out.lines,
            lines(&["int main()", "{", "    return a + b;", "}"])
        );
    }

    #[test]
    fn test_describe_lists_both_kinds() {
        let info = registry().describe();
        assert_eq!(info.len(), 11);
        assert!(info.iter().all(|rule| rule.check && rule.convert));
        assert_eq!(info[0].id.as_str(), "A1");
        assert_eq!(info[0].description, "No tab characters");
    }
}
