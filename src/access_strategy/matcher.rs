//! Attribute value matching
//!
//! Rule values are treated as regular expressions when all of them compile,
//! joined into a single alternation `(r1)|(r2)|...`. A value matches when the
//! pattern is found anywhere inside it. If any rule value is not a valid
//! pattern the whole rule set is compared by exact, case-sensitive equality.
//! An empty rule set compiles to the empty pattern, which is found in every
//! value. Case folding follows Unicode simple case folding.

use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Compiled matcher for the value rules of one attribute
#[derive(Debug, Clone)]
pub struct AttributeMatcher {
    rule: ValueRule,
}

#[derive(Debug, Clone)]
enum ValueRule {
    /// Alternation of every rule value
    Pattern(Regex),
    /// At least one rule value is not a valid pattern
    Exact(HashSet<String>),
}

impl AttributeMatcher {
    /// Compile a matcher for the given rule values
    pub fn new(rule_values: &BTreeSet<String>, case_insensitive: bool) -> Self {
        let rule = match concatenate(rule_values, case_insensitive) {
            Some(regex) => ValueRule::Pattern(regex),
            None => {
                trace!(
                    values = ?rule_values,
                    "Rule values are not all valid patterns, using exact matching"
                );
                ValueRule::Exact(rule_values.iter().cloned().collect())
            }
        };

        Self { rule }
    }

    /// Check if any available value satisfies the rule
    pub fn matches(&self, available: &HashSet<&str>) -> bool {
        self.find_match(available).is_some()
    }

    /// Return one of the available values that satisfies the rule
    pub fn find_match<'a>(&self, available: &HashSet<&'a str>) -> Option<&'a str> {
        match &self.rule {
            ValueRule::Pattern(regex) => available.iter().copied().find(|v| regex.is_match(v)),
            ValueRule::Exact(values) => available.iter().copied().find(|v| values.contains(*v)),
        }
    }

    /// Whether the rule values are evaluated as a regular expression
    #[cfg(test)]
    pub(crate) fn is_pattern(&self) -> bool {
        matches!(self.rule, ValueRule::Pattern(_))
    }
}

/// Build `(r1)|(r2)|...|(rn)`, or `None` if any value fails to compile.
fn concatenate(rule_values: &BTreeSet<String>, case_insensitive: bool) -> Option<Regex> {
    if rule_values.iter().any(|value| Regex::new(value).is_err()) {
        return None;
    }

    let alternation = rule_values
        .iter()
        .map(|value| format!("({})", value))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&alternation)
        .case_insensitive(case_insensitive)
        .build()
        .ok()
}
