//! Ordered, validated rule sets.

use std::collections::HashMap;

use crate::error::{ModelError, Result};
use crate::field::ProfileField;
use crate::rule::{RawRule, Rule, RuleKind};

/// Field and display text of a rule, for explaining results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescription<'a> {
    pub field: ProfileField,
    pub description: Option<&'a str>,
}

/// Inclusion/exclusion criteria of one trial.
///
/// Rule order is preserved into every evaluation result. A protocol is
/// read-only once built and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Protocol {
    rules: Vec<Rule>,
    /// Rule id to index in `rules`.
    index: HashMap<String, usize>,
}

impl Protocol {
    /// Validate raw rules in order, stopping at the first configuration error.
    pub fn new<I>(raw_rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawRule>,
    {
        let rules = raw_rules
            .into_iter()
            .enumerate()
            .map(|(position, raw)| Rule::from_raw(raw, position))
            .collect::<Result<Vec<_>>>()?;
        Self::from_rules(rules)
    }

    /// Build from already-resolved rules, checking id uniqueness.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        for (position, rule) in rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(ModelError::EmptyRuleId { position });
            }
            if index.insert(rule.id.clone(), position).is_some() {
                return Err(ModelError::DuplicateRuleId {
                    rule_id: rule.id.clone(),
                });
            }
        }
        Ok(Self { rules, index })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule by id.
    pub fn rule(&self, rule_id: &str) -> Option<&Rule> {
        self.index.get(rule_id).map(|&idx| &self.rules[idx])
    }

    /// Field and description of a rule, for presentation.
    pub fn describe(&self, rule_id: &str) -> Option<RuleDescription<'_>> {
        self.rule(rule_id).map(|rule| RuleDescription {
            field: rule.field,
            description: rule.description.as_deref(),
        })
    }

    pub fn kind_of(&self, rule_id: &str) -> Option<RuleKind> {
        self.rule(rule_id).map(|rule| rule.kind)
    }
}

impl<'a> IntoIterator for &'a Protocol {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_rules() -> Vec<RawRule> {
        vec![
            RawRule::new("R1", "inclusion", "lvef", "<=", 40.0).with_description("LVEF <= 40%"),
            RawRule::new("R2", "exclusion", "type1_diabetes", "==", true),
            RawRule::new("R3", "inclusion", "lvef", ">", 10.0),
        ]
    }

    #[test]
    fn preserves_order_and_indexes_ids() {
        let protocol = Protocol::new(raw_rules()).unwrap();
        let ids: Vec<&str> = protocol.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3"]);
        assert_eq!(protocol.kind_of("R2"), Some(RuleKind::Exclusion));
        let described = protocol.describe("R1").unwrap();
        assert_eq!(described.field, ProfileField::Lvef);
        assert_eq!(described.description, Some("LVEF <= 40%"));
        assert!(protocol.describe("R4").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut rules = raw_rules();
        rules.push(RawRule::new("R1", "inclusion", "egfr", ">=", 30.0));
        let err = Protocol::new(rules).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateRuleId {
                rule_id: "R1".to_string()
            }
        );
    }

    #[test]
    fn rejects_unsupported_operator_before_use() {
        let mut rules = raw_rules();
        rules.insert(1, RawRule::new("R9", "inclusion", "egfr", "≥", 30.0));
        assert!(matches!(
            Protocol::new(rules),
            Err(ModelError::UnsupportedOperator { .. })
        ));
    }
}
