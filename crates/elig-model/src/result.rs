use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one rule for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// The patient clears the rule: an inclusion comparison holds, or an
    /// exclusion comparison does not.
    Passed,
    /// The patient does not clear the rule, or the comparison could not be
    /// made on the data's types.
    Failed,
    /// The profile field the rule tests is unknown.
    Missing,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Passed => "passed",
            RuleStatus::Failed => "failed",
            RuleStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub status: RuleStatus,
}

impl RuleResult {
    pub fn new(rule_id: impl Into<String>, status: RuleStatus) -> Self {
        Self {
            rule_id: rule_id.into(),
            status,
        }
    }
}

/// Aggregate eligibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "included")]
    Included,
    #[serde(rename = "excluded")]
    Excluded,
    #[serde(rename = "not enough information")]
    NotEnoughInformation,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Included => "included",
            OverallStatus::Excluded => "excluded",
            OverallStatus::NotEnoughInformation => "not enough information",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-rule and aggregate verdict for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub patient_id: String,
    /// One entry per protocol rule, in protocol order.
    pub rule_results: Vec<RuleResult>,
    pub overall_status: OverallStatus,
}

impl EvaluationResult {
    /// Status recorded for `rule_id`, if the rule was part of the evaluation.
    pub fn status_of(&self, rule_id: &str) -> Option<RuleStatus> {
        self.rule_results
            .iter()
            .find(|result| result.rule_id == rule_id)
            .map(|result| result.status)
    }

    pub fn count(&self, status: RuleStatus) -> usize {
        self.rule_results
            .iter()
            .filter(|result| result.status == status)
            .count()
    }

    /// Ids of rules that could not be evaluated, in protocol order.
    pub fn missing_rule_ids(&self) -> Vec<&str> {
        self.ids_with(RuleStatus::Missing)
    }

    /// Ids of rules whose comparison failed, in protocol order.
    pub fn failed_rule_ids(&self) -> Vec<&str> {
        self.ids_with(RuleStatus::Failed)
    }

    fn ids_with(&self, status: RuleStatus) -> Vec<&str> {
        self.rule_results
            .iter()
            .filter(|result| result.status == status)
            .map(|result| result.rule_id.as_str())
            .collect()
    }
}
