//! Joining evaluation results with rule metadata for presentation.

use elig_model::{
    EvaluationResult, FieldValue, PatientProfile, ProfileField, Protocol, RuleKind, RuleStatus,
};
use serde::Serialize;

/// One rule's result, with what is needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub field: ProfileField,
    /// Rule description, or a rendering of its comparison.
    pub label: String,
    pub status: RuleStatus,
    /// Profile value the rule was tested against, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<FieldValue>,
}

/// Rule-by-rule breakdown of `result`, in result order.
///
/// Results whose rule id is not part of `protocol` are skipped.
pub fn explain(
    result: &EvaluationResult,
    protocol: &Protocol,
    profile: &PatientProfile,
) -> Vec<RuleOutcome> {
    result
        .rule_results
        .iter()
        .filter_map(|rule_result| {
            let rule = protocol.rule(&rule_result.rule_id)?;
            Some(RuleOutcome {
                rule_id: rule.id.clone(),
                kind: rule.kind,
                field: rule.field,
                label: rule.label(),
                status: rule_result.status,
                observed: profile.value(rule.field),
            })
        })
        .collect()
}

/// Fields whose absence kept the verdict undecided, in first-missing order.
pub fn missing_fields(result: &EvaluationResult, protocol: &Protocol) -> Vec<ProfileField> {
    let mut fields = Vec::new();
    for rule_result in &result.rule_results {
        if rule_result.status != RuleStatus::Missing {
            continue;
        }
        let Some(description) = protocol.describe(&rule_result.rule_id) else {
            continue;
        };
        if !fields.contains(&description.field) {
            fields.push(description.field);
        }
    }
    fields
}
