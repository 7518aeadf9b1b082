//! Rule evaluation and verdict aggregation.

use elig_model::{
    EvaluationResult, OverallStatus, PatientProfile, Protocol, Rule, RuleKind, RuleResult,
    RuleStatus,
};

use crate::compare::{Comparison, apply};

/// Status of one rule for one profile.
///
/// An inclusion rule passes when its comparison holds. An exclusion rule
/// passes when its comparison does not hold. Incomparable data fails either way.
pub fn evaluate_rule(profile: &PatientProfile, rule: &Rule) -> RuleStatus {
    let Some(value) = profile.value(rule.field) else {
        return RuleStatus::Missing;
    };
    match (apply(&value, rule.operator, &rule.value), rule.kind) {
        (Comparison::Incomparable, _) => {
            tracing::debug!(
                rule_id = %rule.id,
                field = %rule.field,
                value_type = value.type_name(),
                threshold_type = rule.value.type_name(),
                "incomparable operands, rule failed"
            );
            RuleStatus::Failed
        }
        (Comparison::Holds, RuleKind::Inclusion)
        | (Comparison::DoesNotHold, RuleKind::Exclusion) => RuleStatus::Passed,
        (Comparison::DoesNotHold, RuleKind::Inclusion)
        | (Comparison::Holds, RuleKind::Exclusion) => RuleStatus::Failed,
    }
}

/// Overall verdict from per-rule statuses.
///
/// Any missing rule makes the verdict indeterminate, whatever else failed.
pub fn aggregate<'a, I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = &'a RuleStatus>,
{
    let mut any_failed = false;
    for status in statuses {
        match status {
            RuleStatus::Missing => return OverallStatus::NotEnoughInformation,
            RuleStatus::Failed => any_failed = true,
            RuleStatus::Passed => {}
        }
    }
    if any_failed {
        OverallStatus::Excluded
    } else {
        OverallStatus::Included
    }
}

/// Evaluate `profile` against every rule of `protocol`, in protocol order.
pub fn evaluate(profile: &PatientProfile, protocol: &Protocol) -> EvaluationResult {
    let rule_results: Vec<RuleResult> = protocol
        .iter()
        .map(|rule| RuleResult::new(rule.id.clone(), evaluate_rule(profile, rule)))
        .collect();
    let overall_status = aggregate(rule_results.iter().map(|result| &result.status));

    tracing::debug!(
        patient_id = %profile.patient_id,
        rules = rule_results.len(),
        overall = %overall_status,
        "evaluated patient"
    );

    EvaluationResult {
        patient_id: profile.patient_id.clone(),
        rule_results,
        overall_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elig_model::RawRule;

    fn protocol(rules: Vec<RawRule>) -> Protocol {
        Protocol::new(rules).expect("valid protocol")
    }

    fn lvef_rule() -> RawRule {
        RawRule::new("R1", "inclusion", "lvef", "<=", 40.0)
    }

    #[test]
    fn inclusion_rule_passes() {
        let profile = PatientProfile {
            lvef: Some(35.0),
            ..PatientProfile::new("P1")
        };
        let result = evaluate(&profile, &protocol(vec![lvef_rule()]));
        assert_eq!(result.rule_results, vec![RuleResult::new("R1", RuleStatus::Passed)]);
        assert_eq!(result.overall_status, OverallStatus::Included);
        assert_eq!(result.patient_id, "P1");
    }

    #[test]
    fn unknown_field_is_missing() {
        let profile = PatientProfile::new("P1");
        let result = evaluate(&profile, &protocol(vec![lvef_rule()]));
        assert_eq!(result.rule_results, vec![RuleResult::new("R1", RuleStatus::Missing)]);
        assert_eq!(result.overall_status, OverallStatus::NotEnoughInformation);
    }

    #[test]
    fn met_exclusion_criterion_fails() {
        let profile = PatientProfile {
            type1_diabetes: Some(true),
            ..PatientProfile::new("P1")
        };
        let rules = protocol(vec![RawRule::new("R2", "exclusion", "type1_diabetes", "==", true)]);
        let result = evaluate(&profile, &rules);
        assert_eq!(result.rule_results, vec![RuleResult::new("R2", RuleStatus::Failed)]);
        assert_eq!(result.overall_status, OverallStatus::Excluded);
    }

    #[test]
    fn unmet_exclusion_criterion_passes() {
        let profile = PatientProfile {
            type1_diabetes: Some(false),
            ..PatientProfile::new("P1")
        };
        let rules = protocol(vec![RawRule::new("R2", "exclusion", "type1_diabetes", "==", true)]);
        let result = evaluate(&profile, &rules);
        assert_eq!(result.status_of("R2"), Some(RuleStatus::Passed));
        assert_eq!(result.overall_status, OverallStatus::Included);
    }

    #[test]
    fn incomparable_data_fails_without_aborting() {
        let profile = PatientProfile {
            gender: Some(elig_model::Gender::Male),
            lvef: Some(30.0),
            ..PatientProfile::new("P1")
        };
        let rules = protocol(vec![
            RawRule::new("G1", "inclusion", "gender", ">=", 18.0),
            lvef_rule(),
        ]);
        let result = evaluate(&profile, &rules);
        assert_eq!(result.status_of("G1"), Some(RuleStatus::Failed));
        assert_eq!(result.status_of("R1"), Some(RuleStatus::Passed));
        assert_eq!(result.overall_status, OverallStatus::Excluded);
    }

    #[test]
    fn incomparable_exclusion_also_fails() {
        let profile = PatientProfile {
            gender: Some(elig_model::Gender::Female),
            ..PatientProfile::new("P1")
        };
        let rules = protocol(vec![RawRule::new("X1", "exclusion", "gender", "<", 3.0)]);
        assert_eq!(evaluate(&profile, &rules).status_of("X1"), Some(RuleStatus::Failed));
    }

    #[test]
    fn missing_dominates_failed() {
        let (passed, failed, missing) = (RuleStatus::Passed, RuleStatus::Failed, RuleStatus::Missing);
        assert_eq!(aggregate(&[failed, missing, passed]), OverallStatus::NotEnoughInformation);
        assert_eq!(aggregate(&[passed, failed]), OverallStatus::Excluded);
        assert_eq!(aggregate(&[passed, passed]), OverallStatus::Included);
        assert_eq!(aggregate(&[] as &[RuleStatus]), OverallStatus::Included);
    }

    #[test]
    fn sbp_alias_reads_systolic() {
        let profile = PatientProfile {
            bp_systolic: Some(95),
            ..PatientProfile::new("P1")
        };
        let rules = protocol(vec![RawRule::new("S1", "exclusion", "sbp", "<", 100.0)]);
        assert_eq!(evaluate(&profile, &rules).status_of("S1"), Some(RuleStatus::Failed));
    }
}
