use elig_engine::{Comparison, apply, evaluate};
use elig_model::{
    FieldValue, Operator, OverallStatus, PatientProfile, Protocol, RawRule, RuleStatus, RuleValue,
};
use proptest::prelude::*;

fn operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::all().to_vec())
}

fn kind() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["inclusion", "exclusion"])
}

/// Rules over a numeric and a boolean field, with thresholds of the matching type.
fn raw_rule() -> impl Strategy<Value = (String, &'static str, Operator, bool, f64, bool)> {
    (
        "[A-Z][0-9]{1,3}",
        kind(),
        operator(),
        any::<bool>(),
        0.0f64..200.0,
        any::<bool>(),
    )
}

fn protocol() -> impl Strategy<Value = Protocol> {
    prop::collection::vec(raw_rule(), 0..12).prop_map(|specs| {
        let rules: Vec<RawRule> = specs
            .into_iter()
            .enumerate()
            .map(|(idx, (id, kind, op, numeric, threshold, flag))| {
                let id = format!("{id}-{idx}");
                if numeric {
                    RawRule::new(id, kind, "egfr", op.symbol(), threshold)
                } else {
                    RawRule::new(id, kind, "type1_diabetes", op.symbol(), flag)
                }
            })
            .collect();
        Protocol::new(rules).expect("generated rules are valid")
    })
}

fn profile() -> impl Strategy<Value = PatientProfile> {
    (
        prop::option::of(0.0f64..200.0),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(egfr, type1_diabetes)| PatientProfile {
            egfr,
            type1_diabetes,
            ..PatientProfile::new("P-prop")
        })
}

proptest! {
    #[test]
    fn one_result_per_rule_in_order(profile in profile(), protocol in protocol()) {
        let result = evaluate(&profile, &protocol);
        prop_assert_eq!(result.rule_results.len(), protocol.len());
        for (rule, rule_result) in protocol.iter().zip(&result.rule_results) {
            prop_assert_eq!(&rule.id, &rule_result.rule_id);
        }
    }

    #[test]
    fn evaluation_is_pure(profile in profile(), protocol in protocol()) {
        prop_assert_eq!(evaluate(&profile, &protocol), evaluate(&profile, &protocol));
    }

    #[test]
    fn missing_iff_field_unknown(profile in profile(), protocol in protocol()) {
        let result = evaluate(&profile, &protocol);
        for (rule, rule_result) in protocol.iter().zip(&result.rule_results) {
            prop_assert_eq!(
                rule_result.status == RuleStatus::Missing,
                !profile.is_known(rule.field)
            );
        }
    }

    #[test]
    fn verdict_follows_statuses(profile in profile(), protocol in protocol()) {
        let result = evaluate(&profile, &protocol);
        let any_missing = result.count(RuleStatus::Missing) > 0;
        let any_failed = result.count(RuleStatus::Failed) > 0;
        let expected = if any_missing {
            OverallStatus::NotEnoughInformation
        } else if any_failed {
            OverallStatus::Excluded
        } else {
            OverallStatus::Included
        };
        prop_assert_eq!(result.overall_status, expected);
    }

    #[test]
    fn numeric_operators_agree_with_std(value in -1e6f64..1e6, threshold in -1e6f64..1e6) {
        let field = FieldValue::Number(value);
        let threshold_value = RuleValue::from(threshold);
        let cases = [
            (Operator::Ge, value >= threshold),
            (Operator::Le, value <= threshold),
            (Operator::Gt, value > threshold),
            (Operator::Lt, value < threshold),
            (Operator::Eq, value == threshold),
            (Operator::Ne, value != threshold),
        ];
        for (op, expected) in cases {
            prop_assert_eq!(apply(&field, op, &threshold_value), Comparison::from(expected));
        }
    }
}
