//! Tests for elig-model types.

use elig_model::{
    EvaluationResult, ModelError, OverallStatus, PatientProfile, ProfileField, Protocol, RawRule,
    RuleKind, RuleResult, RuleStatus, RuleValue, SourceCategory,
};

#[test]
fn protocol_deserializes_from_json() {
    let json = r#"[
        {"id": "R1", "type": "inclusion", "field": "lvef", "operator": "<=", "value": 40,
         "description": "LVEF <= 40%"},
        {"id": "R2", "type": "exclusion", "field": "type1_diabetes", "operator": "==", "value": true},
        {"id": "R3", "type": "inclusion", "field": "gender", "operator": "==", "value": "female"}
    ]"#;
    let raw: Vec<RawRule> = serde_json::from_str(json).expect("parse rules");
    let protocol = Protocol::new(raw).expect("valid protocol");

    assert_eq!(protocol.len(), 3);
    let r2 = protocol.rule("R2").expect("R2");
    assert_eq!(r2.kind, RuleKind::Exclusion);
    assert_eq!(r2.value, RuleValue::Boolean(true));
    let r3 = protocol.rule("R3").expect("R3");
    assert_eq!(r3.value, RuleValue::Text("female".to_string()));
    assert!(r3.description.is_none());
}

#[test]
fn unknown_field_is_a_configuration_error() {
    let raw = vec![RawRule::new("R1", "inclusion", "ejection_fraction", "<=", 40.0)];
    let err = Protocol::new(raw).unwrap_err();
    assert_eq!(
        err,
        ModelError::UnknownField {
            rule_id: "R1".to_string(),
            field: "ejection_fraction".to_string(),
        }
    );
}

#[test]
fn unknown_rule_type_is_a_configuration_error() {
    let raw = vec![RawRule::new("R1", "preferred", "lvef", "<=", 40.0)];
    assert!(matches!(
        Protocol::new(raw),
        Err(ModelError::UnknownRuleKind { .. })
    ));
}

#[test]
fn empty_rule_id_is_rejected() {
    let raw = vec![
        RawRule::new("R1", "inclusion", "lvef", "<=", 40.0),
        RawRule::new("  ", "inclusion", "egfr", ">=", 20.0),
    ];
    assert_eq!(
        Protocol::new(raw).unwrap_err(),
        ModelError::EmptyRuleId { position: 1 }
    );
}

#[test]
fn validated_rule_serializes_with_symbols() {
    let protocol = Protocol::new(vec![RawRule::new("R1", "inclusion", "egfr", ">=", 25.0)])
        .expect("valid protocol");
    let json = serde_json::to_value(&protocol.rules()[0]).expect("serialize rule");
    assert_eq!(json["type"], "inclusion");
    assert_eq!(json["field"], "egfr");
    assert_eq!(json["operator"], ">=");
    assert_eq!(json["value"], 25.0);
}

#[test]
fn profile_round_trips_through_json() {
    let mut profile = PatientProfile::new("S0001");
    profile.egfr = Some(48.5);
    profile.type1_diabetes = Some(false);
    profile.record_source(SourceCategory::Labs, "S0001_blood_labs.csv");

    let json = serde_json::to_string(&profile).expect("serialize profile");
    let round: PatientProfile = serde_json::from_str(&json).expect("deserialize profile");
    assert_eq!(round, profile);
    assert_eq!(round.source(SourceCategory::Labs), Some("S0001_blood_labs.csv"));
    assert_eq!(round.known_fields(), vec![ProfileField::Egfr, ProfileField::Type1Diabetes]);
}

#[test]
fn evaluation_result_serializes() {
    let result = EvaluationResult {
        patient_id: "P0001".to_string(),
        rule_results: vec![RuleResult::new("R1", RuleStatus::Missing)],
        overall_status: OverallStatus::NotEnoughInformation,
    };
    let json = serde_json::to_value(&result).expect("serialize result");
    assert_eq!(json["rule_results"][0]["status"], "missing");
    assert_eq!(json["overall_status"], "not enough information");
    let round: EvaluationResult = serde_json::from_value(json).expect("deserialize result");
    assert_eq!(round, result);
}
