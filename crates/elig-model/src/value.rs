//! Typed values on both sides of a rule comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Threshold carried by a rule.
///
/// Deserializes from a bare JSON boolean, number, or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl RuleValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleValue::Boolean(_) => "boolean",
            RuleValue::Number(_) => "number",
            RuleValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Boolean(value) => write!(f, "{value}"),
            RuleValue::Number(value) => f.write_str(&format_number(*value)),
            RuleValue::Text(value) => write!(f, "\"{value}\""),
        }
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Boolean(value)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Number(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Number(value as f64)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

/// Value a populated profile field contributes to a comparison.
///
/// Integer attributes (age, blood pressure, NYHA class) widen to `Number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::Number(value) => f.write_str(&format_number(*value)),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_value_deserializes_untagged() {
        let values: Vec<RuleValue> = serde_json::from_str(r#"[40, 2.5, true, "female"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RuleValue::Number(40.0),
                RuleValue::Number(2.5),
                RuleValue::Boolean(true),
                RuleValue::Text("female".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_display_without_trailing_zeros() {
        assert_eq!(RuleValue::Number(40.0).to_string(), "40");
        assert_eq!(RuleValue::Number(6.5).to_string(), "6.5");
        assert_eq!(FieldValue::Number(1200.0).to_string(), "1200");
    }
}
