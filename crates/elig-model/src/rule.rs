//! Eligibility criteria.
//!
//! A [`RawRule`] is the record an external protocol file supplies. It becomes
//! a [`Rule`] only after its type, field, and operator strings have been
//! resolved; anything unresolvable is a [`ModelError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::ProfileField;
use crate::value::RuleValue;

/// Whether satisfying a rule admits or disqualifies a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// The patient must satisfy the comparison.
    Inclusion,
    /// The comparison describes a disqualifying condition.
    Exclusion,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Inclusion => "inclusion",
            RuleKind::Exclusion => "exclusion",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inclusion" => Ok(RuleKind::Inclusion),
            "exclusion" => Ok(RuleKind::Exclusion),
            _ => Err(format!("Unknown rule type: {s}")),
        }
    }
}

/// Supported comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
    Ne,
}

impl Operator {
    pub const fn all() -> &'static [Self] {
        &[Self::Ge, Self::Le, Self::Eq, Self::Gt, Self::Lt, Self::Ne]
    }

    /// Symbol as written in protocol files.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|op| op.symbol() == trimmed)
            .ok_or_else(|| format!("Unsupported operator: {s}"))
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An unvalidated rule record, as found in a protocol file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub field: String,
    pub operator: String,
    pub value: RuleValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawRule {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A validated eligibility criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub field: ProfileField,
    pub operator: Operator,
    pub value: RuleValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Rule {
    /// Resolve a raw record. `position` is the rule's index in its protocol
    /// and only used for error reporting.
    pub fn from_raw(raw: RawRule, position: usize) -> Result<Self> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(ModelError::EmptyRuleId { position });
        }
        let kind = raw
            .kind
            .parse::<RuleKind>()
            .map_err(|_| ModelError::UnknownRuleKind {
                rule_id: id.clone(),
                kind: raw.kind.clone(),
            })?;
        let field = raw
            .field
            .parse::<ProfileField>()
            .map_err(|_| ModelError::UnknownField {
                rule_id: id.clone(),
                field: raw.field.clone(),
            })?;
        let operator = raw
            .operator
            .parse::<Operator>()
            .map_err(|_| ModelError::UnsupportedOperator {
                rule_id: id.clone(),
                operator: raw.operator.clone(),
            })?;
        Ok(Self {
            id,
            kind,
            field,
            operator,
            value: raw.value,
            description: raw.description,
        })
    }

    /// Display text, falling back to a rendering of the comparison.
    pub fn label(&self) -> String {
        match &self.description {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => format!("{} {} {}", self.field, self.operator, self.value),
        }
    }
}
