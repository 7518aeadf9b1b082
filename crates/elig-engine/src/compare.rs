//! Operator application over typed values.

use std::cmp::Ordering;

use elig_model::{FieldValue, Operator, RuleValue};

/// Outcome of comparing a profile value against a rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Holds,
    DoesNotHold,
    /// The operand types cannot be ordered against each other, or a number is NaN.
    Incomparable,
}

impl Comparison {
    pub fn holds(&self) -> bool {
        matches!(self, Comparison::Holds)
    }
}

impl From<bool> for Comparison {
    fn from(holds: bool) -> Self {
        if holds {
            Comparison::Holds
        } else {
            Comparison::DoesNotHold
        }
    }
}

/// Borrowed view shared by both value types.
#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
    Boolean(bool),
    Number(f64),
    Text(&'a str),
}

impl<'a> From<&'a FieldValue> for Operand<'a> {
    fn from(value: &'a FieldValue) -> Self {
        match value {
            FieldValue::Boolean(b) => Operand::Boolean(*b),
            FieldValue::Number(n) => Operand::Number(*n),
            FieldValue::Text(s) => Operand::Text(s),
        }
    }
}

impl<'a> From<&'a RuleValue> for Operand<'a> {
    fn from(value: &'a RuleValue) -> Self {
        match value {
            RuleValue::Boolean(b) => Operand::Boolean(*b),
            RuleValue::Number(n) => Operand::Number(*n),
            RuleValue::Text(s) => Operand::Text(s),
        }
    }
}

fn bool_as_number(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Ordering of `left` relative to `right`, if the pair is comparable.
///
/// Booleans order `false < true` and widen to 0/1 against numbers.
/// Text orders lexicographically and is case-sensitive.
fn order(left: Operand<'_>, right: Operand<'_>) -> Option<Ordering> {
    match (left, right) {
        (Operand::Number(a), Operand::Number(b)) => a.partial_cmp(&b),
        (Operand::Boolean(a), Operand::Boolean(b)) => Some(a.cmp(&b)),
        (Operand::Text(a), Operand::Text(b)) => Some(a.cmp(b)),
        (Operand::Number(a), Operand::Boolean(b)) => a.partial_cmp(&bool_as_number(b)),
        (Operand::Boolean(a), Operand::Number(b)) => bool_as_number(a).partial_cmp(&b),
        _ => None,
    }
}

/// Whether `operator` accepts a value that compares as `ordering` to its threshold.
fn operator_holds(operator: Operator, ordering: Ordering) -> bool {
    match operator {
        Operator::Ge => ordering != Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Ne => ordering != Ordering::Equal,
    }
}

/// Apply `value <operator> threshold`.
pub fn apply(value: &FieldValue, operator: Operator, threshold: &RuleValue) -> Comparison {
    match order(value.into(), threshold.into()) {
        Some(ordering) => operator_holds(operator, ordering).into(),
        None => Comparison::Incomparable,
    }
}
