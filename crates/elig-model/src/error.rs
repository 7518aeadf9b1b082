//! Configuration errors raised while building a protocol.

use thiserror::Error;

/// Errors that make a protocol unusable.
///
/// Every variant is fatal: a protocol that fails to build must never be
/// evaluated against patients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Operator string is not one of `>=`, `<=`, `==`, `>`, `<`, `!=`.
    #[error("rule {rule_id}: unsupported operator '{operator}'")]
    UnsupportedOperator { rule_id: String, operator: String },

    /// Rule type is neither `inclusion` nor `exclusion`.
    #[error("rule {rule_id}: unknown rule type '{kind}'")]
    UnknownRuleKind { rule_id: String, kind: String },

    /// Field name does not address a patient profile attribute.
    #[error("rule {rule_id}: unknown profile field '{field}'")]
    UnknownField { rule_id: String, field: String },

    /// Rule id is blank.
    #[error("rule at position {position} has an empty id")]
    EmptyRuleId { position: usize },

    /// Two rules share an id.
    #[error("duplicate rule id: {rule_id}")]
    DuplicateRuleId { rule_id: String },
}

/// Result type for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;
