//! Eligibility rule evaluation.
//!
//! [`evaluate`] applies every rule of a [`Protocol`](elig_model::Protocol) to a
//! [`PatientProfile`](elig_model::PatientProfile) and aggregates the verdict:
//!
//! 1. a rule whose field is unknown is `missing`
//! 2. a rule whose operands cannot be compared is `failed`
//! 3. otherwise the rule is `passed` when the patient clears it
//!
//! Any `missing` rule yields "not enough information"; otherwise any `failed`
//! rule yields "excluded"; otherwise "included". Evaluation is pure.

mod compare;
mod engine;
mod explain;

pub use compare::{Comparison, apply};
pub use engine::{aggregate, evaluate, evaluate_rule};
pub use explain::{RuleOutcome, explain, missing_fields};
