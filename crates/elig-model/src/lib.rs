//! Data model for trial eligibility screening.
//!
//! - [`Protocol`]: ordered, validated inclusion/exclusion [`Rule`]s
//! - [`PatientProfile`]: nullable clinical attributes plus provenance
//! - [`EvaluationResult`]: per-rule [`RuleStatus`] and the [`OverallStatus`]

pub mod error;
pub mod field;
pub mod profile;
pub mod protocol;
pub mod result;
pub mod rule;
pub mod value;

pub use error::{ModelError, Result};
pub use field::{FieldKind, ProfileField};
pub use profile::{Gender, PatientProfile, SourceCategory};
pub use protocol::{Protocol, RuleDescription};
pub use result::{EvaluationResult, OverallStatus, RuleResult, RuleStatus};
pub use rule::{Operator, RawRule, Rule, RuleKind};
pub use value::{FieldValue, RuleValue, format_number};
