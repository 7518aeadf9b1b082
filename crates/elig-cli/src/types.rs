use std::path::PathBuf;

use elig_engine::RuleOutcome;
use elig_model::{EvaluationResult, OverallStatus, PatientProfile, ProfileField};
use serde::Serialize;

/// Screening outcome of one patient.
#[derive(Debug, Clone, Serialize)]
pub struct PatientReport {
    pub patient_id: String,
    /// Reviewer assessment carried by the source data, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert_eligibility: Option<String>,
    pub overall_status: OverallStatus,
    pub missing_fields: Vec<ProfileField>,
    pub rules: Vec<RuleOutcome>,
    pub profile: PatientProfile,
    #[serde(skip)]
    pub result: EvaluationResult,
}

/// Reports of one command run against one protocol.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<String>,
    pub source: PathBuf,
    pub reports: Vec<PatientReport>,
}

/// Number of patients per verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub included: usize,
    pub excluded: usize,
    pub not_enough_information: usize,
}

impl ScreeningRun {
    pub fn counts(&self) -> VerdictCounts {
        let mut counts = VerdictCounts::default();
        for report in &self.reports {
            match report.overall_status {
                OverallStatus::Included => counts.included += 1,
                OverallStatus::Excluded => counts.excluded += 1,
                OverallStatus::NotEnoughInformation => counts.not_enough_information += 1,
            }
        }
        counts
    }
}
