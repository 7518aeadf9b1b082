//! Screening runs: source data in, patient reports out.

use std::path::Path;

use elig_engine::{evaluate, explain, missing_fields};
use elig_extract::{MergeAdapter, adapt_narrative_from};
use elig_ingest::{
    NarrativeRecord, SourceLayout, discover_patient_ids, filter_by_trial, list_csv_files,
};
use elig_model::{PatientProfile, Protocol, ProfileField};
use tracing::{info_span, trace};

use crate::logging::redact_value;
use crate::types::PatientReport;

/// Evaluate one profile and collect everything needed to report it.
pub fn screen_profile(
    profile: PatientProfile,
    protocol: &Protocol,
    expert_eligibility: Option<String>,
) -> PatientReport {
    log_profile_values(&profile);
    let result = evaluate(&profile, protocol);
    let rules = explain(&result, protocol, &profile);
    let missing = missing_fields(&result, protocol);
    PatientReport {
        patient_id: profile.patient_id.clone(),
        expert_eligibility,
        overall_status: result.overall_status,
        missing_fields: missing,
        rules,
        profile,
        result,
    }
}

/// Trial id to filter a dataset by.
///
/// An explicit id always applies. The protocol's own id applies only when
/// some row carries a trial id, so datasets without that column are kept
/// whole.
pub fn trial_filter<'a>(
    records: &[NarrativeRecord],
    explicit: Option<&'a str>,
    protocol_trial: Option<&'a str>,
) -> Option<&'a str> {
    explicit.or_else(|| {
        protocol_trial.filter(|_| records.iter().any(|record| record.trial_id.is_some()))
    })
}

/// Rows of a narrative dataset selected by trial and patient.
pub fn select_notes<'a>(
    records: &'a [NarrativeRecord],
    trial_id: Option<&'a str>,
    patient_id: Option<&'a str>,
) -> Vec<&'a NarrativeRecord> {
    filter_by_trial(records, trial_id)
        .filter(|record| patient_id.is_none_or(|id| record.patient_id == id))
        .collect()
}

/// Screen narrative notes, recording `artifact` as the note source.
pub fn screen_notes<'a, I>(records: I, protocol: &Protocol, artifact: &str) -> Vec<PatientReport>
where
    I: IntoIterator<Item = &'a NarrativeRecord>,
{
    records
        .into_iter()
        .map(|record| {
            let span = info_span!("patient", patient_id = %record.patient_id);
            let _guard = span.enter();
            trace!(note = redact_value(&record.note), "screening note");
            let profile = adapt_narrative_from(&record.patient_id, &record.note, artifact);
            screen_profile(profile, protocol, record.expert_eligibility.clone())
        })
        .collect()
}

/// Patient ids with at least one source file in `dir`.
pub fn patient_ids_in(dir: &Path, layout: &SourceLayout) -> elig_ingest::Result<Vec<String>> {
    let files = list_csv_files(dir)?;
    Ok(discover_patient_ids(&files, layout))
}

/// Screen patients from per-patient source files under `dir`.
pub fn screen_folder(
    adapter: &MergeAdapter,
    dir: &Path,
    patient_ids: &[String],
    protocol: &Protocol,
    assessment: Option<&str>,
) -> Vec<PatientReport> {
    patient_ids
        .iter()
        .map(|patient_id| {
            let span = info_span!("patient", patient_id = %patient_id);
            let _guard = span.enter();
            let profile = adapter.adapt(patient_id, dir);
            screen_profile(profile, protocol, assessment.map(str::to_string))
        })
        .collect()
}

fn log_profile_values(profile: &PatientProfile) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for field in ProfileField::all() {
        if let Some(value) = profile.value(*field) {
            let rendered = value.to_string();
            trace!(field = %field, value = redact_value(&rendered), "profile value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elig_model::{OverallStatus, RawRule};

    fn record(patient_id: &str, trial_id: &str, note: &str) -> NarrativeRecord {
        NarrativeRecord {
            patient_id: patient_id.to_string(),
            trial_id: Some(trial_id.to_string()),
            note: note.to_string(),
            expert_eligibility: Some("eligible".to_string()),
        }
    }

    fn protocol() -> Protocol {
        Protocol::new(vec![
            RawRule::new("I1", "inclusion", "age", ">=", 18.0),
            RawRule::new("I2", "inclusion", "lvef", "<=", 40.0),
        ])
        .expect("valid protocol")
    }

    #[test]
    fn selects_by_trial_and_patient() {
        let records = vec![
            record("P1", "T1", "note"),
            record("P2", "T1", "note"),
            record("P3", "T2", "note"),
        ];
        let ids = |selected: Vec<&NarrativeRecord>| {
            selected
                .iter()
                .map(|r| r.patient_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(select_notes(&records, Some("T1"), None)), vec!["P1", "P2"]);
        assert_eq!(ids(select_notes(&records, Some("T1"), Some("P2"))), vec!["P2"]);
        assert_eq!(ids(select_notes(&records, None, Some("P3"))), vec!["P3"]);
        assert!(select_notes(&records, Some("T2"), Some("P1")).is_empty());
    }

    #[test]
    fn protocol_trial_applies_only_to_datasets_with_trial_ids() {
        let tagged = vec![record("P1", "T1", "note")];
        let untagged = vec![NarrativeRecord {
            trial_id: None,
            ..record("P1", "T1", "note")
        }];
        assert_eq!(trial_filter(&tagged, None, Some("T1")), Some("T1"));
        assert_eq!(trial_filter(&untagged, None, Some("T1")), None);
        assert_eq!(trial_filter(&untagged, Some("T2"), Some("T1")), Some("T2"));
        assert_eq!(trial_filter(&tagged, None, None), None);

        let trial = trial_filter(&untagged, None, Some("T1"));
        assert_eq!(select_notes(&untagged, trial, None).len(), 1);
    }

    #[test]
    fn screens_notes_into_reports() {
        let records = vec![
            record("P1", "T1", "72-year-old male, LVEF 30%."),
            record("P2", "T1", "Male patient, LVEF 55%."),
        ];
        let reports = screen_notes(&records, &protocol(), "notes.tsv");

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].overall_status, OverallStatus::Included);
        assert_eq!(reports[0].expert_eligibility.as_deref(), Some("eligible"));
        assert_eq!(reports[1].overall_status, OverallStatus::NotEnoughInformation);
        assert_eq!(reports[1].missing_fields, vec![ProfileField::Age]);
        assert_eq!(reports[1].rules.len(), 2);
    }
}
