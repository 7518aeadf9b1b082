//! Profile extraction from a single free-text note.

use elig_model::{PatientProfile, SourceCategory};

use crate::patterns::{
    NoteText, extract_age, extract_calcium_channel_blocker, extract_congestive_hf,
    extract_diastolic_bp, extract_egfr, extract_gdmt_therapy, extract_gender, extract_lvef,
    extract_nt_probnp, extract_nyha_class, extract_sglt2_inhibitor, extract_systolic_bp,
    extract_type1_diabetes, extract_unstable_angina,
};

/// Artifact recorded for notes that did not come from a file.
pub const DEFAULT_NOTE_ARTIFACT: &str = "clinical_note";

/// Build a profile from one clinical note.
pub fn adapt_narrative(patient_id: &str, note: &str) -> PatientProfile {
    adapt_narrative_from(patient_id, note, DEFAULT_NOTE_ARTIFACT)
}

/// Build a profile from one clinical note read from `artifact`.
pub fn adapt_narrative_from(patient_id: &str, note: &str, artifact: &str) -> PatientProfile {
    let text = NoteText::new(note);
    let raw = text.as_str();

    let mut profile = PatientProfile {
        age: extract_age(raw),
        gender: extract_gender(raw),
        lvef: extract_lvef(raw),
        nt_probnp: extract_nt_probnp(raw),
        egfr: extract_egfr(raw),
        nyha_class: extract_nyha_class(raw),
        gdmtd_hf_therapy: Some(extract_gdmt_therapy(&text)),
        sglt2_inhibitor: Some(extract_sglt2_inhibitor(&text)),
        type1_diabetes: Some(extract_type1_diabetes(&text)),
        bp_systolic: extract_systolic_bp(raw),
        bp_diastolic: extract_diastolic_bp(raw),
        congestive_hf: Some(extract_congestive_hf(&text)),
        unstable_angina: Some(extract_unstable_angina(&text)),
        calcium_channel_blocker: Some(extract_calcium_channel_blocker(&text)),
        ..PatientProfile::new(patient_id)
    };
    profile.record_source(SourceCategory::Note, artifact);

    tracing::debug!(
        patient_id,
        known = ?profile.known_fields(),
        "extracted narrative profile"
    );
    profile
}
