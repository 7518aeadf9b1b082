//! Canonical patient record consumed by the evaluation engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::ProfileField;
use crate::value::FieldValue;

/// Normalized gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Accepts the synonyms found in clinical notes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "woman" | "f" => Ok(Gender::Female),
            "male" | "man" | "m" => Ok(Gender::Male),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}

/// Logical category of raw data that populated part of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Note,
    Labs,
    Urinalysis,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Note => "note",
            SourceCategory::Labs => "labs",
            SourceCategory::Urinalysis => "urinalysis",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical attributes of one patient.
///
/// `None` means the value is unknown. It is never interchangeable with
/// `false` or `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: String,

    pub age: Option<i64>,
    pub gender: Option<Gender>,

    pub lvef: Option<f64>,
    pub nt_probnp: Option<f64>,
    pub nyha_class: Option<i64>,
    pub gdmtd_hf_therapy: Option<bool>,
    pub egfr: Option<f64>,
    pub sglt2_inhibitor: Option<bool>,
    pub type1_diabetes: Option<bool>,
    pub bp_systolic: Option<i64>,
    pub bp_diastolic: Option<i64>,

    pub congestive_hf: Option<bool>,
    pub unstable_angina: Option<bool>,
    pub calcium_channel_blocker: Option<bool>,

    pub hba1c: Option<f64>,
    pub uacr: Option<f64>,

    /// Artifact that supplied each populated category.
    #[serde(default)]
    pub source_files: BTreeMap<SourceCategory, String>,
}

impl PatientProfile {
    /// Empty profile: every attribute unknown.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }

    /// Value of `field`, or `None` when it is unknown.
    pub fn value(&self, field: ProfileField) -> Option<FieldValue> {
        match field {
            ProfileField::Age => self.age.map(int_value),
            ProfileField::Gender => self
                .gender
                .map(|gender| FieldValue::Text(gender.as_str().to_string())),
            ProfileField::Lvef => self.lvef.map(FieldValue::Number),
            ProfileField::NtProbnp => self.nt_probnp.map(FieldValue::Number),
            ProfileField::NyhaClass => self.nyha_class.map(int_value),
            ProfileField::GdmtdHfTherapy => self.gdmtd_hf_therapy.map(FieldValue::Boolean),
            ProfileField::Egfr => self.egfr.map(FieldValue::Number),
            ProfileField::Sglt2Inhibitor => self.sglt2_inhibitor.map(FieldValue::Boolean),
            ProfileField::Type1Diabetes => self.type1_diabetes.map(FieldValue::Boolean),
            ProfileField::BpSystolic | ProfileField::Sbp => self.bp_systolic.map(int_value),
            ProfileField::BpDiastolic => self.bp_diastolic.map(int_value),
            ProfileField::CongestiveHf => self.congestive_hf.map(FieldValue::Boolean),
            ProfileField::UnstableAngina => self.unstable_angina.map(FieldValue::Boolean),
            ProfileField::CalciumChannelBlocker => {
                self.calcium_channel_blocker.map(FieldValue::Boolean)
            }
            ProfileField::Hba1c => self.hba1c.map(FieldValue::Number),
            ProfileField::Uacr => self.uacr.map(FieldValue::Number),
        }
    }

    /// Whether `field` holds a value.
    pub fn is_known(&self, field: ProfileField) -> bool {
        self.value(field).is_some()
    }

    /// Record the artifact that supplied a category.
    pub fn record_source(&mut self, category: SourceCategory, artifact: impl Into<String>) {
        self.source_files.insert(category, artifact.into());
    }

    /// Artifact recorded for a category.
    pub fn source(&self, category: SourceCategory) -> Option<&str> {
        self.source_files.get(&category).map(String::as_str)
    }

    /// Fields that currently hold a value, in registry order.
    pub fn known_fields(&self) -> Vec<ProfileField> {
        ProfileField::all()
            .iter()
            .copied()
            .filter(|field| self.is_known(*field))
            .collect()
    }
}

fn int_value(value: i64) -> FieldValue {
    FieldValue::Number(value as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_unknown() {
        let profile = PatientProfile::new("P0001");
        assert_eq!(profile.patient_id, "P0001");
        assert!(profile.known_fields().is_empty());
        assert!(profile.source_files.is_empty());
    }

    #[test]
    fn test_value_accessor() {
        let profile = PatientProfile {
            lvef: Some(32.0),
            age: Some(67),
            gender: Some(Gender::Female),
            type1_diabetes: Some(false),
            ..PatientProfile::new("P1")
        };
        assert_eq!(profile.value(ProfileField::Lvef), Some(FieldValue::Number(32.0)));
        assert_eq!(profile.value(ProfileField::Age), Some(FieldValue::Number(67.0)));
        assert_eq!(
            profile.value(ProfileField::Gender),
            Some(FieldValue::Text("female".to_string()))
        );
        assert_eq!(
            profile.value(ProfileField::Type1Diabetes),
            Some(FieldValue::Boolean(false))
        );
        assert_eq!(profile.value(ProfileField::Egfr), None);
    }

    #[test]
    fn test_sbp_aliases_systolic() {
        let profile = PatientProfile {
            bp_systolic: Some(118),
            ..PatientProfile::new("P1")
        };
        assert_eq!(
            profile.value(ProfileField::Sbp),
            profile.value(ProfileField::BpSystolic)
        );
    }

    #[test]
    fn test_gender_synonyms() {
        assert_eq!("Woman".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("man".parse::<Gender>().unwrap(), Gender::Male);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn test_source_files_serialize_by_category() {
        let mut profile = PatientProfile::new("P1");
        profile.record_source(SourceCategory::Labs, "P1_renal_labs.csv");
        profile.record_source(SourceCategory::Note, "P1_clinical_note.csv");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["source_files"]["labs"], "P1_renal_labs.csv");
        assert_eq!(json["source_files"]["note"], "P1_clinical_note.csv");
        assert!(json["egfr"].is_null());
    }
}
