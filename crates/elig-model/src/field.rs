//! Registry of rule-addressable patient profile fields.
//!
//! Rules name the attribute they test by string. The name is resolved to a
//! [`ProfileField`] once, when the protocol is built, so evaluation never
//! looks fields up by string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Value type a profile field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Integer,
    Boolean,
    Text,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clinical attribute of [`crate::PatientProfile`] that a rule may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Age,
    Gender,
    Lvef,
    NtProbnp,
    NyhaClass,
    GdmtdHfTherapy,
    Egfr,
    Sglt2Inhibitor,
    Type1Diabetes,
    BpSystolic,
    BpDiastolic,
    CongestiveHf,
    UnstableAngina,
    CalciumChannelBlocker,
    /// Alias of [`ProfileField::BpSystolic`].
    Sbp,
    Hba1c,
    Uacr,
}

impl ProfileField {
    /// Every addressable field, in profile declaration order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Age,
            Self::Gender,
            Self::Lvef,
            Self::NtProbnp,
            Self::NyhaClass,
            Self::GdmtdHfTherapy,
            Self::Egfr,
            Self::Sglt2Inhibitor,
            Self::Type1Diabetes,
            Self::BpSystolic,
            Self::BpDiastolic,
            Self::CongestiveHf,
            Self::UnstableAngina,
            Self::CalciumChannelBlocker,
            Self::Sbp,
            Self::Hba1c,
            Self::Uacr,
        ]
    }

    /// Field name as written in protocol files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Lvef => "lvef",
            Self::NtProbnp => "nt_probnp",
            Self::NyhaClass => "nyha_class",
            Self::GdmtdHfTherapy => "gdmtd_hf_therapy",
            Self::Egfr => "egfr",
            Self::Sglt2Inhibitor => "sglt2_inhibitor",
            Self::Type1Diabetes => "type1_diabetes",
            Self::BpSystolic => "bp_systolic",
            Self::BpDiastolic => "bp_diastolic",
            Self::CongestiveHf => "congestive_hf",
            Self::UnstableAngina => "unstable_angina",
            Self::CalciumChannelBlocker => "calcium_channel_blocker",
            Self::Sbp => "sbp",
            Self::Hba1c => "hba1c",
            Self::Uacr => "uacr",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Lvef | Self::NtProbnp | Self::Egfr | Self::Hba1c | Self::Uacr => {
                FieldKind::Number
            }
            Self::Age | Self::NyhaClass | Self::BpSystolic | Self::BpDiastolic | Self::Sbp => {
                FieldKind::Integer
            }
            Self::GdmtdHfTherapy
            | Self::Sglt2Inhibitor
            | Self::Type1Diabetes
            | Self::CongestiveHf
            | Self::UnstableAngina
            | Self::CalciumChannelBlocker => FieldKind::Boolean,
            Self::Gender => FieldKind::Text,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = String;

    /// Parse a field name (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| format!("Unknown profile field: {s}"))
    }
}

impl Serialize for ProfileField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProfileField {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
