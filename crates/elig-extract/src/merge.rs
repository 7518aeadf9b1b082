//! Profile extraction from a patient's structured source files.
//!
//! Each attribute has its own ordered chain of sources. The first source in
//! the chain that yields a value wins; later sources are not consulted.
//!
//! | Attribute        | Chain                                                  |
//! |------------------|--------------------------------------------------------|
//! | `type1_diabetes` | first note whose first row has a note, else `false`    |
//! | `egfr`, `hba1c`  | lab tables in layout order, long form then wide form   |
//! | `uacr`           | urinalysis tables in layout order, long form only      |

use std::path::Path;

use elig_ingest::{LoadedTable, PatientSources, SourceLayout, SourceTable, load_patient_sources};
use elig_model::{PatientProfile, SourceCategory};

use crate::patterns::{NoteText, TYPE1_NOTE_NEGATIONS, mentions_type1_diabetes, parse_f64};

/// Column naming the analyte in long-form tables.
const TEST_NAME_COLUMN: &str = "test_name";
/// Column holding the result in long-form tables.
const VALUE_COLUMN: &str = "value";

/// A laboratory measurement recognized by test name or column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabAnalyte {
    Egfr,
    Hba1c,
    Uacr,
}

impl LabAnalyte {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabAnalyte::Egfr => "egfr",
            LabAnalyte::Hba1c => "hba1c",
            LabAnalyte::Uacr => "uacr",
        }
    }

    /// Whether a long-form test name refers to this analyte.
    pub fn matches_test_name(&self, test_name: &str) -> bool {
        let name = test_name.to_lowercase();
        match self {
            LabAnalyte::Egfr | LabAnalyte::Hba1c => name.contains(self.as_str()),
            LabAnalyte::Uacr => {
                (name.contains("albumin") && name.contains("creatinine")) || name.contains("uacr")
            }
        }
    }

    /// Whether wide-form tables may carry this analyte as a column.
    fn has_wide_form(&self) -> bool {
        !matches!(self, LabAnalyte::Uacr)
    }
}

/// Latest parsable value of `analyte` in a long-form table.
///
/// Rows are scanned bottom-up. Rows whose value does not parse are skipped.
/// Returns `None` when the table lacks `test_name`/`value` columns.
pub fn scan_long_form(table: &SourceTable, analyte: LabAnalyte) -> Option<f64> {
    let name_col = table.column_index(TEST_NAME_COLUMN)?;
    let value_col = table.column_index(VALUE_COLUMN)?;
    (0..table.row_count()).rev().find_map(|row| {
        let test_name = table.cell(row, name_col)?;
        if !analyte.matches_test_name(test_name) {
            return None;
        }
        let value = table.cell(row, value_col).and_then(parse_f64);
        if value.is_none() {
            tracing::debug!(analyte = analyte.as_str(), row, "skipping unparsable lab value");
        }
        value
    })
}

/// Last non-empty, parsable value of the column whose header names `analyte`.
pub fn scan_wide_form(table: &SourceTable, analyte: LabAnalyte) -> Option<f64> {
    let column = table.column_containing(analyte.as_str())?;
    table.column_values(column).rev().find_map(parse_f64)
}

/// Value of `analyte` in one table, preferring the long form.
fn scan_table(table: &SourceTable, analyte: LabAnalyte) -> Option<f64> {
    let is_long_form = table.column_index(TEST_NAME_COLUMN).is_some()
        && table.column_index(VALUE_COLUMN).is_some();
    if is_long_form {
        scan_long_form(table, analyte)
    } else if analyte.has_wide_form() {
        scan_wide_form(table, analyte)
    } else {
        None
    }
}

/// First table in `tables` that yields `analyte`, with the value found.
fn first_yielding(tables: &[LoadedTable], analyte: LabAnalyte) -> Option<(&LoadedTable, f64)> {
    tables
        .iter()
        .find_map(|loaded| scan_table(&loaded.table, analyte).map(|value| (loaded, value)))
}

/// First note source whose first data row has a non-empty note cell.
fn first_note<'a>(
    notes: &'a [LoadedTable],
    note_column: &str,
) -> Option<(&'a LoadedTable, &'a str)> {
    notes.iter().find_map(|loaded| {
        let column = loaded.table.column_index(note_column)?;
        loaded.table.cell(0, column).map(|note| (loaded, note))
    })
}

/// Build a profile from already-loaded sources.
pub fn merge_sources(
    patient_id: &str,
    sources: &PatientSources,
    layout: &SourceLayout,
) -> PatientProfile {
    let mut profile = PatientProfile {
        type1_diabetes: Some(false),
        ..PatientProfile::new(patient_id)
    };

    if let Some((loaded, note)) = first_note(&sources.notes, &layout.note_column) {
        let text = NoteText::new(note);
        profile.type1_diabetes = Some(mentions_type1_diabetes(&text, TYPE1_NOTE_NEGATIONS));
        profile.record_source(SourceCategory::Note, loaded.artifact.as_str());
    } else {
        tracing::debug!(patient_id, "no usable clinical note");
    }

    let egfr = first_yielding(&sources.labs, LabAnalyte::Egfr);
    let hba1c = first_yielding(&sources.labs, LabAnalyte::Hba1c);
    profile.egfr = egfr.map(|(_, value)| value);
    profile.hba1c = hba1c.map(|(_, value)| value);
    if let Some((loaded, _)) = egfr.or(hba1c) {
        profile.record_source(SourceCategory::Labs, loaded.artifact.as_str());
    }

    let uacr = first_yielding(&sources.urinalysis, LabAnalyte::Uacr);
    profile.uacr = uacr.map(|(_, value)| value);
    let urinalysis_source = uacr
        .map(|(loaded, _)| loaded)
        .or_else(|| sources.urinalysis.first());
    if let Some(loaded) = urinalysis_source {
        profile.record_source(SourceCategory::Urinalysis, loaded.artifact.as_str());
    }

    tracing::debug!(
        patient_id,
        known = ?profile.known_fields(),
        sources = profile.source_files.len(),
        "merged patient sources"
    );
    profile
}

/// Reads a patient's source files and merges them into a profile.
#[derive(Debug, Clone, Default)]
pub struct MergeAdapter {
    layout: SourceLayout,
}

impl MergeAdapter {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Build the profile of `patient_id` from the files under `dir`.
    ///
    /// Never fails: unreadable files are logged and treated as absent.
    pub fn adapt(&self, patient_id: &str, dir: &Path) -> PatientProfile {
        let sources = load_patient_sources(dir, patient_id, &self.layout);
        merge_sources(patient_id, &sources, &self.layout)
    }
}
