//! File discovery for patient folders.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::table::{SourceTable, read_csv_table};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Naming of per-patient source files.
///
/// Each source is a suffix: patient `P0001` with suffix `renal_labs` reads
/// `P0001_renal_labs.csv`. Lists are in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub note_sources: Vec<String>,
    pub lab_sources: Vec<String>,
    pub urinalysis_sources: Vec<String>,
    /// Column holding the free-text note in note sources.
    pub note_column: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            note_sources: vec!["clinical_note".to_string(), "anamnesis".to_string()],
            lab_sources: vec!["renal_labs".to_string(), "blood_labs".to_string()],
            urinalysis_sources: vec!["urinalysis".to_string()],
            note_column: "narrative_note".to_string(),
        }
    }
}

impl SourceLayout {
    /// File name of one source for one patient.
    pub fn file_name(&self, patient_id: &str, suffix: &str) -> String {
        format!("{patient_id}_{suffix}.csv")
    }

    /// Every configured suffix, notes first.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.note_sources
            .iter()
            .chain(&self.lab_sources)
            .chain(&self.urinalysis_sources)
            .map(String::as_str)
    }

    /// Patient id encoded in `file_name`, if it ends in a known suffix.
    pub fn patient_id_of(&self, file_name: &str) -> Option<String> {
        let stem = file_name
            .strip_suffix(".csv")
            .or_else(|| file_name.strip_suffix(".CSV"))?;
        self.suffixes().find_map(|suffix| {
            stem.strip_suffix(suffix)
                .and_then(|rest| rest.strip_suffix('_'))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
    }
}

/// Distinct patient ids found among `files`, sorted.
pub fn discover_patient_ids(files: &[PathBuf], layout: &SourceLayout) -> Vec<String> {
    let ids: BTreeSet<String> = files
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .filter_map(|name| layout.patient_id_of(name))
        .collect();
    ids.into_iter().collect()
}

/// A table together with the artifact it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub artifact: String,
    pub table: SourceTable,
}

/// The readable source tables of one patient, each list in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientSources {
    pub notes: Vec<LoadedTable>,
    pub labs: Vec<LoadedTable>,
    pub urinalysis: Vec<LoadedTable>,
}

impl PatientSources {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.labs.is_empty() && self.urinalysis.is_empty()
    }
}

/// Load every source of `patient_id` found under `dir`.
///
/// Absent files are skipped silently. Unreadable or malformed files are
/// logged and skipped, so a patient with no usable data yields empty sources.
pub fn load_patient_sources(dir: &Path, patient_id: &str, layout: &SourceLayout) -> PatientSources {
    if !dir.is_dir() {
        tracing::warn!(path = %dir.display(), patient_id, "patient directory not found");
        return PatientSources::default();
    }
    PatientSources {
        notes: load_group(dir, patient_id, layout, &layout.note_sources),
        labs: load_group(dir, patient_id, layout, &layout.lab_sources),
        urinalysis: load_group(dir, patient_id, layout, &layout.urinalysis_sources),
    }
}

fn load_group(
    dir: &Path,
    patient_id: &str,
    layout: &SourceLayout,
    suffixes: &[String],
) -> Vec<LoadedTable> {
    let mut loaded = Vec::new();
    for suffix in suffixes {
        let path = dir.join(layout.file_name(patient_id, suffix));
        if !path.is_file() {
            tracing::trace!(path = %path.display(), "source absent");
            continue;
        }
        match read_csv_table(&path) {
            Ok(table) => {
                tracing::debug!(
                    path = %path.display(),
                    rows = table.row_count(),
                    "loaded source table"
                );
                loaded.push(LoadedTable {
                    artifact: path.display().to_string(),
                    table,
                });
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable source");
            }
        }
    }
    loaded
}
