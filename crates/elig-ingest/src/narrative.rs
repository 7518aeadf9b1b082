//! Narrative note datasets: one free-text clinical note per row.

use std::path::Path;

use crate::error::{IngestError, Result};
use crate::table::{SourceTable, read_table};

/// One patient note with its optional trial and expert labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeRecord {
    pub patient_id: String,
    pub trial_id: Option<String>,
    pub note: String,
    /// Eligibility assessed by a human reviewer, if the dataset carries one.
    pub expert_eligibility: Option<String>,
}

/// Load a narrative dataset.
///
/// Tab-separated unless the file ends in `.csv`. Requires `patient_id` and
/// `note` columns; `trial_id` and `expert_eligibility` are optional. Rows
/// without a patient id are dropped.
pub fn load_narrative_dataset(path: &Path) -> Result<Vec<NarrativeRecord>> {
    let delimiter = if has_csv_extension(path) { b',' } else { b'\t' };
    let table = read_table(path, delimiter)?;
    let records = narrative_records(&table, path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded narrative dataset");
    Ok(records)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn required_column(table: &SourceTable, column: &str, path: &Path) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

fn narrative_records(table: &SourceTable, path: &Path) -> Result<Vec<NarrativeRecord>> {
    let patient_col = required_column(table, "patient_id", path)?;
    let note_col = required_column(table, "note", path)?;
    let trial_col = table.column_index("trial_id");
    let expert_col = table.column_index("expert_eligibility");

    let mut records = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let Some(patient_id) = table.cell(row, patient_col) else {
            tracing::debug!(row, "skipping narrative row without patient id");
            continue;
        };
        records.push(NarrativeRecord {
            patient_id: patient_id.to_string(),
            trial_id: trial_col.and_then(|col| table.cell(row, col)).map(str::to_string),
            note: table.cell(row, note_col).unwrap_or_default().to_string(),
            expert_eligibility: expert_col
                .and_then(|col| table.cell(row, col))
                .map(str::to_string),
        });
    }
    Ok(records)
}

/// Keep records of one trial, or all records when `trial_id` is `None`.
pub fn filter_by_trial<'a>(
    records: &'a [NarrativeRecord],
    trial_id: Option<&'a str>,
) -> impl Iterator<Item = &'a NarrativeRecord> + 'a {
    records.iter().filter(move |record| match trial_id {
        Some(trial) => record.trial_id.as_deref() == Some(trial),
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DATASET: &str = "patient_id\ttrial_id\tnote\texpert_eligibility\n\
        P1\tNCT03036124\t67-year-old woman, LVEF 32%.\tincluded\n\
        P2\tNCT03057977\tNo history of diabetes.\t\n\
        \tNCT03036124\torphan note\texcluded\n";

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_rows_with_optional_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "block1_data.tsv", DATASET.as_bytes());
        let records = load_narrative_dataset(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].patient_id, "P1");
        assert_eq!(records[0].trial_id.as_deref(), Some("NCT03036124"));
        assert_eq!(records[0].note, "67-year-old woman, LVEF 32%.");
        assert_eq!(records[0].expert_eligibility.as_deref(), Some("included"));
        assert_eq!(records[1].expert_eligibility, None);
    }

    #[test]
    fn decodes_windows_1252() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "notes.tsv",
            b"patient_id\tnote\nP1\tNYHA class II\x96III, 45 \xB5mol/L\n",
        );
        let records = load_narrative_dataset(&path).unwrap();
        assert_eq!(records[0].note, "NYHA class II\u{2013}III, 45 \u{b5}mol/L");
    }

    #[test]
    fn missing_note_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.tsv", b"patient_id\ttext\nP1\thello\n");
        let err = load_narrative_dataset(&path).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "note"));
    }

    #[test]
    fn csv_extension_uses_commas() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.csv", b"patient_id,note\nP9,\"LVEF 30%, NYHA class III\"\n");
        let records = load_narrative_dataset(&path).unwrap();
        assert_eq!(records[0].note, "LVEF 30%, NYHA class III");
    }

    #[test]
    fn filters_by_trial() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "block1_data.tsv", DATASET.as_bytes());
        let records = load_narrative_dataset(&path).unwrap();
        let ids: Vec<&str> = filter_by_trial(&records, Some("NCT03057977"))
            .map(|record| record.patient_id.as_str())
            .collect();
        assert_eq!(ids, vec!["P2"]);
        assert_eq!(filter_by_trial(&records, None).count(), 2);
    }
}
