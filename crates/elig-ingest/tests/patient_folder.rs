use std::fs;
use std::path::Path;

use elig_ingest::{
    IngestError, SourceLayout, discover_patient_ids, list_csv_files, load_patient_sources,
    load_protocol,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

fn study_folder() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path(),
        "P0001_anamnesis.csv",
        "patient_id,narrative_note\nP0001,\"Type 2 diabetes, on metformin.\"\n",
    );
    write(
        dir.path(),
        "P0001_renal_labs.csv",
        "test_name,value,unit\neGFR,38,mL/min\neGFR,41,mL/min\n",
    );
    write(
        dir.path(),
        "P0001_urinalysis.csv",
        "test_name,value\nUrine albumin/creatinine ratio,310\n",
    );
    write(dir.path(), "P0002_blood_labs.csv", "date,egfr\n2024-01-01,55\n");
    dir
}

#[test]
fn discovers_and_loads_patient_sources() {
    let dir = study_folder();
    let layout = SourceLayout::default();

    let files = list_csv_files(dir.path()).expect("list files");
    assert_eq!(files.len(), 4);
    assert_eq!(discover_patient_ids(&files, &layout), vec!["P0001", "P0002"]);

    let sources = load_patient_sources(dir.path(), "P0001", &layout);
    assert_eq!(sources.notes.len(), 1);
    assert!(sources.notes[0].artifact.ends_with("P0001_anamnesis.csv"));
    let note = &sources.notes[0].table;
    let column = note.column_index("narrative_note").expect("note column");
    assert_eq!(note.cell(0, column), Some("Type 2 diabetes, on metformin."));
    assert_eq!(sources.labs[0].table.row_count(), 2);
    assert_eq!(sources.urinalysis.len(), 1);

    let other = load_patient_sources(dir.path(), "P0002", &layout);
    assert!(other.notes.is_empty());
    assert_eq!(other.labs[0].table.headers, vec!["date", "egfr"]);
}

#[test]
fn custom_layout_changes_file_names() {
    let dir = study_folder();
    let layout = SourceLayout {
        lab_sources: vec!["blood_labs".to_string()],
        ..SourceLayout::default()
    };
    let sources = load_patient_sources(dir.path(), "P0001", &layout);
    assert!(sources.labs.is_empty());
}

#[test]
fn missing_protocol_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let err = load_protocol(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(!err.is_configuration());
}

#[test]
fn protocol_file_round_trip_through_disk() {
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path(),
        "w01.json",
        r#"{"name": "W01", "rules": [
            {"id": "R1", "type": "inclusion", "field": "egfr", "operator": ">=", "value": 25},
            {"id": "R2", "type": "inclusion", "field": "uacr", "operator": ">=", "value": 200},
            {"id": "R3", "type": "exclusion", "field": "type1_diabetes", "operator": "==", "value": true}
        ]}"#,
    );
    let document = load_protocol(&dir.path().join("w01.json")).expect("load protocol");
    assert_eq!(document.name.as_deref(), Some("W01"));
    let ids: Vec<&str> = document.protocol.iter().map(|rule| rule.id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2", "R3"]);
}
