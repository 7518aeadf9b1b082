//! Source data loading for eligibility screening.
//!
//! This crate is the I/O boundary of the workspace: everything that touches
//! the file system lives here, and everything it returns is plain data.
//!
//! # Features
//!
//! - **Tables**: Read CSV/TSV files into string tables, decoding UTF-8,
//!   UTF-16 (BOM) and Windows-1252 exports
//! - **Patient Discovery**: Find per-patient source files by naming layout
//! - **Narrative Datasets**: Load one-note-per-row TSV datasets
//! - **Protocols**: Load and validate protocol JSON
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use elig_ingest::{SourceLayout, list_csv_files, discover_patient_ids, load_patient_sources};
//!
//! let dir = Path::new("data/Study W01/Eligible Patients");
//! let layout = SourceLayout::default();
//!
//! let files = list_csv_files(dir)?;
//! for patient_id in discover_patient_ids(&files, &layout) {
//!     let sources = load_patient_sources(dir, &patient_id, &layout);
//! }
//! ```

mod discovery;
mod encoding;
mod error;
mod narrative;
mod protocol;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Tables ===
pub use encoding::{DecodedText, decode_text};
pub use table::{SourceTable, read_csv_table, read_table};

// === Patient Discovery ===
pub use discovery::{
    LoadedTable, PatientSources, SourceLayout, discover_patient_ids, list_csv_files,
    load_patient_sources,
};

// === Narrative Datasets ===
pub use narrative::{NarrativeRecord, filter_by_trial, load_narrative_dataset};

// === Protocols ===
pub use protocol::{ProtocolDocument, load_protocol, parse_protocol};
