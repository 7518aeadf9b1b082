//! Extraction adapters that turn clinical source data into a [`PatientProfile`].
//!
//! - [`adapt_narrative`]: one free-text note, via pattern and keyword extractors
//! - [`MergeAdapter`]: a patient's note, lab and urinalysis files, via
//!   per-attribute source priority chains
//!
//! Adapters never fail. Anything that cannot be extracted stays unknown.
//!
//! [`PatientProfile`]: elig_model::PatientProfile

#![deny(unsafe_code)]

mod merge;
mod narrative;
pub mod patterns;

pub use merge::{LabAnalyte, MergeAdapter, merge_sources, scan_long_form, scan_wide_form};
pub use narrative::{DEFAULT_NOTE_ARTIFACT, adapt_narrative, adapt_narrative_from};
