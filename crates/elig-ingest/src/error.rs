//! Error types for source data ingestion.

use std::path::PathBuf;

use elig_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading source files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Parsing Errors ===
    /// Failed to parse delimited text.
    #[error("failed to parse table {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Table has no header row.
    #[error("table is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Required column not found.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Protocol Errors ===
    /// Protocol file is not valid JSON or does not have the rule shape.
    #[error("failed to parse protocol {path}: {source}")]
    ProtocolParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Protocol parsed but contains an invalid rule.
    #[error("invalid protocol {path}: {source}")]
    ProtocolInvalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    /// Maps an I/O error on `path` to `FileNotFound` or `FileRead`.
    pub(crate) fn file(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    /// Whether this error is a fatal protocol configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ProtocolParse { .. } | Self::ProtocolInvalid { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
