//! Delimited text tables.
//!
//! Cells are kept as trimmed strings; interpretation belongs to the caller.

use std::path::Path;

use csv::ReaderBuilder;

use crate::encoding::decode_text;
use crate::error::{IngestError, Result};

/// A header row plus data rows, each padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a comma-separated file.
pub fn read_csv_table(path: &Path) -> Result<SourceTable> {
    read_table(path, b',')
}

/// Read a delimited file, decoding it first (see [`decode_text`]).
pub fn read_table(path: &Path, delimiter: u8) -> Result<SourceTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::file(path, e))?;
    let decoded = decode_text(&bytes);
    tracing::trace!(
        path = %path.display(),
        encoding = decoded.encoding,
        "decoded table"
    );
    parse_table(&decoded.text, delimiter).map_err(|err| match err {
        TableError::Csv(source) => IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        },
        TableError::Empty => IngestError::EmptyCsv {
            path: path.to_path_buf(),
        },
    })
}

#[derive(Debug)]
enum TableError {
    Csv(csv::Error),
    Empty,
}

fn parse_table(text: &str, delimiter: u8) -> std::result::Result<SourceTable, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    // Blank lines before the header are skipped; after it, row positions are
    // kept so the first data row stays the first physical record.
    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(TableError::Csv)?;
        let mut row: Vec<String> = record.iter().map(normalize_cell).collect();
        if let Some(header_row) = &headers {
            row.resize(header_row.len(), String::new());
            rows.push(row);
        } else if !row.iter().all(String::is_empty) {
            headers = Some(row.iter().map(|value| normalize_header(value)).collect());
        }
    }

    let Some(headers) = headers else {
        return Err(TableError::Empty);
    };
    Ok(SourceTable { headers, rows })
}

impl SourceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column named `name`, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    /// Index of the first column whose header contains `needle`, ignoring case.
    pub fn column_containing(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        self.headers
            .iter()
            .position(|header| header.to_lowercase().contains(&needle))
    }

    /// Cell at `row`/`column`; empty cells are `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|values| values.get(column))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Non-empty cells of `column`, top to bottom.
    pub fn column_values(&self, column: usize) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column).map(String::as_str))
            .filter(|value| !value.is_empty())
    }
}
