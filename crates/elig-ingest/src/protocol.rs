//! Protocol JSON loading.
//!
//! Accepted shapes:
//!
//! ```json
//! [{"id": "R1", "type": "inclusion", "field": "lvef", "operator": "<=", "value": 40}]
//! ```
//!
//! or an object with optional `name` and `trial_id` around the same `rules` array.

use std::path::Path;

use elig_model::{Protocol, RawRule};
use serde::Deserialize;

use crate::error::{IngestError, Result};

/// A validated protocol and its optional labels.
#[derive(Debug, Clone)]
pub struct ProtocolDocument {
    pub name: Option<String>,
    pub trial_id: Option<String>,
    pub protocol: Protocol,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Rules(Vec<RawRule>),
    Named {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        trial_id: Option<String>,
        rules: Vec<RawRule>,
    },
}

/// Read and validate a protocol file.
pub fn load_protocol(path: &Path) -> Result<ProtocolDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::file(path, e))?;
    let document = parse_protocol(&text, path)?;
    tracing::debug!(
        path = %path.display(),
        rules = document.protocol.len(),
        "loaded protocol"
    );
    Ok(document)
}

/// Parse protocol JSON; `path` is only used in errors.
pub fn parse_protocol(text: &str, path: &Path) -> Result<ProtocolDocument> {
    let raw: RawDocument =
        serde_json::from_str(text).map_err(|source| IngestError::ProtocolParse {
            path: path.to_path_buf(),
            source,
        })?;
    let (name, trial_id, rules) = match raw {
        RawDocument::Rules(rules) => (None, None, rules),
        RawDocument::Named {
            name,
            trial_id,
            rules,
        } => (name, trial_id, rules),
    };
    let protocol = Protocol::new(rules).map_err(|source| IngestError::ProtocolInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ProtocolDocument {
        name,
        trial_id,
        protocol,
    })
}
