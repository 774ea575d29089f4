//! # Document Loading
//!
//! Reads snapshot documents into the `serde_yaml::Value` model the field
//! checker operates on. The format is chosen from the file extension:
//! `.json` is parsed as JSON, everything else as YAML.

use std::path::Path;

use serde_yaml::Value;
use thiserror::Error;

/// A document could not be read or parsed.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid YAML or JSON.
    #[error("cannot parse '{path}': {reason}")]
    Parse {
        /// Path of the document, or `<inline>` for string input.
        path: String,
        /// Parser message.
        reason: String,
    },
}

/// Load a YAML or JSON document from a file.
///
/// # Errors
///
/// [`DocumentError::Io`] when the file cannot be read,
/// [`DocumentError::Parse`] when its content does not parse.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parsed = match ext {
        "json" => parse_json(&content),
        _ => parse_yaml(&content),
    };
    parsed.map_err(|e| match e {
        DocumentError::Parse { reason, .. } => DocumentError::Parse {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// Parse a YAML document.
pub fn parse_yaml(content: &str) -> Result<Value, DocumentError> {
    serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
        path: "<inline>".to_string(),
        reason: format!("invalid YAML: {e}"),
    })
}

/// Parse a JSON document into the YAML value model.
pub fn parse_json(content: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(content).map_err(|e| DocumentError::Parse {
        path: "<inline>".to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}
