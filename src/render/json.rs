//! JSON rendering for documents.

use crate::error::{Error, Result};
use crate::model::Document;
use serde::{Deserialize, Serialize};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a document to JSON bytes.
pub fn to_json_bytes(doc: &Document, format: JsonFormat) -> Result<Vec<u8>> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_vec_pretty(doc),
        JsonFormat::Compact => serde_json::to_vec(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Parse a document from its JSON form.
pub fn from_json(data: &[u8]) -> Result<Document> {
    serde_json::from_slice(data).map_err(|e| Error::InvalidDocument(e.to_string()))
}
