//! Template document detection and loading.

use crate::error::{Error, Result};
use crate::model::Document;
use crate::render;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Bytes inspected when detecting from a file.
const SNIFF_LEN: u64 = 1024;

/// Template format information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFormat {
    /// Whether the data starts with a UTF-8 byte order mark
    pub bom: bool,
}

impl std::fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON document")?;
        if self.bom {
            write!(f, " (BOM)")?;
        }
        Ok(())
    }
}

/// Detect the template format from a file path.
///
/// # Example
/// ```no_run
/// use docfill::loader::detect_format_from_path;
///
/// let format = detect_format_from_path("invoice.json").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<TemplateFormat> {
    let mut header = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the template format from the leading bytes of a file.
///
/// A template is a JSON object: after an optional BOM and leading
/// whitespace the first byte must be `{`.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<TemplateFormat> {
    let bom = data.starts_with(UTF8_BOM);
    let body = if bom { &data[UTF8_BOM.len()..] } else { data };

    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(TemplateFormat { bom }),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if a file looks like a template document.
pub fn is_template<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes look like a template document.
pub fn is_template_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Parse a template document from bytes.
///
/// Fails with [`Error::InvalidDocument`] when the data is not a document,
/// before any substitution can happen.
pub fn load_document(data: &[u8]) -> Result<Document> {
    let format = detect_format_from_bytes(data)
        .map_err(|_| Error::InvalidDocument("expected a JSON object".to_string()))?;
    let body = if format.bom {
        &data[UTF8_BOM.len()..]
    } else {
        data
    };
    render::from_json(body)
}

/// Read and parse a template document from a file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = std::fs::read(path.as_ref())?;
    log::debug!("Loaded {} bytes from {}", data.len(), path.as_ref().display());
    load_document(&data)
}
