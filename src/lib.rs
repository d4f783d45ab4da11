//! # docfill
//!
//! Document templating engine for Rust.
//!
//! This library fills structured document templates from record data:
//! `{{field.path|formatter}}` placeholders are resolved through an object
//! graph and substituted in place, and table rows marked with
//! `{{#field}}...{{/field}}` are repeated once per linked record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docfill::{load_file, JsonRecord};
//!
//! fn main() -> docfill::Result<()> {
//!     let mut doc = load_file("invoice.template.json")?;
//!
//!     let data = std::fs::read("invoice.data.json")?;
//!     let records = JsonRecord::records_from_slice(&data)?;
//!
//!     let stats = docfill::DocumentFiller::new().fill_all(&mut doc, &records)?;
//!     println!("{} placeholders", stats.placeholders);
//!     println!("{}", docfill::render::to_text(&doc));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Dotted paths**: `partner_id.country_id.name`, with to-many links
//!   flattened into `", "`-joined lists
//! - **Formatters**: `date:`, `number:`, `upper`, `lower`, `title`
//! - **Loop rows**: one table row per element of a collection field
//! - **Contained failures**: a bad placeholder renders as `[Error: path]`
//!   instead of aborting the report
//! - **Field mappings**: per-path defaults and fallback formatters

pub mod data;
pub mod error;
pub mod fill;
pub mod loader;
pub mod model;
pub mod render;
pub mod report;
pub mod resolve;
pub mod template;

// Re-export commonly used types
pub use data::{DataObject, FieldValue, JsonRecord, Record, Reference, Scalar};
pub use error::{Error, Result};
pub use fill::{DocumentFiller, FillOptions, FillStats};
pub use loader::{
    detect_format_from_bytes, detect_format_from_path, is_template, load_document, load_file,
    TemplateFormat,
};
pub use model::{
    Alignment, Block, Document, Metadata, Paragraph, ParagraphStyle, Section, Table, TableCell,
    TableRow, TextRun, TextStyle,
};
pub use render::JsonFormat;
pub use report::{generate_report, ReportTemplate};
pub use resolve::Resolver;
pub use template::{
    extract_placeholders, parse_template, scan, FieldMapping, FieldType, Formatter, MappingSet,
    PlaceholderExpression, Scanner, TemplateInfo, TemplateStructure,
};

use std::collections::BTreeSet;
use std::path::Path;

/// List the distinct field paths used by a template file.
///
/// # Example
///
/// ```no_run
/// use docfill::scan_file;
///
/// for path in scan_file("invoice.template.json").unwrap() {
///     println!("{}", path);
/// }
/// ```
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let doc = load_file(path)?;
    Ok(extract_placeholders(&doc))
}

/// Fill a template file from records and return the filled document.
///
/// # Example
///
/// ```no_run
/// use docfill::{fill_file, JsonRecord};
/// use serde_json::json;
///
/// let records = JsonRecord::records_from_value(json!({"name": "SO001"})).unwrap();
/// let doc = fill_file("order.template.json", &records).unwrap();
/// println!("{}", doc.plain_text());
/// ```
pub fn fill_file<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<Document> {
    let mut doc = load_file(path)?;
    DocumentFiller::new().fill_all(&mut doc, records)?;
    Ok(doc)
}

/// Fill template bytes from records and return the serialized result.
pub fn generate(template: &[u8], records: &[Record]) -> Result<Vec<u8>> {
    let doc = load_document(template)?;
    fill::generate(doc, records)
}

/// Builder for filling templates.
///
/// # Example
///
/// ```no_run
/// use docfill::{Docfill, JsonRecord};
/// use serde_json::json;
///
/// let records = JsonRecord::records_from_value(json!([{"name": "A"}, {"name": "B"}]))?;
/// let json = Docfill::new()
///     .load_mappings("invoice.mappings.json")?
///     .with_separator("; ")
///     .compact()
///     .fill_file("invoice.template.json", &records)?
///     .to_json()?;
/// # Ok::<(), docfill::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docfill {
    mappings: MappingSet,
    fill_options: FillOptions,
    format: JsonFormat,
}

impl Docfill {
    /// Create a new Docfill builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use field mappings.
    pub fn with_mappings(mut self, mappings: MappingSet) -> Self {
        self.mappings = mappings;
        self
    }

    /// Load field mappings from a JSON file.
    pub fn load_mappings<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.mappings = MappingSet::load(path)?;
        Ok(self)
    }

    /// Set the separator for flattened to-many values.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.fill_options = self.fill_options.with_separator(separator);
        self
    }

    /// Disable page breaks between records.
    pub fn without_page_breaks(mut self) -> Self {
        self.fill_options = self.fill_options.without_page_breaks();
        self
    }

    /// Set fill options.
    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.fill_options = options;
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.format = JsonFormat::Compact;
        self
    }

    /// Fill a document from records.
    pub fn fill(&self, mut document: Document, records: &[Record]) -> Result<DocfillResult> {
        let stats = self.filler().fill_all(&mut document, records)?;
        Ok(DocfillResult {
            document,
            stats,
            format: self.format,
        })
    }

    /// Fill a template file from records.
    pub fn fill_file<P: AsRef<Path>>(&self, path: P, records: &[Record]) -> Result<DocfillResult> {
        self.fill(load_file(path)?, records)
    }

    /// Fill template bytes from records and serialize the result.
    pub fn generate(&self, template: &[u8], records: &[Record]) -> Result<Vec<u8>> {
        self.filler()
            .with_format(self.format)
            .generate(load_document(template)?, records)
    }

    fn filler(&self) -> DocumentFiller<'_> {
        DocumentFiller::new()
            .with_options(self.fill_options.clone())
            .with_mappings(&self.mappings)
    }
}

/// Result of filling a template.
#[derive(Debug, Clone)]
pub struct DocfillResult {
    /// The filled document
    pub document: Document,
    /// Fill statistics
    pub stats: FillStats,
    format: JsonFormat,
}

impl DocfillResult {
    /// Convert to JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.document, self.format)
    }

    /// Convert to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        render::to_json_bytes(&self.document, self.format)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
