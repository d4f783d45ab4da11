//! Document filling.
//!
//! Substitutes placeholders throughout a document tree and expands table
//! rows carrying a `{{#field}}` loop marker into one row per linked record.

mod options;

pub use options::FillOptions;

use crate::data::{DataObject, FieldValue, Record};
use crate::error::{Error, Result};
use crate::model::{Block, Document, Paragraph, Table, TableRow};
use crate::render::{self, JsonFormat};
use crate::resolve::{error_marker, Resolver};
use crate::template::{strip_loop_markers, MappingSet, PlaceholderExpression, Scanner};
use serde::{Deserialize, Serialize};

/// Counters collected while filling a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStats {
    /// Records applied to the document
    pub records: usize,

    /// Placeholders substituted (including error markers)
    pub placeholders: usize,

    /// Placeholders rendered as `[Error: <path>]`
    pub errors: usize,

    /// Rows added by loop expansion
    pub rows_inserted: usize,
}

impl FillStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the counters of `other` to these.
    pub fn merge(&mut self, other: FillStats) {
        self.records += other.records;
        self.placeholders += other.placeholders;
        self.errors += other.errors;
        self.rows_inserted += other.rows_inserted;
    }

    /// Whether any placeholder failed to resolve.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Fills document templates from records.
#[derive(Debug, Clone)]
pub struct DocumentFiller<'a> {
    options: FillOptions,
    mappings: Option<&'a MappingSet>,
    format: JsonFormat,
    scanner: &'static Scanner,
}

impl<'a> DocumentFiller<'a> {
    /// Create a filler with default options.
    pub fn new() -> Self {
        Self {
            options: FillOptions::default(),
            mappings: None,
            format: JsonFormat::default(),
            scanner: Scanner::shared(),
        }
    }

    /// Set fill options.
    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }

    /// Use defaults and fallback formatters from `mappings`.
    pub fn with_mappings(mut self, mappings: &'a MappingSet) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Set the output format used by [`generate`](Self::generate).
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Current options.
    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    /// Fill `doc` in place from a single record.
    ///
    /// Body paragraphs, table cells and every section's header and footer
    /// are resolved against `record`. Never fails: a placeholder that
    /// cannot be resolved is replaced by an inline error marker.
    pub fn fill(&self, doc: &mut Document, record: &dyn DataObject) -> FillStats {
        let resolver = self.resolver();
        let mut stats = FillStats {
            records: 1,
            ..FillStats::default()
        };

        for block in doc.blocks.iter_mut() {
            match block {
                Block::Paragraph(p) => self.fill_paragraph(p, record, None, &resolver, &mut stats),
                Block::Table(t) => self.fill_table(t, record, &resolver, &mut stats),
                Block::PageBreak => {}
            }
        }

        for section in doc.sections.iter_mut() {
            for p in section.paragraphs_mut() {
                self.fill_paragraph(p, record, None, &resolver, &mut stats);
            }
        }

        stats
    }

    /// Fill `doc` in place from an ordered record set.
    ///
    /// The first record is applied in place. Each later record is applied
    /// to the already-filled document, after a page break when enabled.
    /// Fails with [`Error::NoRecords`] before touching `doc` when `records`
    /// is empty.
    pub fn fill_all(&self, doc: &mut Document, records: &[Record]) -> Result<FillStats> {
        let (first, rest) = records.split_first().ok_or(Error::NoRecords)?;
        log::info!("Generating report for {} record(s)", records.len());

        let mut stats = self.fill(doc, first.as_ref());

        // The document is not reset between records. Placeholders and loop
        // markers consumed by the first record are gone, so later records
        // only see whatever template text survived the earlier passes.
        for record in rest {
            if self.options.page_break_between_records {
                doc.add_page_break();
            }
            stats.merge(self.fill(doc, record.as_ref()));
        }

        if stats.has_errors() {
            log::warn!("{} placeholder(s) could not be resolved", stats.errors);
        }
        Ok(stats)
    }

    /// Fill `doc` from `records` and serialize the result.
    pub fn generate(&self, mut doc: Document, records: &[Record]) -> Result<Vec<u8>> {
        self.fill_all(&mut doc, records)?;
        render::to_json_bytes(&doc, self.format)
    }

    fn resolver(&self) -> Resolver<'a> {
        let resolver = Resolver::new().with_separator(self.options.list_separator.clone());
        match self.mappings {
            Some(mappings) => resolver.with_mappings(mappings),
            None => resolver,
        }
    }

    fn fill_table(
        &self,
        table: &mut Table,
        record: &dyn DataObject,
        resolver: &Resolver<'_>,
        stats: &mut FillStats,
    ) {
        let mut index = 0;
        while index < table.rows.len() {
            match self.scanner.first_loop(&table.rows[index].joined_text()) {
                Some(field) => {
                    index = self.expand_loop(table, index, &field, record, resolver, stats);
                }
                None => {
                    self.fill_row(&mut table.rows[index], record, None, resolver, stats);
                    index += 1;
                }
            }
        }
    }

    /// Expand the loop row at `index`, returning the index of the next
    /// unprocessed row.
    fn expand_loop(
        &self,
        table: &mut Table,
        index: usize,
        field: &str,
        record: &dyn DataObject,
        resolver: &Resolver<'_>,
        stats: &mut FillStats,
    ) -> usize {
        let elements = loop_elements(record, field, stats);
        log::debug!(
            "Expanding loop '{}' over {} element(s)",
            field,
            elements.len()
        );

        let Some((first, rest)) = elements.split_first() else {
            self.fill_row(&mut table.rows[index], record, Some(field), resolver, stats);
            return index + 1;
        };

        let template = table.rows[index].duplicate();
        self.fill_row(&mut table.rows[index], first.as_ref(), Some(field), resolver, stats);

        for (offset, element) in rest.iter().enumerate() {
            let mut row = template.clone();
            self.fill_row(&mut row, element.as_ref(), Some(field), resolver, stats);
            table.insert_row_after(index + offset, row);
            stats.rows_inserted += 1;
        }

        index + elements.len()
    }

    fn fill_row(
        &self,
        row: &mut TableRow,
        record: &dyn DataObject,
        loop_field: Option<&str>,
        resolver: &Resolver<'_>,
        stats: &mut FillStats,
    ) {
        for p in row.paragraphs_mut() {
            self.fill_paragraph(p, record, loop_field, resolver, stats);
        }
    }

    /// Substitute placeholders in one paragraph.
    ///
    /// The paragraph is only rewritten when its text changes, so untouched
    /// paragraphs keep their run structure.
    fn fill_paragraph(
        &self,
        paragraph: &mut Paragraph,
        record: &dyn DataObject,
        loop_field: Option<&str>,
        resolver: &Resolver<'_>,
        stats: &mut FillStats,
    ) {
        let text = paragraph.text();
        if text.is_empty() {
            return;
        }

        let source = match loop_field {
            Some(field) => strip_loop_markers(&text, field),
            None => text.clone(),
        };
        let filled = self.scanner.replace(&source, |raw| {
            let expr = PlaceholderExpression::parse(raw);
            stats.placeholders += 1;
            resolver.try_resolve(record, &expr).unwrap_or_else(|e| {
                log::warn!(
                    "Error getting field value for {}: {}",
                    expr.path_string(),
                    e
                );
                stats.errors += 1;
                error_marker(&expr)
            })
        });

        if filled != text {
            paragraph.replace_text(filled);
        }
    }
}

impl Default for DocumentFiller<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Records a loop row is repeated over.
///
/// A to-one link counts as a single element; a scalar or missing field
/// counts as none.
fn loop_elements(record: &dyn DataObject, field: &str, stats: &mut FillStats) -> Vec<Record> {
    match record.get_field(field) {
        Ok(Some(FieldValue::Reference(r))) => r.records().to_vec(),
        Ok(_) => Vec::new(),
        Err(e) => {
            log::warn!("Error getting loop field {}: {}", field, e);
            stats.errors += 1;
            Vec::new()
        }
    }
}

/// Fill `doc` in place from a single record with default options.
pub fn fill(doc: &mut Document, record: &dyn DataObject) -> FillStats {
    DocumentFiller::new().fill(doc, record)
}

/// Fill `doc` from `records` with default options and serialize the result.
pub fn generate(doc: Document, records: &[Record]) -> Result<Vec<u8>> {
    DocumentFiller::new().generate(doc, records)
}
