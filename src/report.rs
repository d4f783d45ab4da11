//! Report templates.
//!
//! A [`ReportTemplate`] bundles a template document with the field
//! mappings configured for it and tracks how often it has been used.

use crate::data::Record;
use crate::error::{Error, Result};
use crate::fill::{DocumentFiller, FillOptions};
use crate::loader;
use crate::model::Document;
use crate::render::JsonFormat;
use crate::template::{parse_template, MappingSet, TemplateInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named template bound to a record model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTemplate {
    /// Report name, also used for output file names
    pub name: String,

    /// Name of the model whose records fill this template
    pub model_name: String,

    /// Serialized template document
    #[serde(skip)]
    pub template_data: Option<Vec<u8>>,

    /// File the template was loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_filename: Option<String>,

    /// Field mappings
    #[serde(default)]
    pub mappings: MappingSet,

    /// Notes for report users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of generated reports
    #[serde(default)]
    pub usage_count: u64,

    /// Last generation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl ReportTemplate {
    /// Create a template without a document attached.
    pub fn new(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_name: model_name.into(),
            ..Self::default()
        }
    }

    /// Attach template bytes and return self.
    pub fn with_template(mut self, data: Vec<u8>, filename: Option<String>) -> Self {
        self.template_data = Some(data);
        self.template_filename = filename;
        self
    }

    /// Attach a template document and return self.
    pub fn with_document(self, doc: &Document) -> Result<Self> {
        let data = crate::render::to_json_bytes(doc, JsonFormat::Compact)?;
        Ok(self.with_template(data, None))
    }

    /// Set the field mappings and return self.
    pub fn with_mappings(mut self, mappings: MappingSet) -> Self {
        self.mappings = mappings;
        self
    }

    /// Whether a template document is attached.
    pub fn has_template(&self) -> bool {
        self.template_data.is_some()
    }

    /// Check that the attached bytes, if any, form a valid document.
    pub fn validate(&self) -> Result<()> {
        match &self.template_data {
            Some(data) => loader::load_document(data).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Load the attached template document.
    pub fn document(&self) -> Result<Document> {
        let data = self.template_data.as_ref().ok_or(Error::TemplateMissing)?;
        loader::load_document(data)
    }

    /// Placeholders and structure of the attached template.
    pub fn info(&self) -> Result<TemplateInfo> {
        Ok(parse_template(&self.document()?))
    }

    /// Discover placeholders and create mappings for new ones.
    ///
    /// Existing mappings are left untouched.
    pub fn parse(&mut self) -> Result<TemplateInfo> {
        let info = self.info()?;
        self.mappings.sync(&info.placeholders);
        log::info!(
            "Found {} field placeholders in template '{}'",
            info.field_count,
            self.name
        );
        Ok(info)
    }

    /// Generate a report for `records` with default options.
    pub fn generate(&self, records: &[Record]) -> Result<Vec<u8>> {
        self.generate_with(records, FillOptions::default(), JsonFormat::default())
    }

    /// Generate a report for `records`.
    ///
    /// Fails before any substitution when the template is missing or
    /// invalid, or when `records` is empty.
    pub fn generate_with(
        &self,
        records: &[Record],
        options: FillOptions,
        format: JsonFormat,
    ) -> Result<Vec<u8>> {
        let doc = self.document()?;
        if records.is_empty() {
            return Err(Error::NoRecords);
        }

        DocumentFiller::new()
            .with_options(options)
            .with_mappings(&self.mappings)
            .with_format(format)
            .generate(doc, records)
    }

    /// Fill the template from a single sample record.
    pub fn preview(&self, record: &Record) -> Result<Vec<u8>> {
        self.generate(std::slice::from_ref(record))
    }

    /// Record one more use of this template.
    pub fn increment_usage(&mut self) {
        self.usage_count += 1;
        self.last_used = Some(Utc::now());
    }

    /// File name for a generated report.
    pub fn output_filename(&self) -> String {
        format!("{}.json", self.name)
    }

    /// File name for a preview report.
    pub fn preview_filename(&self) -> String {
        format!("{}_preview.json", self.name)
    }
}

/// Generate a report and count the use.
pub fn generate_report(template: &mut ReportTemplate, records: &[Record]) -> Result<Vec<u8>> {
    let output = template.generate(records)?;
    template.increment_usage();
    Ok(output)
}
