//! Field-mapping configuration.
//!
//! A mapping attaches presentation settings (a default for empty values, a
//! fallback formatter) to one field path used by a template. Mapping sets
//! are plain data; they are stored as JSON next to the template.

use crate::data::DataObject;
use crate::error::Result;
use crate::resolve::Resolver;
use crate::template::PlaceholderExpression;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of value a mapped field holds. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line text
    #[default]
    Text,
    /// Multi-line text
    MultilineText,
    /// Whole number
    Integer,
    /// Decimal number
    Decimal,
    /// Monetary amount
    Monetary,
    /// Boolean flag
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// Choice among fixed values
    Selection,
    /// Link to one record
    Reference,
    /// Link to many records
    Collection,
    /// Binary payload
    Binary,
    /// Rich text
    Html,
}

/// Presentation settings for one field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Label shown to template authors
    pub field_name: String,

    /// Dotted path, e.g. `partner_id.name`
    pub field_path: String,

    /// Kind of value
    #[serde(default)]
    pub field_type: FieldType,

    /// Formatter spec used when the placeholder has none, e.g. `date:%d/%m/%Y`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_string: Option<String>,

    /// Text substituted when the value is missing or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Processing order
    #[serde(default = "default_sequence")]
    pub sequence: i32,

    /// Notes for template authors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_sequence() -> i32 {
    10
}

impl FieldMapping {
    /// Mapping for `path`, labelled with its last segment.
    pub fn new(path: impl Into<String>) -> Self {
        let field_path = path.into();
        let field_name = field_path
            .rsplit('.')
            .next()
            .unwrap_or(&field_path)
            .to_string();
        Self {
            field_name,
            field_path,
            field_type: FieldType::default(),
            format_string: None,
            default_value: None,
            sequence: default_sequence(),
            description: None,
        }
    }

    /// Set the default value and return self.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the fallback formatter spec and return self.
    pub fn with_format(mut self, spec: impl Into<String>) -> Self {
        self.format_string = Some(spec.into());
        self
    }

    /// Set the field type and return self.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Set the sequence and return self.
    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    /// The placeholder an author types for this field.
    pub fn placeholder(&self) -> String {
        if self.field_path.is_empty() {
            String::new()
        } else {
            format!("{{{{{}}}}}", self.field_path)
        }
    }

    /// Resolve this mapping against a sample record.
    pub fn sample_value(&self, record: &dyn DataObject) -> String {
        let mappings = MappingSet::from(vec![self.clone()]);
        Resolver::new()
            .with_mappings(&mappings)
            .resolve(record, &PlaceholderExpression::parse(&self.field_path))
    }
}

/// The mappings configured for one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingSet {
    mappings: Vec<FieldMapping>,
}

impl MappingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, replacing one with the same path.
    pub fn insert(&mut self, mapping: FieldMapping) {
        match self
            .mappings
            .iter()
            .position(|m| m.field_path == mapping.field_path)
        {
            Some(index) => self.mappings[index] = mapping,
            None => self.mappings.push(mapping),
        }
        self.sort();
    }

    /// Mapping for `path`.
    pub fn get(&self, path: &str) -> Option<&FieldMapping> {
        self.mappings.iter().find(|m| m.field_path == path)
    }

    /// Remove the mapping for `path`.
    pub fn remove(&mut self, path: &str) -> Option<FieldMapping> {
        let index = self.mappings.iter().position(|m| m.field_path == path)?;
        Some(self.mappings.remove(index))
    }

    /// Configured default for `path`.
    pub fn default_for(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|m| m.default_value.as_deref())
    }

    /// Configured formatter spec for `path`.
    pub fn format_for(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|m| m.format_string.as_deref())
    }

    /// Create mappings for discovered paths that have none yet.
    ///
    /// Existing mappings are never modified or removed. Returns the number
    /// of mappings created.
    pub fn sync<I, S>(&mut self, placeholders: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut created = 0;
        for path in placeholders {
            let path = path.as_ref();
            if self.get(path).is_none() {
                self.mappings.push(FieldMapping::new(path));
                created += 1;
            }
        }
        if created > 0 {
            log::info!("Created {} field mapping(s)", created);
            self.sort();
        }
        created
    }

    /// Mappings ordered by sequence, then field name.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.iter()
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Resolve every mapped path against a sample record.
    pub fn preview(&self, record: &dyn DataObject) -> Vec<(String, String)> {
        let resolver = Resolver::new().with_mappings(self);
        self.mappings
            .iter()
            .map(|m| {
                let expr = PlaceholderExpression::parse(&m.field_path);
                (m.field_path.clone(), resolver.resolve(record, &expr))
            })
            .collect()
    }

    /// Parse a mapping set from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut set: Self = serde_json::from_str(json)?;
        set.sort();
        Ok(set)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a mapping set from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write this mapping set to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn sort(&mut self) {
        self.mappings.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then_with(|| a.field_name.cmp(&b.field_name))
        });
    }
}

impl From<Vec<FieldMapping>> for MappingSet {
    fn from(mappings: Vec<FieldMapping>) -> Self {
        let mut set = Self { mappings };
        set.sort();
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::JsonRecord;
    use serde_json::json;

    #[test]
    fn test_new_mapping() {
        let m = FieldMapping::new("partner_id.country_id.name");
        assert_eq!(m.field_name, "name");
        assert_eq!(m.sequence, 10);
        assert_eq!(m.placeholder(), "{{partner_id.country_id.name}}");
        assert_eq!(FieldMapping::new("").placeholder(), "");
    }

    #[test]
    fn test_sync_creates_only_missing() {
        let mut set = MappingSet::new();
        set.insert(FieldMapping::new("name").with_default("N/A"));

        let created = set.sync(["name", "email", "partner_id.phone"]);
        assert_eq!(created, 2);
        assert_eq!(set.len(), 3);
        assert_eq!(set.default_for("name"), Some("N/A"));
        assert_eq!(set.get("partner_id.phone").unwrap().field_name, "phone");

        assert_eq!(set.sync(["name"]), 0);
    }

    #[test]
    fn test_ordering() {
        let set = MappingSet::from(vec![
            FieldMapping::new("zeta"),
            FieldMapping::new("alpha").with_sequence(20),
            FieldMapping::new("beta"),
        ]);
        let order: Vec<&str> = set.iter().map(|m| m.field_path.as_str()).collect();
        assert_eq!(order, vec!["beta", "zeta", "alpha"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = MappingSet::new();
        set.insert(FieldMapping::new("date").with_format("date:%d/%m/%Y"));
        set.insert(FieldMapping::new("date").with_format("date:%Y"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.format_for("date"), Some("date:%Y"));
        assert!(set.remove("date").is_some());
        assert!(set.is_empty());
    }

    #[test]
    fn test_json_roundtrip_with_defaults() {
        let set = MappingSet::from_json(
            r#"[{"field_name": "Email", "field_path": "email", "default_value": "-"}]"#,
        )
        .unwrap();
        let m = set.get("email").unwrap();
        assert_eq!(m.sequence, 10);
        assert_eq!(m.field_type, FieldType::Text);

        let json = set.to_json().unwrap();
        assert!(json.contains("\"default_value\": \"-\""));
        assert!(!json.contains("format_string"));
    }

    #[test]
    fn test_preview_and_sample() {
        let record = JsonRecord::from_value(json!({"name": "acme", "email": null})).unwrap();
        let set = MappingSet::from(vec![
            FieldMapping::new("name").with_format("upper"),
            FieldMapping::new("email").with_default("none"),
        ]);

        let preview = set.preview(&record);
        assert!(preview.contains(&("name".to_string(), "ACME".to_string())));
        assert!(preview.contains(&("email".to_string(), "none".to_string())));

        let m = FieldMapping::new("email").with_default("n/a");
        assert_eq!(m.sample_value(&record), "n/a");
    }
}
