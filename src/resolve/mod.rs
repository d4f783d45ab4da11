//! Path resolution.
//!
//! Walks a dotted field path from a root record to a terminal value and
//! renders it through the placeholder's formatter. Missing or empty links
//! short-circuit to the empty string (or a configured default); to-many
//! links met mid-path flatten into a `", "`-joined list of per-record
//! results. Failures raised by a record are contained per placeholder and
//! rendered as `[Error: <path>]`.

pub mod format;

use crate::data::{DataObject, FieldValue, Record, Scalar};
use crate::error::{Error, Result};
use crate::template::{Formatter, MappingSet, PlaceholderExpression};

/// Default separator for flattened to-many values.
pub const LIST_SEPARATOR: &str = ", ";

/// Terminal outcome of walking a path, before formatting.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Missing or empty value
    Empty,
    /// A plain value
    Scalar(Scalar),
    /// One or more linked records, rendered by display name
    Records(Vec<String>),
    /// Already-rendered text from a flattened to-many traversal
    Text(String),
}

/// Resolves placeholder expressions against records.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    mappings: Option<&'a MappingSet>,
    separator: String,
}

impl<'a> Resolver<'a> {
    /// Create a resolver without mapping configuration.
    pub fn new() -> Self {
        Self {
            mappings: None,
            separator: LIST_SEPARATOR.to_string(),
        }
    }

    /// Use defaults and fallback formatters from `mappings`.
    pub fn with_mappings(mut self, mappings: &'a MappingSet) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Set the separator for flattened to-many values.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Resolve `expr` against `root`. Never fails.
    pub fn resolve(&self, root: &dyn DataObject, expr: &PlaceholderExpression) -> String {
        self.try_resolve(root, expr).unwrap_or_else(|e| {
            log::warn!(
                "Error getting field value for {}: {}",
                expr.path_string(),
                e
            );
            error_marker(expr)
        })
    }

    /// Parse and resolve a raw placeholder expression.
    pub fn resolve_str(&self, root: &dyn DataObject, raw: &str) -> String {
        self.resolve(root, &PlaceholderExpression::parse(raw))
    }

    /// Resolve `expr`, surfacing record failures.
    pub fn try_resolve(
        &self,
        root: &dyn DataObject,
        expr: &PlaceholderExpression,
    ) -> Result<String> {
        let path = expr.path_string();
        let configured = self
            .mappings
            .and_then(|m| m.format_for(&path))
            .and_then(Formatter::parse);
        let formatter = expr.formatter.as_ref().or(configured.as_ref());

        let value = match self.walk(root, &expr.path, formatter)? {
            Resolved::Empty => self.default_for(&path),
            other => self.render(other, formatter),
        };
        Ok(value)
    }

    /// Walk `path` from `current` to its terminal value.
    ///
    /// `formatter` is only consulted when a to-many link flattens the
    /// remaining path, since each element is rendered on its own.
    pub fn walk(
        &self,
        current: &dyn DataObject,
        path: &[String],
        formatter: Option<&Formatter>,
    ) -> Result<Resolved> {
        let Some((segment, rest)) = path.split_first() else {
            return Ok(Resolved::Empty);
        };

        let field = current.get_field(segment)?;

        if rest.is_empty() {
            return Ok(match field {
                None => Resolved::Empty,
                Some(value) if value.is_empty() => Resolved::Empty,
                Some(FieldValue::Scalar(s)) => Resolved::Scalar(s),
                Some(FieldValue::Reference(r)) => Resolved::Records(r.display_names()),
            });
        }

        match field {
            None => Ok(Resolved::Empty),
            Some(value) if value.is_empty() => Ok(Resolved::Empty),
            Some(FieldValue::Scalar(_)) => Err(Error::Field(format!(
                "cannot traverse into scalar field '{}'",
                segment
            ))),
            Some(FieldValue::Reference(r)) if r.is_multi() => {
                let parts = r
                    .records()
                    .iter()
                    .map(|record| self.resolve_element(record, rest, formatter))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Resolved::Text(parts.join(&self.separator)))
            }
            Some(FieldValue::Reference(r)) => match r.records().first() {
                Some(record) => self.walk(record.as_ref(), rest, formatter),
                None => Ok(Resolved::Empty),
            },
        }
    }

    /// Render one element of a flattened to-many traversal.
    fn resolve_element(
        &self,
        record: &Record,
        rest: &[String],
        formatter: Option<&Formatter>,
    ) -> Result<String> {
        Ok(match self.walk(record.as_ref(), rest, formatter)? {
            Resolved::Empty => String::new(),
            other => self.render(other, formatter),
        })
    }

    /// Format a non-empty terminal value.
    fn render(&self, resolved: Resolved, formatter: Option<&Formatter>) -> String {
        match resolved {
            Resolved::Empty => String::new(),
            Resolved::Scalar(s) => format::apply(&s, formatter),
            Resolved::Records(names) => names
                .into_iter()
                .map(|name| format::apply(&Scalar::Text(name), formatter))
                .collect::<Vec<_>>()
                .join(&self.separator),
            Resolved::Text(text) => text,
        }
    }

    fn default_for(&self, path: &str) -> String {
        self.mappings
            .and_then(|m| m.default_for(path))
            .unwrap_or_default()
            .to_string()
    }
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline marker substituted for a placeholder that failed to resolve.
pub fn error_marker(expr: &PlaceholderExpression) -> String {
    format!("[Error: {}]", expr.path_string())
}

/// Resolve a raw expression against `root` with default settings.
pub fn resolve(root: &dyn DataObject, raw: &str) -> String {
    Resolver::new().resolve_str(root, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{JsonRecord, Reference};
    use crate::template::FieldMapping;
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: serde_json::Value) -> JsonRecord {
        JsonRecord::from_value(value).unwrap()
    }

    /// Record whose every field access fails.
    struct Broken;

    impl DataObject for Broken {
        fn get_field(&self, name: &str) -> Result<Option<FieldValue>> {
            Err(Error::Field(format!("no capability for '{}'", name)))
        }

        fn display_name(&self) -> String {
            "broken".to_string()
        }
    }

    /// Record with a to-one link to a failing record.
    struct LinksToBroken;

    impl DataObject for LinksToBroken {
        fn get_field(&self, name: &str) -> Result<Option<FieldValue>> {
            Ok(match name {
                "link" => Some(Reference::single(Arc::new(Broken)).into()),
                _ => None,
            })
        }

        fn display_name(&self) -> String {
            "links".to_string()
        }
    }

    #[test]
    fn test_flat_and_nested_paths() {
        let r = record(json!({
            "name": "Acme",
            "partner_id": {"name": "Bob", "country_id": {"name": "Norway", "code": "NO"}}
        }));
        assert_eq!(resolve(&r, "name"), "Acme");
        assert_eq!(resolve(&r, "partner_id.country_id.code"), "NO");
        assert_eq!(resolve(&r, "partner_id"), "Bob");
        assert_eq!(resolve(&r, "partner_id.country_id|upper"), "NORWAY");
    }

    #[test]
    fn test_empty_intermediate_short_circuits() {
        let r = record(json!({"a": null, "b": {}, "c": [], "d": false}));
        assert_eq!(resolve(&r, "a.b.c"), "");
        assert_eq!(resolve(&r, "b.name.x"), "");
        assert_eq!(resolve(&r, "c.name"), "");
        assert_eq!(resolve(&r, "d.name"), "");
        assert_eq!(resolve(&r, "missing.name"), "");
    }

    #[test]
    fn test_terminal_empty_values() {
        let r = record(json!({"a": null, "b": false, "c": "", "d": [], "e": 0}));
        for path in ["a", "b", "c", "d", "missing"] {
            assert_eq!(resolve(&r, path), "", "path {}", path);
        }
        assert_eq!(resolve(&r, "e"), "0");
    }

    #[test]
    fn test_multi_valued_flattening() {
        let r = record(json!({
            "tags": [
                {"name": "red", "category": {"name": "color"}},
                {"name": "big", "category": null},
                {"name": "old", "category": {"name": "age"}}
            ]
        }));
        assert_eq!(resolve(&r, "tags.name"), "red, big, old");
        assert_eq!(resolve(&r, "tags.name|upper"), "RED, BIG, OLD");
        assert_eq!(resolve(&r, "tags.category.name"), "color, , age");
        assert_eq!(resolve(&r, "tags"), "red, big, old");
    }

    #[test]
    fn test_custom_separator() {
        let r = record(json!({"tags": [{"name": "a"}, {"name": "b"}]}));
        let resolver = Resolver::new().with_separator(" / ");
        assert_eq!(resolver.resolve_str(&r, "tags.name"), "a / b");
    }

    #[test]
    fn test_defaults_and_configured_format() {
        let r = record(json!({"email": null, "name": "acme corp", "date": "2025-12-28"}));
        let mappings = MappingSet::from(vec![
            FieldMapping::new("email").with_default("no email"),
            FieldMapping::new("name").with_format("title"),
            FieldMapping::new("date").with_format("date:%d/%m/%Y"),
        ]);
        let resolver = Resolver::new().with_mappings(&mappings);

        assert_eq!(resolver.resolve_str(&r, "email"), "no email");
        assert_eq!(resolver.resolve_str(&r, "name"), "Acme Corp");
        assert_eq!(resolver.resolve_str(&r, "name|upper"), "ACME CORP");
        assert_eq!(resolver.resolve_str(&r, "date"), "28/12/2025");
        assert_eq!(resolver.resolve_str(&r, "unmapped"), "");
    }

    #[test]
    fn test_errors_become_markers() {
        assert_eq!(resolve(&Broken, "name"), "[Error: name]");
        assert_eq!(resolve(&LinksToBroken, "link.name|upper"), "[Error: link.name]");
        assert_eq!(resolve(&LinksToBroken, "nothing.name"), "");

        let r = record(json!({"name": "Acme"}));
        assert_eq!(resolve(&r, "name.first"), "[Error: name.first]");
        assert!(Resolver::new().try_resolve(&r, &PlaceholderExpression::parse("name.first")).is_err());
    }

    #[test]
    fn test_walk_reports_semantic_type() {
        let r = record(json!({"qty": 3, "partner": {"name": "Bob"}}));
        let resolver = Resolver::new();
        let path = |p: &str| PlaceholderExpression::parse(p).path;

        assert!(matches!(
            resolver.walk(&r, &path("qty"), None).unwrap(),
            Resolved::Scalar(Scalar::Integer(3))
        ));
        assert!(matches!(
            resolver.walk(&r, &path("partner"), None).unwrap(),
            Resolved::Records(ref names) if names == &["Bob".to_string()]
        ));
        assert!(matches!(
            resolver.walk(&r, &path("nope"), None).unwrap(),
            Resolved::Empty
        ));
    }
}
