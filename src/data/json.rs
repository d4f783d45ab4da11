//! JSON-backed records.

use super::{DataObject, FieldValue, Record, Reference, Scalar};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A record backed by a JSON object.
///
/// Nested objects are to-one references, arrays of objects are to-many
/// references, everything else is a scalar. The display name comes from a
/// `display_name` key, falling back to `name`.
///
/// Nested records are built once when the record is created and shared
/// afterwards, so field access never copies a subtree.
#[derive(Debug, Clone, Default)]
pub struct JsonRecord {
    fields: BTreeMap<String, JsonField>,
    display_name: String,
}

#[derive(Debug, Clone)]
enum JsonField {
    Value(FieldValue),
    /// A list holding something other than objects
    BadList(&'static str),
}

impl JsonRecord {
    /// Wrap a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        let display_name = ["display_name", "name"]
            .iter()
            .find_map(|key| match fields.get(*key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_default();

        let fields = fields
            .into_iter()
            .map(|(name, value)| (name, JsonField::from_value(value)))
            .collect();

        Self {
            fields,
            display_name,
        }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(Error::Other(format!(
                "expected a JSON object for a record, found {}",
                kind(&other)
            ))),
        }
    }

    /// Parse a record set: a single object or an array of objects.
    pub fn records_from_slice(data: &[u8]) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_slice(data)?;
        Self::records_from_value(value)
    }

    /// Build a record set from a single object or an array of objects.
    pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| Self::from_value(item).map(|r| Arc::new(r) as Record))
                .collect(),
            other => Ok(vec![Arc::new(Self::from_value(other)?) as Record]),
        }
    }

    /// Field names, in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl JsonField {
    fn from_value(value: Value) -> Self {
        let field: FieldValue = match value {
            Value::Null => Scalar::Null.into(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().unwrap_or(f64::NAN).into(),
            },
            Value::String(s) => s.into(),
            Value::Object(fields) => Reference::single(Arc::new(JsonRecord::new(fields))).into(),
            Value::Array(items) => {
                let mut records: Vec<Record> = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(fields) => records.push(Arc::new(JsonRecord::new(fields))),
                        other => return JsonField::BadList(kind(&other)),
                    }
                }
                Reference::many(records).into()
            }
        };
        JsonField::Value(field)
    }
}

impl DataObject for JsonRecord {
    fn get_field(&self, name: &str) -> Result<Option<FieldValue>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(JsonField::Value(value)) => Ok(Some(value.clone())),
            Some(JsonField::BadList(found)) => Err(Error::Field(format!(
                "field '{}' holds a list containing {}",
                name, found
            ))),
        }
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
