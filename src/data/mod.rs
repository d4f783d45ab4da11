//! Data-access boundary.
//!
//! The engine never inspects records directly. It asks a [`DataObject`]
//! for named fields and gets back a tagged [`FieldValue`]: either a scalar
//! or a reference to zero, one or many further records.

mod json;

pub use json::JsonRecord;

use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a record supplied by the data layer.
pub type Record = Arc<dyn DataObject>;

/// Capability interface a record exposes to the resolver.
pub trait DataObject: Send + Sync {
    /// Look up a field by name.
    ///
    /// `Ok(None)` means the record has no such field. `Err` signals that the
    /// record could not serve the request at all; the resolver turns it into
    /// an inline error marker for the placeholder being resolved.
    fn get_field(&self, name: &str) -> Result<Option<FieldValue>>;

    /// Human-readable label used when the record itself is a terminal value.
    fn display_name(&self) -> String;
}

/// Value of a single field.
#[derive(Clone)]
pub enum FieldValue {
    /// A plain value
    Scalar(Scalar),

    /// A link to other records
    Reference(Reference),
}

impl FieldValue {
    /// Whether this value counts as empty during traversal.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(s) => s.is_empty(),
            FieldValue::Reference(r) => r.is_empty(),
        }
    }

    /// The scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::Reference(_) => None,
        }
    }

    /// The reference, if this is one.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            FieldValue::Reference(r) => Some(r),
            FieldValue::Scalar(_) => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            FieldValue::Reference(r) => f.debug_tuple("Reference").field(r).finish(),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Reference> for FieldValue {
    fn from(value: Reference) -> Self {
        FieldValue::Reference(value)
    }
}

macro_rules! scalar_field_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    FieldValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_field_value!(&str, String, i64, f64, bool);

/// Terminal field values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// No value
    Null,
    /// Boolean flag
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    DateTime(NaiveDateTime),
}

impl Scalar {
    /// Null, `false` and the empty string are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => f.write_str(&float_repr(*v)),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Scalar::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Shortest round-trip representation; integral values keep one decimal.
pub(crate) fn float_repr(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        let repr = if v > 0.0 { "inf" } else { "-inf" };
        repr.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Linked records, in the order the data layer returned them.
#[derive(Clone, Default)]
pub struct Reference {
    records: Vec<Record>,
    multi: bool,
}

impl Reference {
    /// A to-one link.
    pub fn single(record: Record) -> Self {
        Self {
            records: vec![record],
            multi: false,
        }
    }

    /// An unset to-one link.
    pub fn none() -> Self {
        Self::default()
    }

    /// A to-many link.
    pub fn many(records: Vec<Record>) -> Self {
        Self {
            records,
            multi: true,
        }
    }

    /// Whether this is a to-many link.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Linked records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of linked records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is linked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display names of all linked records.
    pub fn display_names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.display_name()).collect()
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("records", &self.display_names())
            .field("multi", &self.multi)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl DataObject for Named {
        fn get_field(&self, _name: &str) -> Result<Option<FieldValue>> {
            Ok(None)
        }

        fn display_name(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_scalar_emptiness() {
        assert!(Scalar::Null.is_empty());
        assert!(Scalar::Bool(false).is_empty());
        assert!(Scalar::Text(String::new()).is_empty());
        assert!(!Scalar::Bool(true).is_empty());
        assert!(!Scalar::Integer(0).is_empty());
        assert!(!Scalar::Float(0.0).is_empty());
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Integer(42).to_string(), "42");
        assert_eq!(Scalar::Float(3.0).to_string(), "3.0");
        assert_eq!(Scalar::Float(1234.567).to_string(), "1234.567");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Null.to_string(), "");

        let date = NaiveDate::from_ymd_opt(2025, 12, 28).unwrap();
        assert_eq!(Scalar::Date(date).to_string(), "2025-12-28");
        let dt = date.and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(Scalar::DateTime(dt).to_string(), "2025-12-28 10:30:00");
    }

    #[test]
    fn test_reference() {
        let many = Reference::many(vec![Arc::new(Named("A")), Arc::new(Named("B"))]);
        assert!(many.is_multi());
        assert_eq!(many.len(), 2);
        assert_eq!(many.display_names(), vec!["A", "B"]);

        let none = Reference::none();
        assert!(none.is_empty());
        assert!(FieldValue::Reference(none).is_empty());
    }

    #[test]
    fn test_field_value_conversions() {
        let v: FieldValue = "x".into();
        assert!(matches!(v.as_scalar(), Some(Scalar::Text(s)) if s == "x"));
        assert!(v.as_reference().is_none());

        let v: FieldValue = 3i64.into();
        assert!(matches!(v.as_scalar(), Some(Scalar::Integer(3))));

        let v: FieldValue = false.into();
        assert!(v.is_empty());

        let v: FieldValue = Reference::single(Arc::new(Named("A"))).into();
        assert_eq!(v.as_reference().map(|r| r.len()), Some(1));
    }
}
