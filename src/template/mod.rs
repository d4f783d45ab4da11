//! Template-side processing: placeholder discovery, expression parsing,
//! structure analysis and field-mapping configuration.

mod expression;
pub mod mapping;
pub mod scanner;
mod structure;

pub use expression::{Formatter, PlaceholderExpression};
pub use mapping::{FieldMapping, FieldType, MappingSet};
pub use scanner::{extract_placeholders, scan, strip_loop_markers, Scanner};
pub use structure::{analyze, parse_template, TableInfo, TemplateInfo, TemplateStructure};
