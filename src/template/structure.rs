//! Template structure analysis.

use super::Scanner;
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Shape of a template document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStructure {
    /// Body paragraphs (outside tables)
    pub paragraph_count: usize,

    /// Body tables
    pub table_count: usize,

    /// Sections
    pub section_count: usize,

    /// Per-table details
    pub tables: Vec<TableInfo>,
}

/// Shape of a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Position among body tables (0-indexed)
    pub index: usize,

    /// Number of rows
    pub row_count: usize,

    /// Number of columns of the first row
    pub col_count: usize,

    /// Whether any row carries a loop start marker
    pub has_loop: bool,

    /// Loop fields in row order
    pub loop_fields: Vec<String>,
}

/// Everything discovered when a template is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    /// Distinct field paths
    pub placeholders: BTreeSet<String>,

    /// Document shape
    pub structure: TemplateStructure,

    /// Number of distinct field paths
    pub field_count: usize,
}

/// Analyze the shape of `doc`.
pub fn analyze(doc: &Document) -> TemplateStructure {
    let scanner = Scanner::shared();
    let tables: Vec<TableInfo> = doc
        .tables()
        .enumerate()
        .map(|(index, table)| {
            let loop_fields: Vec<String> = table
                .rows
                .iter()
                .filter_map(|row| scanner.first_loop(&row.joined_text()))
                .collect();
            TableInfo {
                index,
                row_count: table.row_count(),
                col_count: table.column_count(),
                has_loop: !loop_fields.is_empty(),
                loop_fields,
            }
        })
        .collect();

    TemplateStructure {
        paragraph_count: doc.paragraphs().count(),
        table_count: tables.len(),
        section_count: doc.sections.len(),
        tables,
    }
}

/// Placeholders plus structure of `doc`.
pub fn parse_template(doc: &Document) -> TemplateInfo {
    let placeholders = Scanner::shared().scan_document(doc);
    TemplateInfo {
        field_count: placeholders.len(),
        placeholders,
        structure: analyze(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Section, Table, TableRow};

    fn invoice_template() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::heading("Invoice {{name}}", 1));
        doc.add_paragraph(Paragraph::with_text("Customer: {{partner_id.name}}"));

        let mut lines = Table::new();
        lines.add_row(TableRow::from_strings(["Product", "Qty"]));
        lines.add_row(TableRow::from_strings([
            "{{#order_line}}{{product_id.name}}",
            "{{product_uom_qty}}{{/order_line}}",
        ]));
        doc.add_table(lines);

        let mut totals = Table::new();
        totals.add_row(TableRow::from_strings(["Total", "{{amount_total}}", "EUR"]));
        doc.add_table(totals);

        doc.add_section(Section::new().with_header(vec![Paragraph::with_text("{{company_id.name}}")]));
        doc
    }

    #[test]
    fn test_analyze() {
        let structure = analyze(&invoice_template());
        assert_eq!(structure.paragraph_count, 2);
        assert_eq!(structure.table_count, 2);
        assert_eq!(structure.section_count, 1);

        let lines = &structure.tables[0];
        assert_eq!(lines.row_count, 2);
        assert_eq!(lines.col_count, 2);
        assert!(lines.has_loop);
        assert_eq!(lines.loop_fields, vec!["order_line"]);

        let totals = &structure.tables[1];
        assert_eq!(totals.index, 1);
        assert_eq!(totals.col_count, 3);
        assert!(!totals.has_loop);
    }

    #[test]
    fn test_parse_template() {
        let info = parse_template(&invoice_template());
        assert_eq!(info.field_count, 6);
        assert!(info.placeholders.contains("company_id.name"));
        assert!(info.placeholders.contains("product_uom_qty"));
        assert!(!info.placeholders.iter().any(|p| p.contains("order_line")));
    }
}
