//! Integration tests for placeholder discovery.

use docfill::{
    extract_placeholders, parse_template, scan, Document, Paragraph, Scanner, Section, Table,
    TableRow,
};
use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_repeated_placeholder_counts_once() {
    assert_eq!(scan("{{name}} and {{name}} and {{ name }}"), set(&["name"]));
}

#[test]
fn test_loop_markers_excluded() {
    assert_eq!(scan("{{#lines}}{{item}}{{/lines}}"), set(&["item"]));
}

#[test]
fn test_formatter_suffix_stripped() {
    assert_eq!(
        scan(r#"{{amount_total|number:",.2f"}} {{create_date|date:'%Y-%m-%d'}}"#),
        set(&["amount_total", "create_date"])
    );
}

#[test]
fn test_scan_is_idempotent_on_substituted_text() {
    let scanner = Scanner::new();
    let rendered = scanner.replace("Hello {{name}}, {{#x}}{{y}}{{/x}}", |_| "World".to_string());
    assert_eq!(rendered, "Hello World, {{#x}}World{{/x}}");
    assert!(scan(&rendered).is_empty());
    assert!(scan("no braces at all").is_empty());
}

#[test]
fn test_unbalanced_braces_yield_nothing() {
    assert!(scan("{{name").is_empty());
    assert!(scan("name}}").is_empty());
    assert!(scan("{name}").is_empty());
}

#[test]
fn test_scan_whole_document() {
    let mut doc = Document::new();
    doc.add_paragraph(Paragraph::with_text("{{name}}"));
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["{{#lines}}{{product_id.name}}", "{{qty}}{{/lines}}"]));
    doc.add_table(table);
    doc.add_section(
        Section::new()
            .with_header(vec![Paragraph::with_text("{{company_id.name|upper}}")])
            .with_footer(vec![Paragraph::with_text("{{user_id.name}}")]),
    );

    assert_eq!(
        extract_placeholders(&doc),
        set(&["company_id.name", "name", "product_id.name", "qty", "user_id.name"])
    );

    let info = parse_template(&doc);
    assert_eq!(info.field_count, 5);
    assert_eq!(info.structure.tables[0].loop_fields, vec!["lines"]);
}
