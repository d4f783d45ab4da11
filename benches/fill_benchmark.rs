//! Benchmarks for docfill template filling.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docfill::{
    extract_placeholders, Document, DocumentFiller, JsonRecord, Paragraph, Record, Table,
    TableRow,
};
use serde_json::json;

/// Creates a template with the given number of body paragraphs and a loop table.
fn create_template(paragraphs: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..paragraphs {
        doc.add_paragraph(Paragraph::with_text(format!(
            "Line {}: {{{{partner_id.name}}}} from {{{{partner_id.country_id.name|upper}}}}, total {{{{amount_total|number:',.2f'}}}}",
            i
        )));
    }

    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["Product", "Qty", "Price"]));
    table.add_row(TableRow::from_strings([
        "{{#order_line}}{{product_id.name}}",
        "{{qty}}",
        "{{price|number:',.2f'}}{{/order_line}}",
    ]));
    doc.add_table(table);
    doc
}

/// Creates a record with the given number of order lines.
fn create_record(lines: usize) -> Record {
    let order_line: Vec<_> = (0..lines)
        .map(|i| json!({"product_id": {"name": format!("Product {}", i)}, "qty": i, "price": i as f64 * 1.25}))
        .collect();
    let value = json!({
        "amount_total": 123456.789,
        "partner_id": {"name": "Bob", "country_id": {"name": "Norway"}},
        "order_line": order_line
    });
    JsonRecord::records_from_value(value)
        .unwrap()
        .remove(0)
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    let filler = DocumentFiller::new();

    for size in [10, 100, 1000] {
        let template = create_template(size);
        let record = create_record(size);

        group.bench_with_input(BenchmarkId::new("document", size), &size, |b, _| {
            b.iter(|| {
                let mut doc = template.clone();
                filler.fill(black_box(&mut doc), record.as_ref())
            })
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let template = create_template(1000);

    c.bench_function("scan_document", |b| {
        b.iter(|| extract_placeholders(black_box(&template)))
    });
}

criterion_group!(benches, bench_fill, bench_scan);
criterion_main!(benches);
