//! Plain text rendering for documents.

use crate::model::Document;

/// Convert a document to plain text.
///
/// Section headers come first and footers last. Page breaks render as a
/// form feed.
pub fn to_text(doc: &Document) -> String {
    let headers = doc
        .sections
        .iter()
        .flat_map(|s| s.header.iter().flatten())
        .map(|p| p.text());
    let footers = doc
        .sections
        .iter()
        .flat_map(|s| s.footer.iter().flatten())
        .map(|p| p.text());

    let mut parts: Vec<String> = headers.collect();
    let body = doc.plain_text();
    if !body.is_empty() {
        parts.push(body);
    }
    parts.extend(footers);

    parts
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}
