//! Document-level types.

use super::{Paragraph, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A template or generated document.
///
/// The body is an ordered list of blocks; headers and footers hang off
/// sections the same way a word-processor file attaches them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Body content in reading order
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Sections carrying header/footer regions
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the body.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a paragraph to the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the body.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Append an explicit page break to the body.
    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Body paragraphs (not including table cells).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Every paragraph in the document: body, table cells, headers and footers.
    pub fn all_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out: Vec<&Paragraph> = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => out.push(p),
                Block::Table(t) => {
                    for row in &t.rows {
                        for cell in &row.cells {
                            out.extend(cell.content.iter());
                        }
                    }
                }
                Block::PageBreak => {}
            }
        }
        for section in &self.sections {
            out.extend(section.paragraphs());
        }
        out
    }

    /// Number of page breaks in the body.
    pub fn page_break_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    /// Check if the document has no body content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the body.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.text(),
                Block::Table(t) => t.plain_text(),
                Block::PageBreak => "\u{000C}".to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A content block in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// An explicit page break
    PageBreak,
}

/// A document section with optional header and footer regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header paragraphs
    #[serde(default)]
    pub header: Option<Vec<Paragraph>>,

    /// Footer paragraphs
    #[serde(default)]
    pub footer: Option<Vec<Paragraph>>,
}

impl Section {
    /// Create a section without header or footer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header and return self.
    pub fn with_header(mut self, paragraphs: Vec<Paragraph>) -> Self {
        self.header = Some(paragraphs);
        self
    }

    /// Set the footer and return self.
    pub fn with_footer(mut self, paragraphs: Vec<Paragraph>) -> Self {
        self.footer = Some(paragraphs);
        self
    }

    /// Header paragraphs followed by footer paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.header
            .iter()
            .chain(self.footer.iter())
            .flat_map(|ps| ps.iter())
    }

    /// Mutable header and footer paragraphs.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.header
            .iter_mut()
            .chain(self.footer.iter_mut())
            .flat_map(|ps| ps.iter_mut())
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableRow};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Hello {{name}}"));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["{{a}}", "{{b}}"]));
        doc.add_table(table);
        doc.add_section(
            Section::new()
                .with_header(vec![Paragraph::with_text("head")])
                .with_footer(vec![Paragraph::with_text("foot")]),
        );
        doc
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_break_count(), 0);
    }

    #[test]
    fn test_all_paragraphs() {
        let doc = sample();
        let texts: Vec<String> = doc.all_paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["Hello {{name}}", "{{a}}", "{{b}}", "head", "foot"]);
        assert_eq!(doc.paragraphs().count(), 1);
        assert_eq!(doc.tables().count(), 1);
    }

    #[test]
    fn test_page_break() {
        let mut doc = sample();
        doc.add_page_break();
        assert_eq!(doc.page_break_count(), 1);
        assert!(doc.plain_text().contains('\u{000C}'));
    }

    #[test]
    fn test_block_serde_tag() {
        let mut doc = Document::new();
        doc.add_table({
            let mut t = Table::new();
            t.add_row(TableRow::new(vec![TableCell::text("x")]));
            t
        });
        doc.add_page_break();

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        assert!(json.contains("\"type\":\"page_break\""));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
