//! Table types.

use super::{Alignment, Paragraph};
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    #[serde(default)]
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    #[serde(default)]
    pub header_rows: u8,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Insert a row directly after `index`.
    ///
    /// An index past the end appends.
    pub fn insert_row_after(&mut self, index: usize, row: TableRow) {
        let at = (index + 1).min(self.rows.len());
        self.rows.insert(at, row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    #[serde(default)]
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    #[serde(default)]
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Cell texts joined by a single space.
    ///
    /// Loop markers are detected on this view, so a marker split across
    /// two cells is not recognized.
    pub fn joined_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Structural copy of this row.
    ///
    /// Cell layout and paragraph structure are kept; each run keeps its
    /// text and its bold/italic/underline flags only.
    pub fn duplicate(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| TableCell {
                content: cell
                    .content
                    .iter()
                    .map(|p| Paragraph {
                        runs: p.runs.iter().map(|r| r.flags_copy()).collect(),
                        style: p.style.clone(),
                    })
                    .collect(),
                ..cell.clone()
            })
            .collect();

        Self {
            cells,
            is_header: self.is_header,
        }
    }

    /// Mutable access to every paragraph of every cell.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.cells.iter_mut().flat_map(|c| c.content.iter_mut())
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs)
    #[serde(default)]
    pub content: Vec<Paragraph>,

    /// Number of rows this cell spans
    #[serde(default = "default_span")]
    pub rowspan: u8,

    /// Number of columns this cell spans
    #[serde(default = "default_span")]
    pub colspan: u8,

    /// Cell alignment
    #[serde(default)]
    pub alignment: Alignment,
}

fn default_span() -> u8 {
    1
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(vec![Paragraph::with_text(text)])
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::with_content(Vec::new())
    }

    /// Create a cell with multiple paragraphs.
    pub fn with_content(content: Vec<Paragraph>) -> Self {
        Self {
            content,
            rowspan: 1,
            colspan: 1,
            alignment: Alignment::Left,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span;
        self
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|p| p.is_empty())
    }
}
