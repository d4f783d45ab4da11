//! Document model types.
//!
//! This module defines the owned document tree the filler mutates in place:
//! paragraphs own runs, tables own rows own cells own paragraphs, and
//! sections own their header/footer paragraphs.

mod document;
mod paragraph;
mod table;

pub use document::{Block, Document, Metadata, Section};
pub use paragraph::{Alignment, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use table::{Table, TableCell, TableRow};
