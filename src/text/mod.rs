//! Cross-run text engine: atom collection, `ReplaceText`, paragraph text
//! extraction, and last-rendered-page-break fragmentation — `spec.md` §4.2.
//!
//! New code grounded directly on that section's atom model. `docx-core`
//! carries no equivalent engine; the only thing it has in this area is the
//! flat `Run::plain_text`/`Paragraph::plain_text` concatenation this module
//! builds on top of, adding byte-addressable atoms and in-place mutation.

pub mod atoms;
pub mod page_break;

pub use atoms::{paragraph_text, replace_text};
pub use page_break::{split_at_last_rendered_page_break, PageBreakSplit};

use crate::documents::table::TableChild;
use crate::documents::table_cell::TableCellContent;
use crate::documents::table_row::TableRowChild;
use crate::documents::{Document, DocumentChild, Table};

fn replace_in_table(table: &mut Table, old: &str, new: &str) -> usize {
    let mut count = 0;
    for row in &mut table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &mut row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &mut cell.children {
                match content {
                    TableCellContent::Paragraph(p) => count += replace_text(p, old, new),
                    TableCellContent::Table(t) => count += replace_in_table(t, old, new),
                }
            }
        }
    }
    count
}

/// Applies `ReplaceText(old, new)` to every paragraph in a document body,
/// including paragraphs nested inside tables (and tables nested inside
/// table cells). Returns the total number of replacements performed.
pub fn replace_text_in_document(document: &mut Document, old: &str, new: &str) -> usize {
    let mut count = 0;
    for child in &mut document.children {
        match child {
            DocumentChild::Paragraph(p) => count += replace_text(p.as_mut(), old, new),
            DocumentChild::Table(t) => count += replace_in_table(t.as_mut(), old, new),
            _ => {}
        }
    }
    count
}
