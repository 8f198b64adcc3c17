//! Document object model, `spec.md` §4.2-§4.6.
//!
//! Mirrors `docx-core/src/documents/mod.rs`'s flat re-export surface: every
//! element type is reachable as `crate::documents::Foo` in addition to its
//! owning submodule path.

pub mod bookmark;
pub mod comments;
pub mod core_properties;
pub mod document;
pub mod header;
pub mod hyperlink;
pub mod numbering;
pub mod opaque;
pub mod paragraph;
pub mod run;
pub mod run_property;
pub mod section_property;
pub mod sections;
pub mod style;
pub mod table;
pub mod table_cell;
pub mod table_geometry;
pub mod table_row;
pub mod track_change;

pub use crate::xml_builder::BuildXML;

pub use bookmark::{BookmarkEnd, BookmarkStart};
pub use comments::{Comment, CommentRangeEnd, CommentRangeStart, CommentReference, Comments};
pub use core_properties::{AppProperties, CoreProperties};
pub use document::{Document, DocumentChild};
pub use header::{Footer, Header};
pub use hyperlink::{Hyperlink, HyperlinkData};
pub use numbering::{AbstractNum, Level, LevelOverride, Num, Numbering};
pub use opaque::{OpaqueAttribute, OpaqueChild, OpaqueNode};
pub use paragraph::{Indent, Paragraph, ParagraphChild, ParagraphProperty, SpecialIndent};
pub use run::{
    Break, Cr, DeleteText, FieldChar, FootnoteReference, InstrText, LastRenderedPageBreak,
    NoBreakHyphen, PTab, Run, RunChild, Sym, Tab, Text,
};
pub use run_property::{RunFonts, RunProperty, Shading};
pub use section_property::{
    DocGrid, DocGridType, FooterReference, HeaderReference, PageMargin, PageNumType, PageSize, SectionProperty,
};
pub use sections::{
    add_section_break, block_items, get_or_add_footer, get_or_add_header, has_footer_definition, has_header_definition,
    is_footer_linked_to_previous, is_header_linked_to_previous, section_spans, set_footer_linked_to_previous,
    set_header_linked_to_previous, BlockItem, HeaderFooterRole, SectionSpan, SectionTerminator,
};
pub use style::{DocDefaults, Style, Styles};
pub use table::{Table, TableChild, TableGrid, TableProperty};
pub use table_cell::{TableCell, TableCellBorder, TableCellBorderPosition, TableCellBorders, TableCellContent, TableCellProperty};
pub use table_geometry::{cell_rect, expand_row, grid_offset, grow_to, merge_region, move_cell_content, tc_at_grid_offset, CellCoord, CellRect};
pub use table_row::{TableRow, TableRowProperty};
pub use track_change::{Delete, DeleteChild, Insert, InsertChild};
