//! Section-boundary resolver, `spec.md` §4.5.
//!
//! No teacher equivalent: `docx-core` stores header/footer content directly
//! on `SectionProperty` (kept as-is, see `section_property.rs`) and never
//! partitions `Document::children` into sections or walks header/footer
//! inheritance across them. This module adds that on top, grounded directly
//! on `spec.md` §4.5's section-boundary and resolver algorithms.

use crate::documents::document::{Document, DocumentChild};
use crate::documents::header::{Footer, Header};
use crate::documents::paragraph::Paragraph;
use crate::documents::section_property::{FooterReference, HeaderReference, SectionProperty};
use crate::documents::table::Table;

/// What ends a section: a paragraph carrying a `w:pPr/w:sectPr` (the section
/// before the last one), or the body-level `w:sectPr` (the last section).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTerminator {
    Paragraph(usize),
    Body,
}

/// `[start, end)` over `Document::children`, plus how the section ends.
/// `spec.md` §4.5: "the `w:p` itself belongs to that section"; the
/// terminating body-level `w:sectPr` does not correspond to an index in
/// `children` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
    pub terminator: SectionTerminator,
}

/// Walks `Document::children` once and partitions it into sections.
pub fn section_spans(doc: &Document) -> Vec<SectionSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (i, child) in doc.children.iter().enumerate() {
        if let DocumentChild::Paragraph(p) = child {
            if p.property.section_property.is_some() {
                spans.push(SectionSpan {
                    start,
                    end: i + 1,
                    terminator: SectionTerminator::Paragraph(i),
                });
                start = i + 1;
            }
        }
    }
    spans.push(SectionSpan {
        start,
        end: doc.children.len(),
        terminator: SectionTerminator::Body,
    });
    spans
}

pub fn section_property<'a>(doc: &'a Document, span: &SectionSpan) -> &'a SectionProperty {
    match span.terminator {
        SectionTerminator::Paragraph(i) => match &doc.children[i] {
            DocumentChild::Paragraph(p) => p
                .property
                .section_property
                .as_ref()
                .expect("section span's terminating paragraph must carry a w:sectPr"),
            _ => unreachable!("section terminator does not point at a paragraph"),
        },
        SectionTerminator::Body => &doc.section_property,
    }
}

fn section_property_mut<'a>(doc: &'a mut Document, span: &SectionSpan) -> &'a mut SectionProperty {
    match span.terminator {
        SectionTerminator::Paragraph(i) => match &mut doc.children[i] {
            DocumentChild::Paragraph(p) => p
                .property
                .section_property
                .as_mut()
                .expect("section span's terminating paragraph must carry a w:sectPr"),
            _ => unreachable!("section terminator does not point at a paragraph"),
        },
        SectionTerminator::Body => &mut doc.section_property,
    }
}

/// A `w:p` or `w:tbl` belonging to a section's block content, per `spec.md`
/// §4.5's section-content-iteration operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockItem<'a> {
    Paragraph(&'a Paragraph),
    Table(&'a Table),
}

pub fn block_items<'a>(doc: &'a Document, span: &SectionSpan) -> Vec<BlockItem<'a>> {
    doc.children[span.start..span.end]
        .iter()
        .filter_map(|c| match c {
            DocumentChild::Paragraph(p) => Some(BlockItem::Paragraph(p)),
            DocumentChild::Table(t) => Some(BlockItem::Table(t)),
            _ => None,
        })
        .collect()
}

/// Clones the body-level (final) `w:sectPr` into a new paragraph appended to
/// `doc.children`, making it the new second-to-last section, then strips
/// every header/footer reference and inline content from the sentinel so the
/// new last section inherits header/footer from the one just split off.
pub fn add_section_break(doc: &mut Document) {
    let sentinel = doc.section_property.clone();
    let para = Paragraph {
        property: crate::documents::paragraph::ParagraphProperty::new().section_property(sentinel),
        ..Paragraph::new()
    };
    doc.children.push(DocumentChild::Paragraph(Box::new(para)));

    let sp = &mut doc.section_property;
    sp.header_reference = None;
    sp.header = None;
    sp.first_header_reference = None;
    sp.first_header = None;
    sp.even_header_reference = None;
    sp.even_header = None;
    sp.footer_reference = None;
    sp.footer = None;
    sp.first_footer_reference = None;
    sp.first_footer = None;
    sp.even_footer_reference = None;
    sp.even_footer = None;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterRole {
    Default,
    Even,
    First,
}

impl HeaderFooterRole {
    fn tag(self) -> &'static str {
        match self {
            HeaderFooterRole::Default => "default",
            HeaderFooterRole::Even => "even",
            HeaderFooterRole::First => "first",
        }
    }
}

fn header_pair(sp: &SectionProperty, role: HeaderFooterRole) -> Option<&(String, Header)> {
    match role {
        HeaderFooterRole::Default => sp.header.as_ref(),
        HeaderFooterRole::Even => sp.even_header.as_ref(),
        HeaderFooterRole::First => sp.first_header.as_ref(),
    }
}

fn header_pair_mut(sp: &mut SectionProperty, role: HeaderFooterRole) -> &mut Option<(String, Header)> {
    match role {
        HeaderFooterRole::Default => &mut sp.header,
        HeaderFooterRole::Even => &mut sp.even_header,
        HeaderFooterRole::First => &mut sp.first_header,
    }
}

fn header_reference_mut(sp: &mut SectionProperty, role: HeaderFooterRole) -> &mut Option<HeaderReference> {
    match role {
        HeaderFooterRole::Default => &mut sp.header_reference,
        HeaderFooterRole::Even => &mut sp.even_header_reference,
        HeaderFooterRole::First => &mut sp.first_header_reference,
    }
}

fn footer_pair(sp: &SectionProperty, role: HeaderFooterRole) -> Option<&(String, Footer)> {
    match role {
        HeaderFooterRole::Default => sp.footer.as_ref(),
        HeaderFooterRole::Even => sp.even_footer.as_ref(),
        HeaderFooterRole::First => sp.first_footer.as_ref(),
    }
}

fn footer_pair_mut(sp: &mut SectionProperty, role: HeaderFooterRole) -> &mut Option<(String, Footer)> {
    match role {
        HeaderFooterRole::Default => &mut sp.footer,
        HeaderFooterRole::Even => &mut sp.even_footer,
        HeaderFooterRole::First => &mut sp.first_footer,
    }
}

fn footer_reference_mut(sp: &mut SectionProperty, role: HeaderFooterRole) -> &mut Option<FooterReference> {
    match role {
        HeaderFooterRole::Default => &mut sp.footer_reference,
        HeaderFooterRole::Even => &mut sp.even_footer_reference,
        HeaderFooterRole::First => &mut sp.first_footer_reference,
    }
}

pub fn has_header_definition(sp: &SectionProperty, role: HeaderFooterRole) -> bool {
    header_pair(sp, role).is_some()
}

pub fn has_footer_definition(sp: &SectionProperty, role: HeaderFooterRole) -> bool {
    footer_pair(sp, role).is_some()
}

pub fn is_header_linked_to_previous(doc: &Document, spans: &[SectionSpan], span_index: usize, role: HeaderFooterRole) -> bool {
    !has_header_definition(section_property(doc, &spans[span_index]), role)
}

pub fn is_footer_linked_to_previous(doc: &Document, spans: &[SectionSpan], span_index: usize, role: HeaderFooterRole) -> bool {
    !has_footer_definition(section_property(doc, &spans[span_index]), role)
}

/// `spec.md` §4.5's `getOrAddDefinition`: walk backward through sections
/// looking for an existing definition of this role; if none is found by
/// section 0, add a new one on the section the caller asked about. Iterative
/// (not recursive) for the same reason `table_geometry`'s merge-chain walk
/// is: the walk depth is bounded by section count, not a structural
/// invariant worth risking a stack frame per hop on.
pub fn get_or_add_header(
    doc: &mut Document,
    spans: &[SectionSpan],
    span_index: usize,
    role: HeaderFooterRole,
    new_rid: impl FnOnce() -> String,
) -> (String, Header) {
    let mut i = span_index;
    loop {
        if let Some(pair) = header_pair(section_property(doc, &spans[i]), role) {
            return pair.clone();
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    let rid = new_rid();
    let header = Header::new();
    let sp = section_property_mut(doc, &spans[span_index]);
    *header_reference_mut(sp, role) = Some(HeaderReference::new(role.tag(), rid.clone()));
    *header_pair_mut(sp, role) = Some((rid.clone(), header.clone()));
    (rid, header)
}

pub fn get_or_add_footer(
    doc: &mut Document,
    spans: &[SectionSpan],
    span_index: usize,
    role: HeaderFooterRole,
    new_rid: impl FnOnce() -> String,
) -> (String, Footer) {
    let mut i = span_index;
    loop {
        if let Some(pair) = footer_pair(section_property(doc, &spans[i]), role) {
            return pair.clone();
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    let rid = new_rid();
    let footer = Footer::new();
    let sp = section_property_mut(doc, &spans[span_index]);
    *footer_reference_mut(sp, role) = Some(FooterReference::new(role.tag(), rid.clone()));
    *footer_pair_mut(sp, role) = Some((rid.clone(), footer.clone()));
    (rid, footer)
}

pub fn set_header_linked_to_previous(
    doc: &mut Document,
    spans: &[SectionSpan],
    span_index: usize,
    role: HeaderFooterRole,
    linked: bool,
    new_rid: impl FnOnce() -> String,
) {
    if linked {
        let sp = section_property_mut(doc, &spans[span_index]);
        *header_reference_mut(sp, role) = None;
        *header_pair_mut(sp, role) = None;
    } else {
        get_or_add_header(doc, spans, span_index, role, new_rid);
    }
}

pub fn set_footer_linked_to_previous(
    doc: &mut Document,
    spans: &[SectionSpan],
    span_index: usize,
    role: HeaderFooterRole,
    linked: bool,
    new_rid: impl FnOnce() -> String,
) {
    if linked {
        let sp = section_property_mut(doc, &spans[span_index]);
        *footer_reference_mut(sp, role) = None;
        *footer_pair_mut(sp, role) = None;
    } else {
        get_or_add_footer(doc, spans, span_index, role, new_rid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::BuildXML;
    use pretty_assertions::assert_eq;

    fn two_section_doc() -> Document {
        let mut first_sectpr = SectionProperty::new();
        first_sectpr.columns = 2;
        let p = Paragraph {
            property: crate::documents::paragraph::ParagraphProperty::new().section_property(first_sectpr),
            ..Paragraph::new()
        };
        Document::new()
            .add_paragraph(Paragraph::new())
            .add_paragraph(p)
            .add_paragraph(Paragraph::new())
    }

    #[test]
    fn test_section_spans() {
        let doc = two_section_doc();
        let spans = section_spans(&doc);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], SectionSpan { start: 0, end: 2, terminator: SectionTerminator::Paragraph(1) });
        assert_eq!(spans[1], SectionSpan { start: 2, end: 3, terminator: SectionTerminator::Body });
    }

    #[test]
    fn test_block_items() {
        let doc = two_section_doc();
        let spans = section_spans(&doc);
        assert_eq!(block_items(&doc, &spans[0]).len(), 2);
        assert_eq!(block_items(&doc, &spans[1]).len(), 1);
    }

    #[test]
    fn test_add_section_break() {
        let mut doc = Document::new().add_paragraph(Paragraph::new());
        doc.section_property.header_reference = Some(HeaderReference::new("default", "rId5"));
        doc.section_property.header = Some(("rId5".to_string(), Header::new()));
        add_section_break(&mut doc);
        assert_eq!(doc.children.len(), 2);
        let spans = section_spans(&doc);
        assert_eq!(spans.len(), 2);
        assert!(has_header_definition(section_property(&doc, &spans[0]), HeaderFooterRole::Default));
        assert!(!has_header_definition(section_property(&doc, &spans[1]), HeaderFooterRole::Default));
        assert!(doc.section_property.header_reference.is_none());
    }

    #[test]
    fn test_is_linked_to_previous_default() {
        let doc = two_section_doc();
        let spans = section_spans(&doc);
        assert!(is_header_linked_to_previous(&doc, &spans, 0, HeaderFooterRole::Default));
        assert!(is_header_linked_to_previous(&doc, &spans, 1, HeaderFooterRole::Default));
    }

    #[test]
    fn test_get_or_add_header_inherits_from_prior_section() {
        let mut doc = two_section_doc();
        let spans = section_spans(&doc);
        let (rid, _) = get_or_add_header(&mut doc, &spans, 0, HeaderFooterRole::Default, || "rId9".to_string());
        assert_eq!(rid, "rId9");

        let spans = section_spans(&doc);
        let (inherited_rid, _) = get_or_add_header(&mut doc, &spans, 1, HeaderFooterRole::Default, || "rId-unused".to_string());
        assert_eq!(inherited_rid, "rId9");
        assert!(doc.section_property.header_reference.is_none());
    }

    #[test]
    fn test_set_header_linked_to_previous_round_trip() {
        let mut doc = two_section_doc();
        let spans = section_spans(&doc);
        set_header_linked_to_previous(&mut doc, &spans, 0, HeaderFooterRole::Default, false, || "rId9".to_string());
        assert!(!is_header_linked_to_previous(&doc, &spans, 0, HeaderFooterRole::Default));

        set_header_linked_to_previous(&mut doc, &spans, 0, HeaderFooterRole::Default, true, || unreachable!());
        assert!(is_header_linked_to_previous(&doc, &spans, 0, HeaderFooterRole::Default));
    }

    #[test]
    fn test_sentinel_sectpr_builds_inline_in_ppr() {
        let doc = two_section_doc();
        let xml = String::from_utf8(doc.build()).unwrap();
        assert!(xml.contains(r#"<w:pPr><w:rPr /><w:sectPr><w:pgSz"#));
    }
}
