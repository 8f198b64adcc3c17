//! `w:document`/`w:body`, `spec.md` §4.2.
//!
//! Grounded on `docx-core/src/documents/document.rs`. `DocumentChild` is
//! trimmed to the variants this crate actually builds a typed model for
//! (`Paragraph`, `Table`, `BookmarkStart`/`BookmarkEnd`); everything else
//! round-trips through `DocumentChild::Unrecognized` rather than through the
//! teacher's `CommentStart`/`StructuredDataTag`/`TableOfContents`/`Section`
//! variants, none of which this crate models yet.

use std::fmt;
use std::io::Write;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::bookmark::{BookmarkEnd, BookmarkStart};
use crate::documents::header::{Footer, Header};
use crate::documents::opaque::OpaqueNode;
use crate::documents::paragraph::Paragraph;
use crate::documents::section_property::{DocGrid, PageMargin, PageNumType, PageSize, SectionProperty};
use crate::documents::table::Table;
use crate::documents::BuildXML;
use crate::namespace::NAMESPACES;
use crate::types::PageOrientationType;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentChild {
    Paragraph(Box<Paragraph>),
    Table(Box<Table>),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    Unrecognized(OpaqueNode),
}

impl BuildXML for DocumentChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            DocumentChild::Paragraph(p) => p.build_to(stream),
            DocumentChild::Table(t) => t.build_to(stream),
            DocumentChild::BookmarkStart(b) => b.build_to(stream),
            DocumentChild::BookmarkEnd(b) => b.build_to(stream),
            DocumentChild::Unrecognized(n) => n.build_to(stream),
        }
    }
}

/// `w:document` plus its single `w:body`. The body's trailing `w:sectPr`
/// carries the document's last (or only) section; earlier sections appear
/// inline among `children` as a bare `w:sectPr` inside a `w:pPr`, which the
/// `sections` resolver partitions on.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub children: Vec<DocumentChild>,
    pub section_property: SectionProperty,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            section_property: SectionProperty::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, p: Paragraph) -> Self {
        self.children.push(DocumentChild::Paragraph(Box::new(p)));
        self
    }

    pub fn add_table(mut self, t: Table) -> Self {
        self.children.push(DocumentChild::Table(Box::new(t)));
        self
    }

    pub fn add_bookmark_start(mut self, id: usize, name: impl Into<String>) -> Self {
        self.children.push(DocumentChild::BookmarkStart(BookmarkStart::new(id, name)));
        self
    }

    pub fn add_bookmark_end(mut self, id: usize) -> Self {
        self.children.push(DocumentChild::BookmarkEnd(BookmarkEnd::new(id)));
        self
    }

    pub fn default_section_property(mut self, s: SectionProperty) -> Self {
        self.section_property = s;
        self
    }

    pub fn title_pg(mut self) -> Self {
        self.section_property = self.section_property.title_pg();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.section_property = self.section_property.page_size(size);
        self
    }

    pub fn page_margin(mut self, margin: PageMargin) -> Self {
        self.section_property = self.section_property.page_margin(margin);
        self
    }

    pub fn page_orient(mut self, o: PageOrientationType) -> Self {
        self.section_property = self.section_property.page_orient(o);
        self
    }

    pub fn doc_grid(mut self, g: DocGrid) -> Self {
        self.section_property = self.section_property.doc_grid(g);
        self
    }

    pub fn columns(mut self, n: usize) -> Self {
        self.section_property.columns = n;
        self
    }

    pub fn text_direction(mut self, direction: impl Into<String>) -> Self {
        self.section_property = self.section_property.text_direction(direction);
        self
    }

    pub fn page_num_type(mut self, p: PageNumType) -> Self {
        self.section_property = self.section_property.page_num_type(p);
        self
    }

    pub fn header(mut self, h: Header, rid: &str) -> Self {
        self.section_property = self.section_property.header(h, rid);
        self
    }

    pub fn first_header(mut self, h: Header, rid: &str) -> Self {
        self.section_property = self.section_property.first_header(h, rid);
        self
    }

    pub fn first_header_without_title_pg(mut self, h: Header, rid: &str) -> Self {
        self.section_property = self.section_property.first_header_without_title_pg(h, rid);
        self
    }

    pub fn even_header(mut self, h: Header, rid: &str) -> Self {
        self.section_property = self.section_property.even_header(h, rid);
        self
    }

    pub fn footer(mut self, f: Footer, rid: &str) -> Self {
        self.section_property = self.section_property.footer(f, rid);
        self
    }

    pub fn first_footer(mut self, f: Footer, rid: &str) -> Self {
        self.section_property = self.section_property.first_footer(f, rid);
        self
    }

    pub fn first_footer_without_title_pg(mut self, f: Footer, rid: &str) -> Self {
        self.section_property = self.section_property.first_footer_without_title_pg(f, rid);
        self
    }

    pub fn even_footer(mut self, f: Footer, rid: &str) -> Self {
        self.section_property = self.section_property.even_footer(f, rid);
        self
    }
}

impl BuildXML for Document {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs: Vec<(String, String)> = NAMESPACES[..12]
            .iter()
            .map(|(prefix, uri)| (format!("xmlns:{}", prefix), uri.to_string()))
            .collect();
        attrs.push(("mc:Ignorable".to_string(), "w14 wp14".to_string()));
        let refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_with_attrs("w:document", &refs)?
            .open_body()?
            .add_children(&self.children)?
            .add_child(&self.section_property)?
            .close()?
            .close()?
            .into_inner()
    }
}

/// Deserializes `w:body`'s children directly off the element map rather than
/// through a `#[serde(other)]`-backed enum: that hidden fallback identifier
/// discards the tag string once it fails to match a known variant, so a
/// generic `Unrecognized` arm built from it could never know *what* was
/// dropped. Walking the map ourselves keeps the tag that came with each
/// unmatched key and hands it to `OpaqueNode`.
struct DocumentBodyVisitor;

impl<'de> Visitor<'de> for DocumentBodyVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:body element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut doc = Document::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "p" | "w:p" => doc.children.push(DocumentChild::Paragraph(Box::new(map.next_value()?))),
                "tbl" | "w:tbl" => doc.children.push(DocumentChild::Table(Box::new(map.next_value()?))),
                "bookmarkStart" | "w:bookmarkStart" => doc.children.push(DocumentChild::BookmarkStart(map.next_value()?)),
                "bookmarkEnd" | "w:bookmarkEnd" => doc.children.push(DocumentChild::BookmarkEnd(map.next_value()?)),
                "sectPr" | "w:sectPr" => doc.section_property = map.next_value()?,
                "$text" => {
                    let _: String = map.next_value()?;
                }
                other => {
                    let mut node: OpaqueNode = map.next_value()?;
                    node.tag = other.to_string();
                    doc.children.push(DocumentChild::Unrecognized(node));
                }
            }
        }
        Ok(doc)
    }
}

struct DocumentXmlVisitor;

impl<'de> Visitor<'de> for DocumentXmlVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:document element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut doc = Document::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "body" | "w:body" => doc = map.next_value_seed(BodySeed)?,
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(doc)
    }
}

struct BodySeed;

impl<'de> serde::de::DeserializeSeed<'de> for BodySeed {
    type Value = Document;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentBodyVisitor)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentXmlVisitor)
    }
}

crate::reader::impl_from_xml_via_quick!(Document);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_document() {
        let b = Document::new().build();
        let xml = str::from_utf8(&b).unwrap();
        assert!(xml.starts_with(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w10="urn:schemas-microsoft-com:office:word" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" xmlns:wpg="http://schemas.microsoft.com/office/word/2010/wordprocessingGroup" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" xmlns:wp14="http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing" xmlns:w14="http://schemas.microsoft.com/office/word/2012/wordml" xmlns:w15="http://schemas.microsoft.com/office/word/2012/wordml" mc:Ignorable="w14 wp14"><w:body>"#
        ));
        assert!(xml.ends_with("</w:body></w:document>"));
    }

    #[test]
    fn test_document_cols() {
        let b = Document::new().columns(2).build();
        assert!(str::from_utf8(&b).unwrap().contains(r#"<w:cols w:space="425" w:num="2" />"#));
    }

    #[test]
    fn test_document_add_paragraph() {
        let b = Document::new().add_paragraph(Paragraph::new()).build();
        assert!(str::from_utf8(&b).unwrap().contains("<w:p>"));
    }

    #[test]
    fn test_document_xml_deserialize_children() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/><w:bookmarkStart w:id="0" w:name="x"/><w:bookmarkEnd w:id="0"/></w:body></w:document>"#;
        let doc: Document = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(doc.children.len(), 3);
        assert!(matches!(doc.children[0], DocumentChild::Paragraph(_)));
        assert!(matches!(doc.children[1], DocumentChild::BookmarkStart(_)));
        assert!(matches!(doc.children[2], DocumentChild::BookmarkEnd(_)));
    }

    #[test]
    fn test_document_xml_deserialize_section_property() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:sectPr><w:cols w:space="425" w:num="3"/></w:sectPr></w:body></w:document>"#;
        let doc: Document = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(doc.section_property.columns, 3);
    }
}
