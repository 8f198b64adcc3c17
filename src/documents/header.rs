//! `w:hdr`/`w:ftr`, `spec.md` §4.5.
//!
//! Grounded on `docx-core/src/documents/header.rs`/`footer.rs`. Drops the
//! teacher's `has_numbering`/JSON-bridge `Serialize` plumbing and its
//! `StructuredDataTag` child (out of scope here; `w:sdt` content is preserved
//! through `HeaderChild::Unrecognized` instead of a typed model).

use std::fmt;
use std::io::Write;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::opaque::OpaqueNode;
use crate::documents::paragraph::Paragraph;
use crate::documents::table::Table;
use crate::documents::BuildXML;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderChild {
    Paragraph(Box<Paragraph>),
    Table(Box<Table>),
    Unrecognized(OpaqueNode),
}

impl BuildXML for HeaderChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            HeaderChild::Paragraph(p) => p.build_to(stream),
            HeaderChild::Table(t) => t.build_to(stream),
            HeaderChild::Unrecognized(n) => n.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub children: Vec<HeaderChild>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, p: Paragraph) -> Self {
        self.children.push(HeaderChild::Paragraph(Box::new(p)));
        self
    }

    pub fn add_table(mut self, t: Table) -> Self {
        self.children.push(HeaderChild::Table(Box::new(t)));
        self
    }
}

impl BuildXML for Header {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_header()?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Footer {
    pub children: Vec<HeaderChild>,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, p: Paragraph) -> Self {
        self.children.push(HeaderChild::Paragraph(Box::new(p)));
        self
    }

    pub fn add_table(mut self, t: Table) -> Self {
        self.children.push(HeaderChild::Table(Box::new(t)));
        self
    }
}

impl BuildXML for Footer {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_footer()?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

/// Walks the element map directly rather than through a `#[serde(other)]`
/// fallback enum, so an unmatched tag keeps its name instead of being
/// discarded before `HeaderChild::Unrecognized` ever sees it.
struct HeaderChildrenVisitor;

impl<'de> Visitor<'de> for HeaderChildrenVisitor {
    type Value = Vec<HeaderChild>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:hdr or w:ftr element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut children = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "p" | "w:p" => children.push(HeaderChild::Paragraph(Box::new(map.next_value()?))),
                "tbl" | "w:tbl" => children.push(HeaderChild::Table(Box::new(map.next_value()?))),
                "$text" => {
                    let _: String = map.next_value()?;
                }
                other => {
                    let mut node: OpaqueNode = map.next_value()?;
                    node.tag = other.to_string();
                    children.push(HeaderChild::Unrecognized(node));
                }
            }
        }
        Ok(children)
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Header {
            children: deserializer.deserialize_map(HeaderChildrenVisitor)?,
        })
    }
}

impl<'de> Deserialize<'de> for Footer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Footer {
            children: deserializer.deserialize_map(HeaderChildrenVisitor)?,
        })
    }
}

crate::reader::impl_from_xml_via_quick!(Header);
crate::reader::impl_from_xml_via_quick!(Footer);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_header_build() {
        let h = Header::new().add_paragraph(Paragraph::new());
        let out = h.build();
        assert!(str::from_utf8(&out).unwrap().starts_with(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr>"#
        ));
    }
}
