//! Round-trip preservation of XML content the typed model does not
//! recognize.
//!
//! The teacher's `#[serde(other)] Unknown` arms (e.g. `DocumentChildXml::
//! Unknown` in `documents/document.rs`) drop such content on read. That
//! breaks the round-trip-lossless-structure invariant, so every container
//! that can receive arbitrary children keeps an `OpaqueNode::Unknown(..)`
//! variant instead of discarding it. Shape mirrors
//! `examples/emrosenf-Open-Xml-PowerTools/redline-rs`'s
//! `xml::node::XmlNodeData`, flattened into an owned recursive tree since
//! this crate has no arena allocator to thread through.

use std::fmt;
use std::io::Write;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::xml_builder::{BuildXML, Result as XmlResult, XMLBuilder};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpaqueAttribute {
    pub name: String,
    pub value: String,
}

/// An XML element this crate has no typed model for, preserved verbatim
/// (tag name, attributes, children, text) so it survives an open/save cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpaqueNode {
    pub tag: String,
    pub attributes: Vec<OpaqueAttribute>,
    pub children: Vec<OpaqueChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpaqueChild {
    Element(OpaqueNode),
    Text(String),
}

impl BuildXML for OpaqueNode {
    fn build_to<W: Write>(&self, stream: xml::writer::EventWriter<W>) -> XmlResult<xml::writer::EventWriter<W>> {
        let attrs: Vec<(&str, &str)> = self
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        let mut b = XMLBuilder::from(stream).open_with_attrs(&self.tag, &attrs)?;
        for child in &self.children {
            b = match child {
                OpaqueChild::Element(el) => b.add_child(el)?,
                OpaqueChild::Text(t) => b.text(t)?,
            };
        }
        b.close()?.into_inner()
    }
}

impl OpaqueNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(OpaqueAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(OpaqueChild::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: OpaqueNode) -> Self {
        self.children.push(OpaqueChild::Element(child));
        self
    }
}

/// Recursively captures an element this crate has no typed model for:
/// attribute keys arrive prefixed `@`, text arrives under `$text`/`$value`,
/// and every other map key is a genuine child tag name — quick-xml's map
/// representation of element content hands back that tag unfiltered, unlike
/// the `#[serde(other)]` fallback `documents/document.rs` and friends use for
/// their *known*-children enums, whose hidden field identifier discards the
/// tag before user code ever sees it. This is what lets an `Unrecognized`
/// variant built from this type actually preserve the tag name instead of
/// just noting "something was here".
impl<'de> Deserialize<'de> for OpaqueNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OpaqueNodeVisitor)
    }
}

struct OpaqueNodeVisitor;

impl<'de> Visitor<'de> for OpaqueNodeVisitor {
    type Value = OpaqueNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an XML element")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(OpaqueNode::default())
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(OpaqueNode::default().with_text(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(OpaqueNode::default().with_text(v))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut node = OpaqueNode::default();
        while let Some(key) = map.next_key::<String>()? {
            if let Some(attr_name) = key.strip_prefix('@') {
                let value: String = map.next_value()?;
                node = node.with_attr(attr_name, value);
            } else if key == "$text" {
                let value: String = map.next_value()?;
                node.children.push(OpaqueChild::Text(value));
            } else if key == "$value" {
                let values: Vec<OpaqueNode> = map.next_value()?;
                node.children.extend(values.into_iter().map(OpaqueChild::Element));
            } else {
                let mut child: OpaqueNode = map.next_value()?;
                child.tag = key;
                node.children.push(OpaqueChild::Element(child));
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build_preserves_unknown_shape() {
        let node = OpaqueNode::new("w:customXmlInsRangeStart")
            .with_attr("w:id", "7")
            .with_child(OpaqueNode::new("w:nested").with_text("hi"));
        let out = node.build();
        assert_eq!(
            str::from_utf8(&out).unwrap(),
            r#"<w:customXmlInsRangeStart w:id="7"><w:nested>hi</w:nested></w:customXmlInsRangeStart>"#
        );
    }

    #[test]
    fn test_deserialize_captures_attrs_and_nested_tag_names() {
        let xml = r#"<w:sdt w:id="9"><w:nested>hi</w:nested></w:sdt>"#;
        let node: OpaqueNode = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(node.attributes, vec![OpaqueAttribute { name: "w:id".to_string(), value: "9".to_string() }]);
        assert_eq!(node.children.len(), 1);
        match &node.children[0] {
            OpaqueChild::Element(child) => {
                assert_eq!(child.tag, "w:nested");
                assert_eq!(child.children, vec![OpaqueChild::Text("hi".to_string())]);
            }
            other => panic!("expected nested element, got {other:?}"),
        }
    }
}
