//! `w:style`/`w:styles` (`word/styles.xml`), `spec.md` §4.6.
//!
//! Grounded on `docx-core/src/documents/elements/style.rs`'s `Style`/
//! `StyleXml`, generalized to this crate's `ParseAttrError`/`OnOff`
//! conventions: an unrecognized `w:type` is a `ParseAttrError` here rather
//! than the teacher's silent fall-back to `StyleType::Paragraph`, and the
//! run/paragraph property trees are the same `RunProperty`/`ParagraphProperty`
//! every other module already builds and parses.

use std::fmt;
use std::io::Write;

use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::paragraph::ParagraphProperty;
use crate::documents::run_property::RunProperty;
use crate::documents::table::TableProperty;
use crate::documents::table_cell::TableCellProperty;
use crate::documents::BuildXML;
use crate::escape::escape;
use crate::types::{attr, StyleType};
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub style_id: String,
    pub style_type: StyleType,
    pub name: Option<String>,
    pub based_on: Option<String>,
    pub next: Option<String>,
    pub link: Option<String>,
    pub default: bool,
    pub run_property: RunProperty,
    pub paragraph_property: ParagraphProperty,
    pub table_property: TableProperty,
    pub table_cell_property: TableCellProperty,
}

impl Style {
    pub fn new(style_id: impl Into<String>, style_type: StyleType) -> Self {
        Style {
            style_id: escape(&style_id.into()),
            style_type,
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn based_on(mut self, id: impl Into<String>) -> Self {
        self.based_on = Some(id.into());
        self
    }

    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn link(mut self, id: impl Into<String>) -> Self {
        self.link = Some(id.into());
        self
    }

    pub fn default_style(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn run_property(mut self, p: RunProperty) -> Self {
        self.run_property = p;
        self
    }

    pub fn paragraph_property(mut self, p: ParagraphProperty) -> Self {
        self.paragraph_property = p;
        self
    }

    pub fn table_property(mut self, p: TableProperty) -> Self {
        self.table_property = p;
        self
    }

    pub fn table_cell_property(mut self, p: TableCellProperty) -> Self {
        self.table_cell_property = p;
        self
    }
}

impl BuildXML for Style {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs = vec![("w:type", self.style_type.to_xml_str()), ("w:styleId", self.style_id.as_str())];
        if self.default {
            attrs.push(("w:default", "1"));
        }
        XMLBuilder::from(stream)
            .open_with_attrs("w:style", &attrs)?
            .apply_opt(self.name.as_deref(), |v, b| b.closed_with_attrs("w:name", &[("w:val", v)]))?
            .apply_opt(self.based_on.as_deref(), |v, b| b.closed_with_attrs("w:basedOn", &[("w:val", v)]))?
            .apply_opt(self.next.as_deref(), |v, b| b.closed_with_attrs("w:next", &[("w:val", v)]))?
            .apply_opt(self.link.as_deref(), |v, b| b.closed_with_attrs("w:link", &[("w:val", v)]))?
            .add_child(&self.run_property)?
            .add_child(&self.paragraph_property)?
            .apply_if(self.style_type == StyleType::Table, |b| {
                b.add_child(&self.table_property)?.add_child(&self.table_cell_property)
            })?
            .close()?
            .into_inner()
    }
}

struct StyleVisitor;

impl<'de> Visitor<'de> for StyleVisitor {
    type Value = Style;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:style element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut style_id = String::new();
        let mut style_type = StyleType::Paragraph;
        let mut default = false;
        let mut name = None;
        let mut based_on = None;
        let mut next = None;
        let mut link = None;
        let mut run_property = RunProperty::new();
        let mut paragraph_property = ParagraphProperty::new();
        let mut table_property = TableProperty::new();
        let mut table_cell_property = TableCellProperty::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@styleId" | "@w:styleId" => style_id = map.next_value()?,
                "@type" | "@w:type" => {
                    let raw: String = map.next_value()?;
                    style_type = attr::parse_enum("w:style", "w:type", &raw, StyleType::from_xml_str)
                        .map_err(|e| A::Error::custom(e.to_custom_message()))?;
                }
                "@default" | "@w:default" => {
                    let raw: String = map.next_value()?;
                    default = raw == "1" || raw.eq_ignore_ascii_case("true");
                }
                "name" | "w:name" => name = value_attr(&mut map)?,
                "basedOn" | "w:basedOn" => based_on = value_attr(&mut map)?,
                "next" | "w:next" => next = value_attr(&mut map)?,
                "link" | "w:link" => link = value_attr(&mut map)?,
                "rPr" | "w:rPr" => run_property = map.next_value()?,
                "pPr" | "w:pPr" => paragraph_property = map.next_value()?,
                "tblPr" | "w:tblPr" => table_property = map.next_value()?,
                "tcPr" | "w:tcPr" => table_cell_property = map.next_value()?,
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }

        Ok(Style {
            style_id,
            style_type,
            name,
            based_on,
            next,
            link,
            default,
            run_property,
            paragraph_property,
            table_property,
            table_cell_property,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlValueAttr {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

fn value_attr<'de, A>(map: &mut A) -> Result<Option<String>, A::Error>
where
    A: MapAccess<'de>,
{
    let node: XmlValueAttr = map.next_value()?;
    Ok(node.val)
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StyleVisitor)
    }
}

/// `w:docDefaults`: the run/paragraph property tree applied when nothing
/// more specific overrides it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocDefaults {
    pub run_property: RunProperty,
    pub paragraph_property: ParagraphProperty,
}

impl BuildXML for DocDefaults {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_doc_defaults()?
            .open("w:rPrDefault")?
            .add_child(&self.run_property)?
            .close()?
            .open("w:pPrDefault")?
            .add_child(&self.paragraph_property)?
            .close()?
            .close()?
            .into_inner()
    }
}

struct DocDefaultsVisitor;

impl<'de> Visitor<'de> for DocDefaultsVisitor {
    type Value = DocDefaults;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:docDefaults element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut run_property = RunProperty::new();
        let mut paragraph_property = ParagraphProperty::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "rPrDefault" | "w:rPrDefault" => {
                    let node: RPrDefaultXml = map.next_value()?;
                    if let Some(rpr) = node.run_property {
                        run_property = rpr;
                    }
                }
                "pPrDefault" | "w:pPrDefault" => {
                    let node: PPrDefaultXml = map.next_value()?;
                    if let Some(ppr) = node.paragraph_property {
                        paragraph_property = ppr;
                    }
                }
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(DocDefaults { run_property, paragraph_property })
    }
}

#[derive(Debug, Deserialize, Default)]
struct RPrDefaultXml {
    #[serde(rename = "rPr", alias = "w:rPr", default)]
    run_property: Option<RunProperty>,
}

#[derive(Debug, Deserialize, Default)]
struct PPrDefaultXml {
    #[serde(rename = "pPr", alias = "w:pPr", default)]
    paragraph_property: Option<ParagraphProperty>,
}

impl<'de> Deserialize<'de> for DocDefaults {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocDefaultsVisitor)
    }
}

/// `word/styles.xml`'s root `w:styles` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Styles {
    pub doc_defaults: Option<DocDefaults>,
    pub styles: Vec<Style>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_defaults(mut self, d: DocDefaults) -> Self {
        self.doc_defaults = Some(d);
        self
    }

    pub fn add_style(mut self, s: Style) -> Self {
        self.styles.push(s);
        self
    }

    pub fn find(&self, style_id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.style_id == style_id)
    }
}

impl BuildXML for Styles {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_with_attrs(
                "w:styles",
                &[("xmlns:w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main")],
            )?
            .add_optional_child(&self.doc_defaults)?
            .add_children(&self.styles)?
            .close()?
            .into_inner()
    }
}

struct StylesVisitor;

impl<'de> Visitor<'de> for StylesVisitor {
    type Value = Styles;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:styles element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut doc_defaults = None;
        let mut styles = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "docDefaults" | "w:docDefaults" => doc_defaults = Some(map.next_value()?),
                "style" | "w:style" => styles.push(map.next_value()?),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(Styles { doc_defaults, styles })
    }
}

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StylesVisitor)
    }
}

crate::reader::impl_from_xml_via_quick!(Styles);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FromXML;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build_paragraph_style() {
        let s = Style::new("Heading1", StyleType::Paragraph).name("heading 1").based_on("Normal");
        let b = s.build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1" /><w:basedOn w:val="Normal" /><w:rPr /><w:pPr><w:rPr /></w:pPr></w:style>"#
        );
    }

    #[test]
    fn test_build_table_style_includes_table_properties() {
        let s = Style::new("TableGrid", StyleType::Table);
        let b = s.build();
        assert!(str::from_utf8(&b).unwrap().contains("<w:tblPr"));
    }

    #[test]
    fn test_roundtrip_styles_part() {
        let xml = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Normal" w:default="1"><w:name w:val="Normal"/></w:style></w:styles>"#;
        let styles = Styles::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(styles.styles.len(), 1);
        let s = styles.find("Normal").unwrap();
        assert!(s.default);
        assert_eq!(s.name.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_unrecognized_style_type_is_parse_attr_error() {
        let xml = r#"<w:style w:type="bogus" w:styleId="X"/>"#;
        let err = quick_xml::de::from_str::<Style>(xml).unwrap_err();
        let parse_err = crate::error::ParseAttrError::from_custom_message(&err.to_string())
            .expect("error should carry a recoverable ParseAttrError");
        assert_eq!(parse_err.raw, "bogus");
    }
}
