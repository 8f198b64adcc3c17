//! `w:tc`, `spec.md` §4.4.
//!
//! Grounded on `docx-core/src/documents/elements/table_cell.rs`. Geometry
//! resolution (gridOffset, merge-chain walking) is NOT here — the teacher
//! stores only the raw `gridSpan`/`vMerge` attributes this module models,
//! and resolution lives in `table_geometry.rs` as new code operating over
//! `Table`/`TableRow`/`TableCell` from the outside.

use std::io::Write;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::documents::paragraph::Paragraph;
use crate::documents::run_property::Shading;
use crate::documents::table::Table;
use crate::documents::BuildXML;
use crate::error::ParseAttrError;
use crate::types::attr;
use crate::types::{BorderType, TextDirectionType, VAlignType, VMergeType, WidthType};
use crate::xml_builder::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCellBorderPosition {
    Top,
    Left,
    Bottom,
    Right,
    InsideH,
    InsideV,
    Tl2br,
    Tr2bl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCellBorder {
    pub position: TableCellBorderPosition,
    pub border_type: BorderType,
    pub size: usize,
    pub color: String,
}

impl TableCellBorder {
    pub fn new(position: TableCellBorderPosition) -> Self {
        Self {
            position,
            border_type: BorderType::Single,
            size: 4,
            color: "auto".to_string(),
        }
    }

    pub fn border_type(mut self, t: BorderType) -> Self {
        self.border_type = t;
        self
    }

    pub fn size(mut self, s: usize) -> Self {
        self.size = s;
        self
    }

    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = c.into();
        self
    }

    fn tag(&self) -> &'static str {
        match self.position {
            TableCellBorderPosition::Top => "w:top",
            TableCellBorderPosition::Left => "w:left",
            TableCellBorderPosition::Bottom => "w:bottom",
            TableCellBorderPosition::Right => "w:right",
            TableCellBorderPosition::InsideH => "w:insideH",
            TableCellBorderPosition::InsideV => "w:insideV",
            TableCellBorderPosition::Tl2br => "w:tl2br",
            TableCellBorderPosition::Tr2bl => "w:tr2bl",
        }
    }
}

impl BuildXML for TableCellBorder {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs(
                self.tag(),
                &[
                    ("w:val", self.border_type.to_xml_str()),
                    ("w:sz", &self.size.to_string()),
                    ("w:color", &self.color),
                ],
            )?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCellBorders {
    pub borders: Vec<TableCellBorder>,
}

impl TableCellBorders {
    pub fn with_empty() -> Self {
        Self::default()
    }

    pub fn set(mut self, border: TableCellBorder) -> Self {
        self.borders.retain(|b| b.position != border.position);
        self.borders.push(border);
        self
    }
}

impl BuildXML for TableCellBorders {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open("w:tcBorders")?
            .add_children(&self.borders)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCellProperty {
    pub width: Option<(usize, WidthType)>,
    pub grid_span: Option<usize>,
    pub vertical_merge: Option<VMergeType>,
    pub vertical_align: Option<VAlignType>,
    pub text_direction: Option<TextDirectionType>,
    pub borders: Option<TableCellBorders>,
    pub shading: Option<Shading>,
}

impl TableCellProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, w: usize, t: WidthType) -> Self {
        self.width = Some((w, t));
        self
    }

    pub fn grid_span(mut self, n: usize) -> Self {
        self.grid_span = Some(n);
        self
    }

    pub fn vertical_merge(mut self, t: VMergeType) -> Self {
        self.vertical_merge = Some(t);
        self
    }

    pub fn vertical_align(mut self, t: VAlignType) -> Self {
        self.vertical_align = Some(t);
        self
    }

    pub fn text_direction(mut self, t: TextDirectionType) -> Self {
        self.text_direction = Some(t);
        self
    }

    pub fn set_borders(mut self, b: TableCellBorders) -> Self {
        self.borders = Some(b);
        self
    }

    pub fn shading(mut self, s: Shading) -> Self {
        self.shading = Some(s);
        self
    }
}

impl BuildXML for TableCellProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_table_cell_property()?
            .apply_opt(self.width, |(w, t), b| {
                b.closed_with_attrs(
                    "w:tcW",
                    &[("w:w", &w.to_string()), ("w:type", t.to_xml_str())],
                )
            })?
            .apply_opt(self.grid_span, |n, b| {
                b.closed_with_attrs("w:gridSpan", &[("w:val", &n.to_string())])
            })?
            .apply_opt(self.vertical_merge, |m, b| {
                b.closed_with_attrs("w:vMerge", &[("w:val", m.to_xml_str())])
            })?
            .apply_opt(self.borders.clone(), |borders, b| b.add_child(&borders))?
            .apply_opt(self.shading.clone(), |s, b| b.add_child(&s))?
            .apply_opt(self.vertical_align, |v, b| {
                b.closed_with_attrs("w:vAlign", &[("w:val", v.to_xml_str())])
            })?
            .apply_opt(self.text_direction, |v, b| {
                b.closed_with_attrs("w:textDirection", &[("w:val", v.to_xml_str())])
            })?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableCellContent {
    Paragraph(Paragraph),
    Table(Table),
}

impl BuildXML for TableCellContent {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            TableCellContent::Paragraph(p) => p.build_to(stream),
            TableCellContent::Table(t) => t.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub children: Vec<TableCellContent>,
    pub property: TableCellProperty,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, p: Paragraph) -> Self {
        self.children.push(TableCellContent::Paragraph(p));
        self
    }

    pub fn grid_span(mut self, n: usize) -> Self {
        self.property = self.property.grid_span(n);
        self
    }

    pub fn vertical_merge(mut self, t: VMergeType) -> Self {
        self.property = self.property.vertical_merge(t);
        self
    }

    pub fn width(mut self, v: usize, t: WidthType) -> Self {
        self.property = self.property.width(v, t);
        self
    }
}

impl BuildXML for TableCell {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_table_cell()?
            .add_child(&self.property)?
            .apply_if(self.children.is_empty(), |b| b.add_child(&Paragraph::new()))?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlWidthNode {
    #[serde(rename = "@w", alias = "@w:w", default)]
    width: Option<String>,
    #[serde(rename = "@type", alias = "@w:type", default)]
    width_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlValNode {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlBorderNode {
    #[serde(rename = "@val", alias = "@w:val", default)]
    border_type: Option<String>,
    #[serde(rename = "@sz", alias = "@w:sz", default)]
    size: Option<String>,
    #[serde(rename = "@color", alias = "@w:color", default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TableCellBordersXml {
    #[serde(rename = "top", alias = "w:top", default)]
    top: Option<XmlBorderNode>,
    #[serde(rename = "left", alias = "w:left", default)]
    left: Option<XmlBorderNode>,
    #[serde(rename = "bottom", alias = "w:bottom", default)]
    bottom: Option<XmlBorderNode>,
    #[serde(rename = "right", alias = "w:right", default)]
    right: Option<XmlBorderNode>,
}

#[derive(Debug, Deserialize, Default)]
struct ShadingXml {
    #[serde(rename = "@val", alias = "@w:val", default)]
    shd_type: Option<String>,
    #[serde(rename = "@color", alias = "@w:color", default)]
    color: Option<String>,
    #[serde(rename = "@fill", alias = "@w:fill", default)]
    fill: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TableCellPropertyXml {
    #[serde(rename = "tcW", alias = "w:tcW", default)]
    width: Option<XmlWidthNode>,
    #[serde(rename = "gridSpan", alias = "w:gridSpan", default)]
    grid_span: Option<XmlValNode>,
    #[serde(rename = "vMerge", alias = "w:vMerge", default)]
    vertical_merge: Option<XmlValNode>,
    #[serde(rename = "vAlign", alias = "w:vAlign", default)]
    vertical_align: Option<XmlValNode>,
    #[serde(rename = "textDirection", alias = "w:textDirection", default)]
    text_direction: Option<XmlValNode>,
    #[serde(rename = "tcBorders", alias = "w:tcBorders", default)]
    borders: Option<TableCellBordersXml>,
    #[serde(rename = "shd", alias = "w:shd", default)]
    shading: Option<ShadingXml>,
}

/// Parses a `w:val`/`w:w`/`w:sz`-shaped numeric attribute, stripping a
/// trailing `%` first since `w:tcW`'s width can be expressed as a percentage.
/// A present-but-malformed value is a `ParseAttrError`, not a silent `None`
/// (`spec.md` §8's gridSpan/width testable property).
fn parse_usize_attr(element: &str, attr_name: &str, raw: Option<String>) -> Result<Option<usize>, ParseAttrError> {
    match raw {
        None => Ok(None),
        Some(v) => attr::parse_usize(element, attr_name, v.trim().trim_end_matches('%')).map(Some),
    }
}

fn parse_border(node: XmlBorderNode, position: TableCellBorderPosition) -> Result<TableCellBorder, ParseAttrError> {
    let mut b = TableCellBorder::new(position);
    if let Some(v) = node.border_type.as_deref().and_then(BorderType::from_xml_str) {
        b = b.border_type(v);
    }
    if let Some(v) = parse_usize_attr("w:tcBorders", "w:sz", node.size)? {
        b = b.size(v);
    }
    if let Some(v) = node.color {
        b = b.color(v);
    }
    Ok(b)
}

fn parse_property(xml: Option<TableCellPropertyXml>) -> Result<TableCellProperty, ParseAttrError> {
    let Some(xml) = xml else {
        return Ok(TableCellProperty::new());
    };
    let mut p = TableCellProperty::new();
    if let Some(w) = xml.width {
        if let Some(v) = parse_usize_attr("w:tcW", "w:w", w.width)? {
            let t = w
                .width_type
                .as_deref()
                .and_then(WidthType::from_xml_str)
                .unwrap_or(WidthType::Auto);
            p = p.width(v, t);
        }
    }
    if let Some(v) = parse_usize_attr("w:gridSpan", "w:val", xml.grid_span.and_then(|v| v.val))? {
        p = p.grid_span(v);
    }
    if let Some(v) = xml.vertical_merge {
        let merge = v
            .val
            .as_deref()
            .and_then(VMergeType::from_xml_str)
            .unwrap_or(VMergeType::Continue);
        p = p.vertical_merge(merge);
    }
    if let Some(v) = xml
        .vertical_align
        .and_then(|v| v.val)
        .as_deref()
        .and_then(VAlignType::from_xml_str)
    {
        p = p.vertical_align(v);
    }
    if let Some(borders) = xml.borders {
        let mut b = TableCellBorders::with_empty();
        if let Some(v) = borders.top {
            b = b.set(parse_border(v, TableCellBorderPosition::Top)?);
        }
        if let Some(v) = borders.left {
            b = b.set(parse_border(v, TableCellBorderPosition::Left)?);
        }
        if let Some(v) = borders.bottom {
            b = b.set(parse_border(v, TableCellBorderPosition::Bottom)?);
        }
        if let Some(v) = borders.right {
            b = b.set(parse_border(v, TableCellBorderPosition::Right)?);
        }
        p = p.set_borders(b);
    }
    if let Some(s) = xml.shading {
        let mut shd = Shading::new();
        if let Some(v) = s.shd_type {
            shd = shd.shd_type(v);
        }
        if let Some(v) = s.color {
            shd = shd.color(v);
        }
        if let Some(v) = s.fill {
            shd = shd.fill(v);
        }
        p = p.shading(shd);
    }
    Ok(p)
}

#[derive(Debug, Deserialize)]
enum TableCellChildXml {
    #[serde(rename = "p", alias = "w:p")]
    Paragraph(Paragraph),
    #[serde(rename = "tbl", alias = "w:tbl")]
    Table(Table),
    #[serde(rename = "tcPr", alias = "w:tcPr")]
    Property(IgnoredAny),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct TableCellXml {
    #[serde(rename = "tcPr", alias = "w:tcPr", default)]
    property: Option<TableCellPropertyXml>,
    #[serde(rename = "$value", default)]
    children: Vec<TableCellChildXml>,
}

impl<'de> Deserialize<'de> for TableCell {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let xml = TableCellXml::deserialize(deserializer)?;
        let children = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                TableCellChildXml::Paragraph(p) => Some(TableCellContent::Paragraph(p)),
                TableCellChildXml::Table(t) => Some(TableCellContent::Table(t)),
                TableCellChildXml::Property(_) | TableCellChildXml::Unknown => None,
            })
            .collect();
        let property = parse_property(xml.property).map_err(|e| D::Error::custom(e.to_custom_message()))?;
        Ok(TableCell { children, property })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build() {
        let c = TableCell::new().add_paragraph(Paragraph::new().add_run(
            crate::documents::run::Run::new().add_text("Hello"),
        ));
        assert_eq!(
            str::from_utf8(&c.build()).unwrap(),
            r#"<w:tc><w:tcPr /><w:p><w:pPr><w:rPr /></w:pPr><w:r><w:rPr /><w:t>Hello</w:t></w:r></w:p></w:tc>"#
        );
    }
}
