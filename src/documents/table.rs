//! `w:tbl`, `spec.md` §4.4.
//!
//! Grounded on `docx-core/src/documents/elements/table.rs`. Drops the
//! teacher's `has_numbering`/JSON-bridge `Serialize` plumbing and its
//! floating-table `TablePositionProperty`/cell-margin types, which have no
//! counterpart in this crate's scope. Table-level borders reuse
//! `table_cell::TableCellBorder` rather than a parallel struct, since the
//! wire shape (`w:top`/`w:left`/.../`w:insideH`/`w:insideV`) is identical.

use std::io::Write;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::documents::table_cell::{TableCellBorder, TableCellBorderPosition};
use crate::documents::table_row::TableRow;
use crate::documents::BuildXML;
use crate::error::ParseAttrError;
use crate::types::attr;
use crate::types::{AlignmentType, TableLayoutType, WidthType};
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableBorders {
    pub borders: Vec<TableCellBorder>,
}

impl TableBorders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the teacher's "every edge single/2/000000 by default".
    pub fn with_default_borders() -> Self {
        use TableCellBorderPosition::*;
        let mut b = Self::new();
        for pos in [Top, Left, Bottom, Right, InsideH, InsideV] {
            b = b.set(TableCellBorder::new(pos).size(2).color("000000"));
        }
        b
    }

    pub fn set(mut self, border: TableCellBorder) -> Self {
        self.borders.retain(|b| b.position != border.position);
        self.borders.push(border);
        self
    }

    pub fn clear(mut self, position: TableCellBorderPosition) -> Self {
        self.borders.retain(|b| b.position != position);
        self
    }

    pub fn clear_all(mut self) -> Self {
        self.borders.clear();
        self
    }
}

impl BuildXML for TableBorders {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open("w:tblBorders")?
            .add_children(&self.borders)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableProperty {
    pub width: Option<(usize, WidthType)>,
    pub justification: Option<AlignmentType>,
    pub indent: Option<i32>,
    pub style: Option<String>,
    pub layout: Option<TableLayoutType>,
    pub borders: Option<TableBorders>,
}

impl TableProperty {
    pub fn new() -> Self {
        Self {
            width: Some((0, WidthType::Auto)),
            justification: Some(AlignmentType::Left),
            borders: Some(TableBorders::with_default_borders()),
            ..Default::default()
        }
    }

    pub fn without_borders() -> Self {
        Self::default()
    }

    pub fn width(mut self, w: usize, t: WidthType) -> Self {
        self.width = Some((w, t));
        self
    }

    pub fn align(mut self, a: AlignmentType) -> Self {
        self.justification = Some(a);
        self
    }

    pub fn indent(mut self, v: i32) -> Self {
        self.indent = Some(v);
        self
    }

    pub fn style(mut self, s: impl Into<String>) -> Self {
        self.style = Some(s.into());
        self
    }

    pub fn layout(mut self, t: TableLayoutType) -> Self {
        self.layout = Some(t);
        self
    }

    pub fn set_borders(mut self, b: TableBorders) -> Self {
        self.borders = Some(b);
        self
    }

    pub fn set_border(mut self, border: TableCellBorder) -> Self {
        self.borders = Some(self.borders.unwrap_or_default().set(border));
        self
    }

    pub fn clear_border(mut self, position: TableCellBorderPosition) -> Self {
        self.borders = self.borders.map(|b| b.clear(position));
        self
    }

    pub fn clear_all_border(mut self) -> Self {
        self.borders = self.borders.map(|b| b.clear_all());
        self
    }
}

impl BuildXML for TableProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open("w:tblPr")?
            .apply_opt(self.width, |(w, t), b| {
                b.closed_with_attrs(
                    "w:tblW",
                    &[("w:w", &w.to_string()), ("w:type", t.to_xml_str())],
                )
            })?
            .apply_opt(self.justification, |a, b| {
                b.closed_with_attrs("w:jc", &[("w:val", a.to_xml_str())])
            })?
            .apply_opt(self.indent, |v, b| {
                b.closed_with_attrs(
                    "w:tblInd",
                    &[("w:w", &v.to_string()), ("w:type", "dxa")],
                )
            })?
            .apply_opt(self.style.as_deref(), |v, b| {
                b.closed_with_attrs("w:tblStyle", &[("w:val", v)])
            })?
            .apply_opt(self.layout, |v, b| {
                b.closed_with_attrs("w:tblLayout", &[("w:type", v.to_xml_str())])
            })?
            .apply_opt(self.borders.clone(), |v, b| b.add_child(&v))?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableGrid {
    pub columns: Vec<usize>,
}

impl TableGrid {
    pub fn new(columns: Vec<usize>) -> Self {
        Self { columns }
    }
}

impl BuildXML for TableGrid {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open("w:tblGrid")?
            .apply_each(&self.columns, |w, b| {
                b.closed_with_attrs(
                    "w:gridCol",
                    &[("w:w", &w.to_string()), ("w:type", "dxa")],
                )
            })?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChild {
    TableRow(TableRow),
}

impl BuildXML for TableChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            TableChild::TableRow(r) => r.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableChild>,
    pub grid: Vec<usize>,
    pub property: TableProperty,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows: rows.into_iter().map(TableChild::TableRow).collect(),
            grid: Vec::new(),
            property: TableProperty::new(),
        }
    }

    pub fn without_borders(rows: Vec<TableRow>) -> Self {
        Self {
            rows: rows.into_iter().map(TableChild::TableRow).collect(),
            grid: Vec::new(),
            property: TableProperty::without_borders(),
        }
    }

    pub fn add_row(mut self, row: TableRow) -> Self {
        self.rows.push(TableChild::TableRow(row));
        self
    }

    pub fn set_grid(mut self, grid: Vec<usize>) -> Self {
        self.grid = grid;
        self
    }

    pub fn width(mut self, w: usize, t: WidthType) -> Self {
        self.property = self.property.width(w, t);
        self
    }

    pub fn align(mut self, a: AlignmentType) -> Self {
        self.property = self.property.align(a);
        self
    }

    pub fn style(mut self, s: impl Into<String>) -> Self {
        self.property = self.property.style(s);
        self
    }

    pub fn layout(mut self, t: TableLayoutType) -> Self {
        self.property = self.property.layout(t);
        self
    }

    /// Typed row accessor used by the geometry resolver (`table_geometry.rs`).
    pub fn rows(&self) -> Vec<&TableRow> {
        self.rows
            .iter()
            .map(|r| match r {
                TableChild::TableRow(row) => row,
            })
            .collect()
    }
}

impl BuildXML for Table {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let grid = TableGrid::new(self.grid.clone());
        XMLBuilder::from(stream)
            .open_table()?
            .add_child(&self.property)?
            .add_child(&grid)?
            .add_children(&self.rows)?
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
struct XmlLayoutNode {
    #[serde(rename = "@type", alias = "@w:type", default)]
    layout_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TablePropertyXml {
    #[serde(rename = "tblW", alias = "w:tblW", default)]
    width: Option<XmlWidthNode>,
    #[serde(rename = "jc", alias = "w:jc", default)]
    justification: Option<XmlValNode>,
    #[serde(rename = "tblInd", alias = "w:tblInd", default)]
    indent: Option<XmlWidthNode>,
    #[serde(rename = "tblStyle", alias = "w:tblStyle", default)]
    style: Option<XmlValNode>,
    #[serde(rename = "tblLayout", alias = "w:tblLayout", default)]
    layout: Option<XmlLayoutNode>,
    #[serde(rename = "tblBorders", alias = "w:tblBorders", default)]
    borders: Option<IgnoredAny>,
}

#[derive(Debug, Deserialize, Default)]
struct GridColXml {
    #[serde(rename = "@w", alias = "@w:w", default)]
    width: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TableGridXml {
    #[serde(rename = "gridCol", alias = "w:gridCol", default)]
    columns: Vec<GridColXml>,
}

#[derive(Debug, Deserialize)]
enum TableChildXml {
    #[serde(rename = "tr", alias = "w:tr")]
    TableRow(TableRow),
    #[serde(rename = "tblPr", alias = "w:tblPr")]
    TableProperty(IgnoredAny),
    #[serde(rename = "tblGrid", alias = "w:tblGrid")]
    TableGrid(IgnoredAny),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct TableXml {
    #[serde(rename = "tblPr", alias = "w:tblPr", default)]
    property: Option<TablePropertyXml>,
    #[serde(rename = "tblGrid", alias = "w:tblGrid", default)]
    grid: Option<TableGridXml>,
    #[serde(rename = "$value", default)]
    children: Vec<TableChildXml>,
}

/// Parses a `w:tblW`/`w:tblInd`-shaped numeric attribute, stripping a
/// trailing `%` first. A present-but-malformed value is a `ParseAttrError`,
/// not a silent `None` (`spec.md` §8's width/indent testable property).
fn parse_usize_attr(element: &str, attr_name: &str, raw: Option<String>) -> Result<Option<usize>, ParseAttrError> {
    match raw {
        None => Ok(None),
        Some(v) => attr::parse_usize(element, attr_name, v.trim().trim_end_matches('%')).map(Some),
    }
}

fn parse_property(xml: Option<TablePropertyXml>) -> Result<TableProperty, ParseAttrError> {
    let Some(xml) = xml else {
        return Ok(TableProperty::without_borders());
    };
    let mut p = TableProperty::without_borders();
    if let Some(w) = xml.width {
        if let Some(v) = parse_usize_attr("w:tblW", "w:w", w.width)? {
            let t = w
                .width_type
                .as_deref()
                .and_then(WidthType::from_xml_str)
                .unwrap_or(WidthType::Auto);
            p = p.width(v, t);
        }
    }
    if let Some(v) = xml
        .justification
        .and_then(|v| v.val)
        .as_deref()
        .and_then(AlignmentType::from_xml_str)
    {
        p = p.align(v);
    }
    if let Some(v) = parse_usize_attr("w:tblInd", "w:w", xml.indent.and_then(|v| v.width))? {
        p = p.indent(v as i32);
    }
    if let Some(v) = xml.style.and_then(|v| v.val) {
        p = p.style(v);
    }
    if let Some(v) = xml
        .layout
        .and_then(|v| v.layout_type)
        .as_deref()
        .and_then(TableLayoutType::from_xml_str)
    {
        p = p.layout(v);
    }
    Ok(p)
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let xml = TableXml::deserialize(deserializer)?;
        let rows = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                TableChildXml::TableRow(r) => Some(TableChild::TableRow(r)),
                TableChildXml::TableProperty(_)
                | TableChildXml::TableGrid(_)
                | TableChildXml::Unknown => None,
            })
            .collect();
        let grid = match xml.grid {
            Some(g) => g
                .columns
                .into_iter()
                .map(|c| attr::parse_usize("w:gridCol", "w:w", c.width.as_deref().unwrap_or_default()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| D::Error::custom(e.to_custom_message()))?,
            None => Vec::new(),
        };
        let property = parse_property(xml.property).map_err(|e| D::Error::custom(e.to_custom_message()))?;
        Ok(Table { rows, grid, property })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_table_grid() {
        let b = Table::without_borders(vec![TableRow::new(vec![])])
            .set_grid(vec![100, 200])
            .build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:tbl><w:tblPr /><w:tblGrid><w:gridCol w:w="100" w:type="dxa" /><w:gridCol w:w="200" w:type="dxa" /></w:tblGrid><w:tr><w:trPr /></w:tr></w:tbl>"#
        );
    }
}
