//! `w:tr`, `spec.md` §4.4.
//!
//! Grounded on `docx-core/src/documents/elements/table_row.rs`. Drops the
//! teacher's `has_numbering`/`serde(rename_all = "camelCase")` JSON-bridge
//! plumbing; keeps `gridBefore`/`gridAfter`/`trHeight`/`cantSplit` and the
//! `ins`/`del` track-change wrappers a row property can carry.

use std::io::Write;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::documents::table_cell::TableCell;
use crate::documents::track_change::{Delete, Insert};
use crate::documents::BuildXML;
use crate::types::HeightRule;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRowProperty {
    pub grid_after: Option<u32>,
    pub width_after: Option<f32>,
    pub grid_before: Option<u32>,
    pub width_before: Option<f32>,
    pub row_height: Option<f32>,
    pub height_rule: Option<HeightRule>,
    pub cant_split: bool,
    pub insert: Option<Insert>,
    pub delete: Option<Delete>,
}

impl TableRowProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_after(mut self, v: u32) -> Self {
        self.grid_after = Some(v);
        self
    }

    pub fn width_after(mut self, v: f32) -> Self {
        self.width_after = Some(v);
        self
    }

    pub fn grid_before(mut self, v: u32) -> Self {
        self.grid_before = Some(v);
        self
    }

    pub fn width_before(mut self, v: f32) -> Self {
        self.width_before = Some(v);
        self
    }

    pub fn row_height(mut self, v: f32) -> Self {
        self.row_height = Some(v);
        self
    }

    pub fn height_rule(mut self, v: HeightRule) -> Self {
        self.height_rule = Some(v);
        self
    }

    pub fn cant_split(mut self) -> Self {
        self.cant_split = true;
        self
    }

    pub fn insert(mut self, i: Insert) -> Self {
        self.insert = Some(i);
        self
    }

    pub fn delete(mut self, d: Delete) -> Self {
        self.delete = Some(d);
        self
    }
}

impl BuildXML for TableRowProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_table_row_property()?
            .apply_opt(self.grid_before, |v, b| {
                b.closed_with_attrs("w:gridBefore", &[("w:val", &v.to_string())])
            })?
            .apply_opt(self.width_before, |v, b| {
                b.closed_with_attrs("w:wBefore", &[("w:w", &v.to_string())])
            })?
            .apply_opt(self.grid_after, |v, b| {
                b.closed_with_attrs("w:gridAfter", &[("w:val", &v.to_string())])
            })?
            .apply_opt(self.width_after, |v, b| {
                b.closed_with_attrs("w:wAfter", &[("w:w", &v.to_string())])
            })?
            .apply_opt(self.row_height.zip(self.height_rule.or(Some(HeightRule::Auto))), |(h, rule), b| {
                b.closed_with_attrs(
                    "w:trHeight",
                    &[("w:val", &h.to_string()), ("w:hRule", rule.to_xml_str())],
                )
            })?
            .apply_if(self.cant_split, |b| b.closed("w:cantSplit"))?
            .apply_opt(self.insert.clone(), |i, b| b.add_child(&i))?
            .apply_opt(self.delete.clone(), |d, b| b.add_child(&d))?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRowChild {
    TableCell(TableCell),
}

impl BuildXML for TableRowChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            TableRowChild::TableCell(c) => c.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableRowChild>,
    pub property: TableRowProperty,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells: cells.into_iter().map(TableRowChild::TableCell).collect(),
            property: TableRowProperty::new(),
        }
    }

    pub fn grid_after(mut self, v: u32) -> Self {
        self.property = self.property.grid_after(v);
        self
    }

    pub fn grid_before(mut self, v: u32) -> Self {
        self.property = self.property.grid_before(v);
        self
    }

    pub fn row_height(mut self, v: f32) -> Self {
        self.property = self.property.row_height(v);
        self
    }

    pub fn cant_split(mut self) -> Self {
        self.property = self.property.cant_split();
        self
    }

    /// Typed accessor for the geometry engine: cells as a plain slice,
    /// independent of the `TableRowChild` wrapper.
    pub fn cells(&self) -> Vec<&TableCell> {
        self.cells
            .iter()
            .map(|c| match c {
                TableRowChild::TableCell(cell) => cell,
            })
            .collect()
    }
}

impl BuildXML for TableRow {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_table_row()?
            .add_child(&self.property)?
            .add_children(&self.cells)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlValNode {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlWidthNode {
    #[serde(rename = "@w", alias = "@w:w", default)]
    width: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlHeightNode {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
    #[serde(rename = "@hRule", alias = "@w:hRule", default)]
    rule: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TrackChangeXml {
    #[serde(rename = "@author", alias = "@w:author", default)]
    author: Option<String>,
    #[serde(rename = "@date", alias = "@w:date", default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TableRowPropertyXml {
    #[serde(rename = "gridAfter", alias = "w:gridAfter", default)]
    grid_after: Option<XmlValNode>,
    #[serde(rename = "wAfter", alias = "w:wAfter", default)]
    width_after: Option<XmlWidthNode>,
    #[serde(rename = "gridBefore", alias = "w:gridBefore", default)]
    grid_before: Option<XmlValNode>,
    #[serde(rename = "wBefore", alias = "w:wBefore", default)]
    width_before: Option<XmlWidthNode>,
    #[serde(rename = "trHeight", alias = "w:trHeight", default)]
    row_height: Option<XmlHeightNode>,
    #[serde(rename = "cantSplit", alias = "w:cantSplit", default)]
    cant_split: Option<XmlValNode>,
    #[serde(rename = "ins", alias = "w:ins", default)]
    ins: Option<TrackChangeXml>,
    #[serde(rename = "del", alias = "w:del", default)]
    del: Option<TrackChangeXml>,
}

#[derive(Debug, Deserialize)]
enum TableRowChildXml {
    #[serde(rename = "tc", alias = "w:tc")]
    TableCell(TableCell),
    #[serde(rename = "trPr", alias = "w:trPr")]
    TableRowProperty(IgnoredAny),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct TableRowXml {
    #[serde(rename = "trPr", alias = "w:trPr", default)]
    property: Option<TableRowPropertyXml>,
    #[serde(rename = "$value", default)]
    children: Vec<TableRowChildXml>,
}

fn parse_u32(raw: Option<String>) -> Option<u32> {
    raw.and_then(|v| v.parse().ok())
}

fn parse_f32(raw: Option<String>) -> Option<f32> {
    raw.and_then(|v| v.parse().ok())
}

fn parse_property(xml: Option<TableRowPropertyXml>) -> TableRowProperty {
    let Some(xml) = xml else {
        return TableRowProperty::new();
    };
    let mut p = TableRowProperty::new();
    if let Some(v) = parse_u32(xml.grid_after.and_then(|v| v.val)) {
        p = p.grid_after(v);
    }
    if let Some(v) = parse_f32(xml.width_after.and_then(|v| v.width)) {
        p = p.width_after(v);
    }
    if let Some(v) = parse_u32(xml.grid_before.and_then(|v| v.val)) {
        p = p.grid_before(v);
    }
    if let Some(v) = parse_f32(xml.width_before.and_then(|v| v.width)) {
        p = p.width_before(v);
    }
    if let Some(h) = xml.row_height {
        if let Some(v) = parse_f32(h.val) {
            p = p.row_height(v);
        }
        if let Some(v) = h.rule.as_deref().and_then(HeightRule::from_xml_str) {
            p = p.height_rule(v);
        }
    }
    if xml.cant_split.is_some() {
        p = p.cant_split();
    }
    if let Some(ins) = xml.ins {
        let mut i = Insert::new(crate::documents::run::Run::new());
        if let Some(a) = ins.author {
            i = i.author(a);
        }
        if let Some(d) = ins.date {
            i = i.date(d);
        }
        p = p.insert(i);
    }
    if let Some(del) = xml.del {
        let mut d = Delete::new();
        if let Some(a) = del.author {
            d.author = a;
        }
        if let Some(v) = del.date {
            d.date = v;
        }
        p = p.delete(d);
    }
    p
}

impl<'de> Deserialize<'de> for TableRow {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let xml = TableRowXml::deserialize(deserializer)?;
        let cells = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                TableRowChildXml::TableCell(cell) => Some(TableRowChild::TableCell(cell)),
                TableRowChildXml::TableRowProperty(_) | TableRowChildXml::Unknown => None,
            })
            .collect();
        Ok(TableRow {
            cells,
            property: parse_property(xml.property),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_row() {
        let b = TableRow::new(vec![TableCell::new()]).build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:tr><w:trPr /><w:tc><w:tcPr /><w:p><w:pPr><w:rPr /></w:pPr></w:p></w:tc></w:tr>"#
        );
    }

    #[test]
    fn test_row_cant_split() {
        let b = TableRow::new(vec![TableCell::new()]).cant_split().build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:tr><w:trPr><w:cantSplit /></w:trPr><w:tc><w:tcPr /><w:p><w:pPr><w:rPr /></w:pPr></w:p></w:tc></w:tr>"#
        );
    }
}
