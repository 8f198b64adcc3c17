//! `w:p`, `spec.md` §4.3.
//!
//! Grounded on `style.rs`'s `ParagraphPropertyXml`/`parse_paragraph_property_xml`
//! (the only place the teacher's pack exposes paragraph-property parsing,
//! `Paragraph` itself having been filtered from the retrieved pack). Keep
//! toggles (`keepNext`, `keepLines`, `pageBreakBefore`, `widowControl`) use
//! `OnOff` rather than `Option<bool>` for the same tri-state reason as
//! `RunProperty`.

use std::fmt;
use std::io::Write;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::bookmark::{BookmarkEnd, BookmarkStart};
use crate::documents::comments::{CommentRangeEnd, CommentRangeStart};
use crate::documents::hyperlink::Hyperlink;
use crate::documents::opaque::OpaqueNode;
use crate::documents::run::Run;
use crate::documents::run_property::RunProperty;
use crate::documents::section_property::SectionProperty;
use crate::documents::track_change::{Delete, Insert};
use crate::documents::BuildXML;
use crate::error::ParseAttrError;
use crate::types::attr;
use crate::types::{AlignmentType, LineSpacing, OnOff};
use crate::xml_builder::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialIndent {
    Hanging(i32),
    FirstLine(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Indent {
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub special: Option<SpecialIndent>,
    pub start_chars: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphProperty {
    pub style: Option<String>,
    pub run_property: RunProperty,
    pub alignment: Option<AlignmentType>,
    pub indent: Option<Indent>,
    pub line_spacing: Option<LineSpacing>,
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
    pub keep_next: OnOff,
    pub keep_lines: OnOff,
    pub page_break_before: OnOff,
    pub widow_control: OnOff,
    pub outline_lvl: Option<usize>,
    pub div_id: Option<String>,
    /// A bare `w:sectPr` nested in this paragraph's `w:pPr` marks a section
    /// boundary: the section resolver (`crate::documents::sections`) reads
    /// this to partition `Document::children`, per `spec.md` §4.5.
    pub section_property: Option<SectionProperty>,
}

impl ParagraphProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, s: impl Into<String>) -> Self {
        self.style = Some(s.into());
        self
    }

    pub fn align(mut self, a: AlignmentType) -> Self {
        self.alignment = Some(a);
        self
    }

    pub fn indent(
        mut self,
        start: Option<i32>,
        special: Option<SpecialIndent>,
        end: Option<i32>,
        start_chars: Option<i32>,
    ) -> Self {
        self.indent = Some(Indent {
            start,
            end,
            special,
            start_chars,
        });
        self
    }

    pub fn line_spacing(mut self, ls: LineSpacing) -> Self {
        self.line_spacing = Some(ls);
        self
    }

    pub fn spacing_before(mut self, v: u32) -> Self {
        self.spacing_before = Some(v);
        self
    }

    pub fn spacing_after(mut self, v: u32) -> Self {
        self.spacing_after = Some(v);
        self
    }

    pub fn keep_next(mut self) -> Self {
        self.keep_next = OnOff::On;
        self
    }

    pub fn page_break_before(mut self) -> Self {
        self.page_break_before = OnOff::On;
        self
    }

    pub fn outline_lvl(mut self, l: usize) -> Self {
        self.outline_lvl = Some(l);
        self
    }

    pub fn section_property(mut self, s: SectionProperty) -> Self {
        self.section_property = Some(s);
        self
    }
}

impl BuildXML for ParagraphProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_paragraph_property()?
            .apply_opt(self.style.as_deref(), |v, b| {
                b.closed_with_attrs("w:pStyle", &[("w:val", v)])
            })?
            .apply_if(self.keep_next.is_on(), |b| b.closed("w:keepNext"))?
            .apply_if(self.keep_lines.is_on(), |b| b.closed("w:keepLines"))?
            .apply_if(self.page_break_before.is_on(), |b| {
                b.closed("w:pageBreakBefore")
            })?
            .apply_if(self.widow_control.is_on(), |b| b.closed("w:widowControl"))?
            .apply_opt(self.indent, |ind, b| {
                let mut attrs: Vec<(String, String)> = Vec::new();
                if let Some(s) = ind.start {
                    attrs.push(("w:left".into(), s.to_string()));
                }
                if let Some(e) = ind.end {
                    attrs.push(("w:right".into(), e.to_string()));
                }
                match ind.special {
                    Some(SpecialIndent::Hanging(v)) => attrs.push(("w:hanging".into(), v.to_string())),
                    Some(SpecialIndent::FirstLine(v)) => {
                        attrs.push(("w:firstLine".into(), v.to_string()))
                    }
                    None => {}
                }
                if let Some(s) = ind.start_chars {
                    attrs.push(("w:startChars".into(), s.to_string()));
                }
                let refs: Vec<(&str, &str)> =
                    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                b.closed_with_attrs("w:ind", &refs)
            })?
            .apply_opt(self.line_spacing.map(|ls| ls.to_wire()), |(line, rule), b| {
                b.closed_with_attrs(
                    "w:spacing",
                    &[("w:line", &line.to_string()), ("w:lineRule", rule)],
                )
            })?
            .apply_if(
                self.spacing_before.is_some() || self.spacing_after.is_some(),
                |b| {
                    let before = self.spacing_before.map(|v| v.to_string());
                    let after = self.spacing_after.map(|v| v.to_string());
                    let mut attrs = Vec::new();
                    if let Some(v) = &before {
                        attrs.push(("w:before", v.as_str()));
                    }
                    if let Some(v) = &after {
                        attrs.push(("w:after", v.as_str()));
                    }
                    b.closed_with_attrs("w:spacing", &attrs)
                },
            )?
            .apply_opt(self.alignment, |a, b| {
                b.closed_with_attrs("w:jc", &[("w:val", a.to_xml_str())])
            })?
            .apply_opt(self.outline_lvl, |v, b| {
                b.closed_with_attrs("w:outlineLvl", &[("w:val", &v.to_string())])
            })?
            .add_child(&self.run_property)?
            .add_optional_child(&self.section_property)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphChild {
    Run(Box<Run>),
    Hyperlink(Box<Hyperlink>),
    Insert(Box<Insert>),
    Delete(Box<Delete>),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    CommentRangeStart(CommentRangeStart),
    CommentRangeEnd(CommentRangeEnd),
    Unrecognized(OpaqueNode),
}

impl BuildXML for ParagraphChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            ParagraphChild::Run(r) => r.build_to(stream),
            ParagraphChild::Hyperlink(h) => h.build_to(stream),
            ParagraphChild::Insert(i) => i.build_to(stream),
            ParagraphChild::Delete(d) => d.build_to(stream),
            ParagraphChild::BookmarkStart(b) => b.build_to(stream),
            ParagraphChild::BookmarkEnd(b) => b.build_to(stream),
            ParagraphChild::CommentRangeStart(c) => c.build_to(stream),
            ParagraphChild::CommentRangeEnd(c) => c.build_to(stream),
            ParagraphChild::Unrecognized(n) => n.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub property: ParagraphProperty,
    pub children: Vec<ParagraphChild>,
    pub id: Option<String>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(ParagraphChild::Run(Box::new(run)));
        self
    }

    pub fn add_hyperlink(mut self, h: Hyperlink) -> Self {
        self.children.push(ParagraphChild::Hyperlink(Box::new(h)));
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

    /// Concatenated plain text of every run in document order, per
    /// `spec.md` §4.2's paragraph-text-extraction operation.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(|c| match c {
                ParagraphChild::Run(r) => r.plain_text(),
                ParagraphChild::Hyperlink(h) => h.plain_text(),
                ParagraphChild::Insert(i) => i.plain_text(),
                _ => String::new(),
            })
            .collect()
    }
}

impl BuildXML for Paragraph {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let attrs: Vec<(&str, &str)> = self
            .id
            .as_deref()
            .map(|id| vec![("w14:paraId", id)])
            .unwrap_or_default();
        XMLBuilder::from(stream)
            .open_with_attrs("w:p", &attrs)?
            .add_child(&self.property)?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlValueAttr {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct IndentXml {
    #[serde(rename = "@left", alias = "@w:left", alias = "@start", alias = "@w:start", default)]
    left: Option<String>,
    #[serde(rename = "@right", alias = "@w:right", alias = "@end", alias = "@w:end", default)]
    right: Option<String>,
    #[serde(rename = "@hanging", alias = "@w:hanging", default)]
    hanging: Option<String>,
    #[serde(rename = "@firstLine", alias = "@w:firstLine", default)]
    first_line: Option<String>,
    #[serde(rename = "@startChars", alias = "@w:startChars", default)]
    start_chars: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SpacingXml {
    #[serde(rename = "@lineRule", alias = "@w:lineRule", default)]
    line_rule: Option<String>,
    #[serde(rename = "@line", alias = "@w:line", default)]
    line: Option<String>,
    #[serde(rename = "@before", alias = "@w:before", default)]
    before: Option<String>,
    #[serde(rename = "@after", alias = "@w:after", default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ParagraphPropertyXml {
    #[serde(rename = "rPr", alias = "w:rPr", default)]
    run_property: Option<RunProperty>,
    #[serde(rename = "pStyle", alias = "w:pStyle", default)]
    style: Option<XmlValueAttr>,
    #[serde(rename = "jc", alias = "w:jc", default)]
    alignment: Option<XmlValueAttr>,
    #[serde(rename = "ind", alias = "w:ind", default)]
    indent: Option<IndentXml>,
    #[serde(rename = "spacing", alias = "w:spacing", default)]
    spacing: Option<SpacingXml>,
    #[serde(rename = "outlineLvl", alias = "w:outlineLvl", default)]
    outline_lvl: Option<XmlValueAttr>,
    #[serde(rename = "keepNext", alias = "w:keepNext", default)]
    keep_next: Option<IgnoredAny>,
    #[serde(rename = "keepLines", alias = "w:keepLines", default)]
    keep_lines: Option<IgnoredAny>,
    #[serde(rename = "pageBreakBefore", alias = "w:pageBreakBefore", default)]
    page_break_before: Option<IgnoredAny>,
    #[serde(rename = "widowControl", alias = "w:widowControl", default)]
    widow_control: Option<IgnoredAny>,
    #[serde(rename = "sectPr", alias = "w:sectPr", default)]
    section_property: Option<SectionProperty>,
}

/// Parses an optional `i32` attribute, surfacing a `ParseAttrError` on a
/// present-but-malformed value instead of silently dropping it (`spec.md`
/// §8's paragraph-alignment/indent testable properties).
fn parse_opt_i32(element: &str, attr_name: &str, raw: Option<String>) -> Result<Option<i32>, ParseAttrError> {
    match raw {
        None => Ok(None),
        Some(v) => attr::parse_i32(element, attr_name, &v).map(Some),
    }
}

fn parse_opt_usize(element: &str, attr_name: &str, raw: Option<String>) -> Result<Option<usize>, ParseAttrError> {
    match raw {
        None => Ok(None),
        Some(v) => attr::parse_usize(element, attr_name, &v).map(Some),
    }
}

fn parse_paragraph_property(xml: Option<ParagraphPropertyXml>) -> Result<ParagraphProperty, ParseAttrError> {
    let Some(xml) = xml else {
        return Ok(ParagraphProperty::new());
    };
    let mut p = ParagraphProperty::new();
    p.section_property = xml.section_property;
    p.style = xml.style.and_then(|v| v.val);
    p.run_property = xml.run_property.unwrap_or_default();
    if let Some(v) = xml.alignment.and_then(|v| v.val) {
        p.alignment = Some(attr::parse_enum("w:jc", "w:val", &v, AlignmentType::from_xml_str)?);
    }
    if xml.keep_next.is_some() {
        p.keep_next = OnOff::On;
    }
    if xml.keep_lines.is_some() {
        p.keep_lines = OnOff::On;
    }
    if xml.page_break_before.is_some() {
        p.page_break_before = OnOff::On;
    }
    if xml.widow_control.is_some() {
        p.widow_control = OnOff::On;
    }
    p.outline_lvl = parse_opt_usize("w:outlineLvl", "w:val", xml.outline_lvl.and_then(|v| v.val))?;
    if let Some(ind) = xml.indent {
        let hanging = parse_opt_i32("w:ind", "w:hanging", ind.hanging)?.map(SpecialIndent::Hanging);
        let first_line = parse_opt_i32("w:ind", "w:firstLine", ind.first_line)?.map(SpecialIndent::FirstLine);
        p.indent = Some(Indent {
            start: parse_opt_i32("w:ind", "w:left", ind.left)?,
            end: parse_opt_i32("w:ind", "w:right", ind.right)?,
            special: hanging.or(first_line),
            start_chars: parse_opt_i32("w:ind", "w:startChars", ind.start_chars)?,
        });
    }
    if let Some(sp) = xml.spacing {
        if let Some(line) = parse_opt_i32("w:spacing", "w:line", sp.line)? {
            p.line_spacing = Some(LineSpacing::from_wire(
                line,
                sp.line_rule.as_deref().unwrap_or("auto"),
            ));
        }
        p.spacing_before = parse_opt_i32("w:spacing", "w:before", sp.before)?.map(|v| v as u32);
        p.spacing_after = parse_opt_i32("w:spacing", "w:after", sp.after)?.map(|v| v as u32);
    }
    Ok(p)
}

/// Walks `w:p`'s element map directly instead of through a
/// `#[serde(other)]`-backed enum, so unmatched tags keep their name and land
/// in `ParagraphChild::Unrecognized(OpaqueNode)` instead of being silently
/// dropped the way the hidden fallback identifier would.
struct ParagraphVisitor;

impl<'de> Visitor<'de> for ParagraphVisitor {
    type Value = Paragraph;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:p element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        use serde::de::Error;
        let mut id = None;
        let mut property = None;
        let mut children = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@paraId" | "@w14:paraId" => id = Some(map.next_value()?),
                "pPr" | "w:pPr" => property = Some(map.next_value()?),
                "r" | "w:r" => children.push(ParagraphChild::Run(Box::new(map.next_value()?))),
                "hyperlink" | "w:hyperlink" => children.push(ParagraphChild::Hyperlink(Box::new(map.next_value()?))),
                "ins" | "w:ins" => children.push(ParagraphChild::Insert(Box::new(map.next_value()?))),
                "del" | "w:del" => children.push(ParagraphChild::Delete(Box::new(map.next_value()?))),
                "bookmarkStart" | "w:bookmarkStart" => children.push(ParagraphChild::BookmarkStart(map.next_value()?)),
                "bookmarkEnd" | "w:bookmarkEnd" => children.push(ParagraphChild::BookmarkEnd(map.next_value()?)),
                "commentRangeStart" | "w:commentRangeStart" => {
                    children.push(ParagraphChild::CommentRangeStart(map.next_value()?))
                }
                "commentRangeEnd" | "w:commentRangeEnd" => {
                    children.push(ParagraphChild::CommentRangeEnd(map.next_value()?))
                }
                "$text" => {
                    let _: String = map.next_value()?;
                }
                other => {
                    let mut node: OpaqueNode = map.next_value()?;
                    node.tag = other.to_string();
                    children.push(ParagraphChild::Unrecognized(node));
                }
            }
        }
        let property = parse_paragraph_property(property)
            .map_err(|e| A::Error::custom(e.to_custom_message()))?;
        Ok(Paragraph { property, children, id })
    }
}

impl<'de> Deserialize<'de> for Paragraph {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ParagraphVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build() {
        let p = Paragraph::new().add_run(Run::new().add_text("Hello"));
        assert_eq!(
            str::from_utf8(&p.build()).unwrap(),
            r#"<w:p><w:pPr><w:rPr /></w:pPr><w:r><w:rPr /><w:t>Hello</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_build_with_section_property() {
        let mut sp = SectionProperty::new();
        sp.columns = 2;
        let p = Paragraph {
            property: ParagraphProperty::new().section_property(sp),
            ..Paragraph::new()
        };
        let xml = str::from_utf8(&p.build()).unwrap();
        assert!(xml.contains(r#"<w:cols w:space="425" w:num="2" />"#));
    }

    #[test]
    fn test_plain_text() {
        let p = Paragraph::new()
            .add_run(Run::new().add_text("Hello, "))
            .add_run(Run::new().add_text("world"));
        assert_eq!(p.plain_text(), "Hello, world");
    }

    #[test]
    fn test_malformed_alignment_is_parse_attr_error() {
        let xml = r#"<w:p><w:pPr><w:jc w:val="not-a-real-alignment"/></w:pPr></w:p>"#;
        let err = quick_xml::de::from_str::<Paragraph>(xml).unwrap_err();
        let parse_err = crate::error::ParseAttrError::from_custom_message(&err.to_string())
            .expect("error should carry a recoverable ParseAttrError");
        assert_eq!(parse_err.element, "w:jc");
        assert_eq!(parse_err.raw, "not-a-real-alignment");
    }
}
