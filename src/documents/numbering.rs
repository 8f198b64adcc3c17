//! `w:abstractNum`/`w:num` (`word/numbering.xml`), `spec.md` §4.6.
//!
//! Grounded on `docx-core/src/documents/elements/abstract_numbering.rs` and
//! `numbering.rs`. `w:numFmt`/`w:lvlText` stay raw strings as the teacher
//! keeps them (`ST_NumberFormat` is a long, rarely-exhaustive enumeration not
//! worth a closed Rust enum for); every usize attribute goes through
//! `types::attr::parse_usize` instead of the teacher's silent
//! `parse::<usize>().ok().or_else(.. as f32 ..).unwrap_or(default)` fallback.

use std::fmt;
use std::io::Write;

use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::paragraph::ParagraphProperty;
use crate::documents::run_property::RunProperty;
use crate::documents::BuildXML;
use crate::types::attr;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub ilvl: usize,
    pub start: usize,
    pub format: String,
    pub text: String,
    pub justification: String,
    pub paragraph_property: ParagraphProperty,
    pub run_property: RunProperty,
    pub paragraph_style: Option<String>,
    pub suffix: Option<String>,
}

impl Level {
    pub fn new(ilvl: usize, start: usize, format: impl Into<String>, text: impl Into<String>, justification: impl Into<String>) -> Self {
        Level {
            ilvl,
            start,
            format: format.into(),
            text: text.into(),
            justification: justification.into(),
            paragraph_property: ParagraphProperty::new(),
            run_property: RunProperty::new(),
            paragraph_style: None,
            suffix: None,
        }
    }

    pub fn paragraph_style(mut self, s: impl Into<String>) -> Self {
        self.paragraph_style = Some(s.into());
        self
    }

    pub fn suffix(mut self, s: impl Into<String>) -> Self {
        self.suffix = Some(s.into());
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
}

impl BuildXML for Level {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_with_attrs("w:lvl", &[("w:ilvl", &self.ilvl.to_string())])?
            .closed_with_attrs("w:start", &[("w:val", &self.start.to_string())])?
            .closed_with_attrs("w:numFmt", &[("w:val", &self.format)])?
            .closed_with_attrs("w:lvlText", &[("w:val", &self.text)])?
            .closed_with_attrs("w:lvlJc", &[("w:val", &self.justification)])?
            .apply_opt(self.paragraph_style.as_deref(), |v, b| {
                b.closed_with_attrs("w:pStyle", &[("w:val", v)])
            })?
            .apply_opt(self.suffix.as_deref(), |v, b| b.closed_with_attrs("w:suff", &[("w:val", v)]))?
            .add_child(&self.paragraph_property)?
            .add_child(&self.run_property)?
            .close()?
            .into_inner()
    }
}

fn parse_usize_attr(element: &str, raw: Option<String>, default: usize) -> std::result::Result<usize, crate::error::ParseAttrError> {
    match raw {
        None => Ok(default),
        Some(v) => attr::parse_usize(element, "w:val", &v),
    }
}

struct LevelVisitor;

impl<'de> Visitor<'de> for LevelVisitor {
    type Value = Level;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:lvl element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ilvl = 0usize;
        let mut start = 1usize;
        let mut format = "decimal".to_string();
        let mut text = String::new();
        let mut justification = "left".to_string();
        let mut paragraph_property = ParagraphProperty::new();
        let mut run_property = RunProperty::new();
        let mut paragraph_style = None;
        let mut suffix = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@ilvl" | "@w:ilvl" => {
                    let raw: String = map.next_value()?;
                    ilvl = attr::parse_usize("w:lvl", "w:ilvl", &raw).map_err(|e| A::Error::custom(e.to_custom_message()))?;
                }
                "start" | "w:start" => {
                    start = value_usize(&mut map, "w:start", 1)?;
                }
                "numFmt" | "w:numFmt" => format = value_string(&mut map)?.unwrap_or(format),
                "lvlText" | "w:lvlText" => text = value_string(&mut map)?.unwrap_or_default(),
                "lvlJc" | "w:lvlJc" => justification = value_string(&mut map)?.unwrap_or(justification),
                "pStyle" | "w:pStyle" => paragraph_style = value_string(&mut map)?,
                "suff" | "w:suff" => suffix = value_string(&mut map)?,
                "pPr" | "w:pPr" => paragraph_property = map.next_value()?,
                "rPr" | "w:rPr" => run_property = map.next_value()?,
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }

        Ok(Level {
            ilvl,
            start,
            format,
            text,
            justification,
            paragraph_property,
            run_property,
            paragraph_style,
            suffix,
        })
    }
}

fn value_usize<'de, A>(map: &mut A, element: &str, default: usize) -> Result<usize, A::Error>
where
    A: MapAccess<'de>,
{
    let node: XmlValueAttr = map.next_value()?;
    parse_usize_attr(element, node.val, default).map_err(|e| A::Error::custom(e.to_custom_message()))
}

fn value_string<'de, A>(map: &mut A) -> Result<Option<String>, A::Error>
where
    A: MapAccess<'de>,
{
    let node: XmlValueAttr = map.next_value()?;
    Ok(node.val)
}

#[derive(Debug, Deserialize, Default)]
struct XmlValueAttr {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LevelVisitor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbstractNum {
    pub id: usize,
    pub style_link: Option<String>,
    pub num_style_link: Option<String>,
    pub multi_level_type: Option<String>,
    pub levels: Vec<Level>,
}

impl AbstractNum {
    pub fn new(id: usize) -> Self {
        AbstractNum {
            id,
            style_link: None,
            num_style_link: None,
            multi_level_type: None,
            levels: Vec::new(),
        }
    }

    pub fn add_level(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    pub fn style_link(mut self, link: impl Into<String>) -> Self {
        self.style_link = Some(link.into());
        self
    }

    pub fn num_style_link(mut self, link: impl Into<String>) -> Self {
        self.num_style_link = Some(link.into());
        self
    }

    pub fn multi_level_type(mut self, v: impl Into<String>) -> Self {
        self.multi_level_type = Some(v.into());
        self
    }
}

impl BuildXML for AbstractNum {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_with_attrs("w:abstractNum", &[("w:abstractNumId", &self.id.to_string())])?
            .apply_opt(self.multi_level_type.as_deref(), |v, b| {
                b.closed_with_attrs("w:multiLevelType", &[("w:val", v)])
            })?
            .apply_opt(self.style_link.as_deref(), |v, b| b.closed_with_attrs("w:styleLink", &[("w:val", v)]))?
            .apply_opt(self.num_style_link.as_deref(), |v, b| {
                b.closed_with_attrs("w:numStyleLink", &[("w:val", v)])
            })?
            .add_children(&self.levels)?
            .close()?
            .into_inner()
    }
}

struct AbstractNumVisitor;

impl<'de> Visitor<'de> for AbstractNumVisitor {
    type Value = AbstractNum;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:abstractNum element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut abs = AbstractNum::new(0);
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@abstractNumId" | "@w:abstractNumId" => {
                    let raw: String = map.next_value()?;
                    abs.id = attr::parse_usize("w:abstractNum", "w:abstractNumId", &raw)
                        .map_err(|e| A::Error::custom(e.to_custom_message()))?;
                }
                "multiLevelType" | "w:multiLevelType" => abs.multi_level_type = value_string(&mut map)?,
                "styleLink" | "w:styleLink" => abs.style_link = value_string(&mut map)?,
                "numStyleLink" | "w:numStyleLink" => abs.num_style_link = value_string(&mut map)?,
                "lvl" | "w:lvl" => abs.levels.push(map.next_value()?),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(abs)
    }
}

impl<'de> Deserialize<'de> for AbstractNum {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AbstractNumVisitor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelOverride {
    pub ilvl: usize,
    pub start_override: Option<usize>,
    pub level_override: Option<Level>,
}

impl LevelOverride {
    pub fn new(ilvl: usize) -> Self {
        LevelOverride { ilvl, start_override: None, level_override: None }
    }

    pub fn start(mut self, n: usize) -> Self {
        self.start_override = Some(n);
        self
    }

    pub fn level(mut self, l: Level) -> Self {
        self.level_override = Some(l);
        self
    }
}

impl BuildXML for LevelOverride {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_with_attrs("w:lvlOverride", &[("w:ilvl", &self.ilvl.to_string())])?
            .apply_opt(self.start_override, |v, b| b.closed_with_attrs("w:startOverride", &[("w:val", &v.to_string())]))?
            .add_optional_child(&self.level_override)?
            .close()?
            .into_inner()
    }
}

struct LevelOverrideVisitor;

impl<'de> Visitor<'de> for LevelOverrideVisitor {
    type Value = LevelOverride;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:lvlOverride element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = LevelOverride::new(0);
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@ilvl" | "@w:ilvl" => {
                    let raw: String = map.next_value()?;
                    out.ilvl = attr::parse_usize("w:lvlOverride", "w:ilvl", &raw)
                        .map_err(|e| A::Error::custom(e.to_custom_message()))?;
                }
                "startOverride" | "w:startOverride" => {
                    if let Some(v) = value_string(&mut map)? {
                        out.start_override = Some(
                            attr::parse_usize("w:startOverride", "w:val", &v).map_err(|e| A::Error::custom(e.to_custom_message()))?,
                        );
                    }
                }
                "lvl" | "w:lvl" => out.level_override = Some(map.next_value()?),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for LevelOverride {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LevelOverrideVisitor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Num {
    pub id: usize,
    pub abstract_num_id: usize,
    pub level_overrides: Vec<LevelOverride>,
}

impl Num {
    pub fn new(id: usize, abstract_num_id: usize) -> Self {
        Num { id, abstract_num_id, level_overrides: Vec::new() }
    }

    pub fn add_override(mut self, o: LevelOverride) -> Self {
        self.level_overrides.push(o);
        self
    }
}

impl BuildXML for Num {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_with_attrs("w:num", &[("w:numId", &self.id.to_string())])?
            .closed_with_attrs("w:abstractNumId", &[("w:val", &self.abstract_num_id.to_string())])?
            .add_children(&self.level_overrides)?
            .close()?
            .into_inner()
    }
}

struct NumVisitor;

impl<'de> Visitor<'de> for NumVisitor {
    type Value = Num;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:num element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut num = Num::new(0, 0);
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@numId" | "@w:numId" => {
                    let raw: String = map.next_value()?;
                    num.id = attr::parse_usize("w:num", "w:numId", &raw).map_err(|e| A::Error::custom(e.to_custom_message()))?;
                }
                "abstractNumId" | "w:abstractNumId" => {
                    if let Some(v) = value_string(&mut map)? {
                        num.abstract_num_id =
                            attr::parse_usize("w:abstractNumId", "w:val", &v).map_err(|e| A::Error::custom(e.to_custom_message()))?;
                    }
                }
                "lvlOverride" | "w:lvlOverride" => num.level_overrides.push(map.next_value()?),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(num)
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NumVisitor)
    }
}

/// `word/numbering.xml`'s root `w:numbering` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Numbering {
    pub abstract_nums: Vec<AbstractNum>,
    pub nums: Vec<Num>,
}

impl Numbering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_abstract_num(mut self, n: AbstractNum) -> Self {
        self.abstract_nums.push(n);
        self
    }

    pub fn add_num(mut self, n: Num) -> Self {
        self.nums.push(n);
        self
    }

    /// The abstract numbering definition a `Num` instance points to, if any
    /// (`spec.md` §4.6's numbering resolution chain: `w:numId` -> `w:num` ->
    /// `w:abstractNumId` -> `w:abstractNum`).
    pub fn abstract_num_for(&self, num_id: usize) -> Option<&AbstractNum> {
        let num = self.nums.iter().find(|n| n.id == num_id)?;
        self.abstract_nums.iter().find(|a| a.id == num.abstract_num_id)
    }
}

impl BuildXML for Numbering {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_with_attrs(
                "w:numbering",
                &[("xmlns:w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main")],
            )?
            .add_children(&self.abstract_nums)?
            .add_children(&self.nums)?
            .close()?
            .into_inner()
    }
}

struct NumberingVisitor;

impl<'de> Visitor<'de> for NumberingVisitor {
    type Value = Numbering;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a w:numbering element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = Numbering::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "abstractNum" | "w:abstractNum" => out.abstract_nums.push(map.next_value()?),
                "num" | "w:num" => out.nums.push(map.next_value()?),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for Numbering {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NumberingVisitor)
    }
}

crate::reader::impl_from_xml_via_quick!(Numbering);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FromXML;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build_level() {
        let l = Level::new(1, 1, "decimal", "%4.", "left");
        let b = l.build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:lvl w:ilvl="1"><w:start w:val="1" /><w:numFmt w:val="decimal" /><w:lvlText w:val="%4." /><w:lvlJc w:val="left" /><w:pPr><w:rPr /></w:pPr><w:rPr /></w:lvl>"#
        );
    }

    #[test]
    fn test_abstract_num_for_resolves_chain() {
        let numbering = Numbering::new()
            .add_abstract_num(AbstractNum::new(2).add_level(Level::new(0, 1, "decimal", "%1.", "left")))
            .add_num(Num::new(5, 2));
        let resolved = numbering.abstract_num_for(5).unwrap();
        assert_eq!(resolved.id, 2);
    }

    #[test]
    fn test_roundtrip_numbering_part() {
        let xml = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val=""/><w:lvlJc w:val="left"/></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;
        let numbering = Numbering::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(numbering.abstract_nums.len(), 1);
        assert_eq!(numbering.nums.len(), 1);
        assert_eq!(numbering.abstract_num_for(1).unwrap().levels[0].format, "bullet");
    }
}
