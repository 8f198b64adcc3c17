//! Run-level character formatting (`w:rPr`), `spec.md` §4.3.
//!
//! Grounded on `docx-core/src/documents/elements/style.rs`'s
//! `RunPropertyXml`/`parse_run_property_xml`. Tri-state toggles (`b`, `i`,
//! `strike`, `dstrike`) use the shared `OnOff` enum instead of the teacher's
//! `Option<()>` + separate `disable_x()` method pair, so "explicitly turned
//! off" and "never mentioned" are both representable and distinguishable on
//! read as well as on write (SPEC_FULL.md §4.0).

use std::io::Write;

use serde::{Deserialize, Deserializer};

use crate::documents::BuildXML;
use crate::types::attr;
use crate::types::OnOff;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunFonts {
    pub ascii: Option<String>,
    pub east_asia: Option<String>,
    pub hi_ansi: Option<String>,
    pub cs: Option<String>,
    pub ascii_theme: Option<String>,
    pub east_asia_theme: Option<String>,
    pub hi_ansi_theme: Option<String>,
    pub cs_theme: Option<String>,
    pub hint: Option<String>,
}

impl RunFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascii(mut self, v: impl Into<String>) -> Self {
        self.ascii = Some(v.into());
        self
    }
    pub fn east_asia(mut self, v: impl Into<String>) -> Self {
        self.east_asia = Some(v.into());
        self
    }
    pub fn hi_ansi(mut self, v: impl Into<String>) -> Self {
        self.hi_ansi = Some(v.into());
        self
    }
    pub fn cs(mut self, v: impl Into<String>) -> Self {
        self.cs = Some(v.into());
        self
    }
    pub fn ascii_theme(mut self, v: impl Into<String>) -> Self {
        self.ascii_theme = Some(v.into());
        self
    }
    pub fn east_asia_theme(mut self, v: impl Into<String>) -> Self {
        self.east_asia_theme = Some(v.into());
        self
    }
    pub fn hi_ansi_theme(mut self, v: impl Into<String>) -> Self {
        self.hi_ansi_theme = Some(v.into());
        self
    }
    pub fn cs_theme(mut self, v: impl Into<String>) -> Self {
        self.cs_theme = Some(v.into());
        self
    }
    pub fn hint(mut self, v: impl Into<String>) -> Self {
        self.hint = Some(v.into());
        self
    }
}

impl BuildXML for RunFonts {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs = Vec::new();
        if let Some(v) = &self.ascii {
            attrs.push(("w:ascii", v.as_str()));
        }
        if let Some(v) = &self.east_asia {
            attrs.push(("w:eastAsia", v.as_str()));
        }
        if let Some(v) = &self.hi_ansi {
            attrs.push(("w:hAnsi", v.as_str()));
        }
        if let Some(v) = &self.cs {
            attrs.push(("w:cs", v.as_str()));
        }
        if let Some(v) = &self.ascii_theme {
            attrs.push(("w:asciiTheme", v.as_str()));
        }
        if let Some(v) = &self.east_asia_theme {
            attrs.push(("w:eastAsiaTheme", v.as_str()));
        }
        if let Some(v) = &self.hi_ansi_theme {
            attrs.push(("w:hAnsiTheme", v.as_str()));
        }
        if let Some(v) = &self.cs_theme {
            attrs.push(("w:cstheme", v.as_str()));
        }
        if let Some(v) = &self.hint {
            attrs.push(("w:hint", v.as_str()));
        }
        XMLBuilder::from(stream)
            .closed_with_attrs("w:rFonts", &attrs)?
            .into_inner()
    }
}

/// `w:shd` — run or cell shading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shading {
    pub shd_type: Option<String>,
    pub color: Option<String>,
    pub fill: Option<String>,
}

impl Shading {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn shd_type(mut self, t: impl Into<String>) -> Self {
        self.shd_type = Some(t.into());
        self
    }
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }
    pub fn fill(mut self, f: impl Into<String>) -> Self {
        self.fill = Some(f.into());
        self
    }
}

impl BuildXML for Shading {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs = Vec::new();
        if let Some(v) = &self.shd_type {
            attrs.push(("w:val", v.as_str()));
        }
        if let Some(v) = &self.color {
            attrs.push(("w:color", v.as_str()));
        }
        if let Some(v) = &self.fill {
            attrs.push(("w:fill", v.as_str()));
        }
        XMLBuilder::from(stream)
            .closed_with_attrs("w:shd", &attrs)?
            .into_inner()
    }
}

/// `w:rPr`. Fields that the wire format represents as separate optional
/// elements but are semantically a single value (style, size, color, ...)
/// stay `Option<T>`; true tri-state toggles are `OnOff`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunProperty {
    pub style: Option<String>,
    pub size: Option<usize>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub spacing: Option<i32>,
    pub fonts: Option<RunFonts>,
    pub underline: Option<String>,
    pub bold: OnOff,
    pub bold_cs: OnOff,
    pub italic: OnOff,
    pub italic_cs: OnOff,
    pub strike: OnOff,
    pub dstrike: OnOff,
    pub vanish: OnOff,
    pub spec_vanish: OnOff,
    pub shading: Option<Shading>,
}

impl RunProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, s: impl Into<String>) -> Self {
        self.style = Some(s.into());
        self
    }
    pub fn size(mut self, s: usize) -> Self {
        self.size = Some(s);
        self
    }
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }
    pub fn highlight(mut self, c: impl Into<String>) -> Self {
        self.highlight = Some(c.into());
        self
    }
    pub fn spacing(mut self, s: i32) -> Self {
        self.spacing = Some(s);
        self
    }
    pub fn fonts(mut self, f: RunFonts) -> Self {
        self.fonts = Some(f);
        self
    }
    pub fn underline(mut self, line_type: impl Into<String>) -> Self {
        self.underline = Some(line_type.into());
        self
    }
    pub fn bold(mut self) -> Self {
        self.bold = OnOff::On;
        self
    }
    pub fn disable_bold(mut self) -> Self {
        self.bold = OnOff::Off;
        self
    }
    pub fn italic(mut self) -> Self {
        self.italic = OnOff::On;
        self
    }
    pub fn disable_italic(mut self) -> Self {
        self.italic = OnOff::Off;
        self
    }
    pub fn strike(mut self) -> Self {
        self.strike = OnOff::On;
        self
    }
    pub fn disable_strike(mut self) -> Self {
        self.strike = OnOff::Off;
        self
    }
    pub fn dstrike(mut self) -> Self {
        self.dstrike = OnOff::On;
        self
    }
    pub fn disable_dstrike(mut self) -> Self {
        self.dstrike = OnOff::Off;
        self
    }
    pub fn vanish(mut self) -> Self {
        self.vanish = OnOff::On;
        self
    }
    pub fn spec_vanish(mut self) -> Self {
        self.spec_vanish = OnOff::On;
        self
    }
    pub fn shading(mut self, s: Shading) -> Self {
        self.shading = Some(s);
        self
    }
}

impl BuildXML for RunProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        fn onoff_attrs(v: bool) -> Vec<(&'static str, &'static str)> {
            if v {
                vec![]
            } else {
                vec![("w:val", "false")]
            }
        }

        XMLBuilder::from(stream)
            .open_run_property()?
            .apply_opt(self.style.as_deref(), |v, b| {
                b.closed_with_attrs("w:rStyle", &[("w:val", v)])
            })?
            .apply_opt(self.fonts.as_ref(), |f, b| b.add_child(f))?
            .apply_if(self.bold.is_set(), |b| {
                b.closed_with_attrs("w:b", &onoff_attrs(self.bold.is_on()))
            })?
            .apply_if(self.bold_cs.is_set(), |b| {
                b.closed_with_attrs("w:bCs", &onoff_attrs(self.bold_cs.is_on()))
            })?
            .apply_if(self.italic.is_set(), |b| {
                b.closed_with_attrs("w:i", &onoff_attrs(self.italic.is_on()))
            })?
            .apply_if(self.italic_cs.is_set(), |b| {
                b.closed_with_attrs("w:iCs", &onoff_attrs(self.italic_cs.is_on()))
            })?
            .apply_if(self.strike.is_set(), |b| {
                b.closed_with_attrs("w:strike", &onoff_attrs(self.strike.is_on()))
            })?
            .apply_if(self.dstrike.is_set(), |b| {
                b.closed_with_attrs("w:dstrike", &onoff_attrs(self.dstrike.is_on()))
            })?
            .apply_if(self.vanish.is_set(), |b| b.closed("w:vanish"))?
            .apply_if(self.spec_vanish.is_set(), |b| b.closed("w:specVanish"))?
            .apply_opt(self.color.as_deref(), |v, b| {
                b.closed_with_attrs("w:color", &[("w:val", v)])
            })?
            .apply_opt(self.underline.as_deref(), |v, b| {
                b.closed_with_attrs("w:u", &[("w:val", v)])
            })?
            .apply_opt(self.spacing, |v, b| {
                b.closed_with_attrs("w:spacing", &[("w:val", &v.to_string())])
            })?
            .apply_opt(self.size, |v, b| {
                b.closed_with_attrs("w:sz", &[("w:val", &v.to_string())])
            })?
            .apply_opt(self.highlight.as_deref(), |v, b| {
                b.closed_with_attrs("w:highlight", &[("w:val", v)])
            })?
            .apply_opt(self.shading.as_ref(), |s, b| b.add_child(s))?
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
struct XmlOnOffAttr {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RunFontsXml {
    #[serde(rename = "@ascii", alias = "@w:ascii", default)]
    ascii: Option<String>,
    #[serde(rename = "@eastAsia", alias = "@w:eastAsia", default)]
    east_asia: Option<String>,
    #[serde(rename = "@hAnsi", alias = "@w:hAnsi", default)]
    h_ansi: Option<String>,
    #[serde(rename = "@cs", alias = "@w:cs", default)]
    cs: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RunPropertyXmlRaw {
    #[serde(rename = "$value", default)]
    children: Vec<RunPropertyChildXml>,
}

#[derive(Debug, Deserialize)]
enum RunPropertyChildXml {
    #[serde(rename = "rStyle", alias = "w:rStyle")]
    Style(XmlValueAttr),
    #[serde(rename = "sz", alias = "w:sz")]
    Size(XmlValueAttr),
    #[serde(rename = "color", alias = "w:color")]
    Color(XmlValueAttr),
    #[serde(rename = "highlight", alias = "w:highlight")]
    Highlight(XmlValueAttr),
    #[serde(rename = "spacing", alias = "w:spacing")]
    Spacing(XmlValueAttr),
    #[serde(rename = "rFonts", alias = "w:rFonts")]
    Fonts(RunFontsXml),
    #[serde(rename = "u", alias = "w:u")]
    Underline(XmlValueAttr),
    #[serde(rename = "b", alias = "w:b")]
    Bold(XmlOnOffAttr),
    #[serde(rename = "bCs", alias = "w:bCs")]
    BoldCs(XmlOnOffAttr),
    #[serde(rename = "i", alias = "w:i")]
    Italic(XmlOnOffAttr),
    #[serde(rename = "iCs", alias = "w:iCs")]
    ItalicCs(XmlOnOffAttr),
    #[serde(rename = "strike", alias = "w:strike")]
    Strike(XmlOnOffAttr),
    #[serde(rename = "dstrike", alias = "w:dstrike")]
    Dstrike(XmlOnOffAttr),
    #[serde(rename = "vanish", alias = "w:vanish")]
    Vanish(XmlOnOffAttr),
    #[serde(rename = "specVanish", alias = "w:specVanish")]
    SpecVanish(XmlOnOffAttr),
    #[serde(rename = "shd", alias = "w:shd")]
    Shading(XmlShdNode),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct XmlShdNode {
    #[serde(rename = "@val", alias = "@w:val", default)]
    val: Option<String>,
    #[serde(rename = "@color", alias = "@w:color", default)]
    color: Option<String>,
    #[serde(rename = "@fill", alias = "@w:fill", default)]
    fill: Option<String>,
}

fn on_off_from_attr(raw: Option<&str>) -> std::result::Result<OnOff, crate::error::ParseAttrError> {
    match raw {
        None => Ok(OnOff::On),
        Some(v) => attr::parse_on_off("w:rPr", "w:val", v)
            .map(|b| if b { OnOff::On } else { OnOff::Off }),
    }
}

impl<'de> Deserialize<'de> for RunProperty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw = RunPropertyXmlRaw::deserialize(deserializer)?;
        let mut rp = RunProperty::new();
        for child in raw.children {
            match child {
                RunPropertyChildXml::Style(v) => rp.style = v.val,
                RunPropertyChildXml::Size(v) => {
                    rp.size = v.val.and_then(|s| s.parse().ok());
                }
                RunPropertyChildXml::Color(v) => rp.color = v.val,
                RunPropertyChildXml::Highlight(v) => rp.highlight = v.val,
                RunPropertyChildXml::Spacing(v) => {
                    rp.spacing = v.val.and_then(|s| s.parse().ok());
                }
                RunPropertyChildXml::Fonts(f) => {
                    rp.fonts = Some(
                        RunFonts::new()
                            .ascii(f.ascii.unwrap_or_default())
                            .east_asia(f.east_asia.unwrap_or_default())
                            .hi_ansi(f.h_ansi.unwrap_or_default())
                            .cs(f.cs.unwrap_or_default()),
                    );
                }
                RunPropertyChildXml::Underline(v) => rp.underline = v.val,
                RunPropertyChildXml::Bold(v) => {
                    rp.bold = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::BoldCs(v) => {
                    rp.bold_cs = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::Italic(v) => {
                    rp.italic = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::ItalicCs(v) => {
                    rp.italic_cs = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::Strike(v) => {
                    rp.strike = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::Dstrike(v) => {
                    rp.dstrike = on_off_from_attr(v.val.as_deref()).map_err(|e| D::Error::custom(e.to_custom_message()))?
                }
                RunPropertyChildXml::Vanish(_) => rp.vanish = OnOff::On,
                RunPropertyChildXml::SpecVanish(_) => rp.spec_vanish = OnOff::On,
                RunPropertyChildXml::Shading(s) => {
                    let mut shd = Shading::new();
                    if let Some(v) = s.val {
                        shd = shd.shd_type(v);
                    }
                    if let Some(v) = s.color {
                        shd = shd.color(v);
                    }
                    if let Some(v) = s.fill {
                        shd = shd.fill(v);
                    }
                    rp.shading = Some(shd);
                }
                RunPropertyChildXml::Unknown => {}
            }
        }
        Ok(rp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build_default() {
        let b = RunProperty::new().build();
        assert_eq!(str::from_utf8(&b).unwrap(), r#"<w:rPr />"#);
    }

    #[test]
    fn test_bold_tri_state() {
        let on = RunProperty::new().bold().build();
        assert_eq!(str::from_utf8(&on).unwrap(), r#"<w:rPr><w:b /></w:rPr>"#);

        let off = RunProperty::new().disable_bold().build();
        assert_eq!(
            str::from_utf8(&off).unwrap(),
            r#"<w:rPr><w:b w:val="false" /></w:rPr>"#
        );
    }

    #[test]
    fn test_bold_roundtrip_through_xml() {
        let xml = r#"<w:rPr><w:b w:val="false"/></w:rPr>"#;
        let rp: RunProperty = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(rp.bold, OnOff::Off);
    }
}
