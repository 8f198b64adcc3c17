//! `w:sectPr`, `spec.md` §4.5.
//!
//! Grounded on `docx-core/src/documents/elements/section_property.rs`. Keeps
//! the teacher's storage shape: header/footer content lives directly on
//! `SectionProperty` as `(rid, Header)`/`(rid, Footer)` pairs alongside the
//! reference it writes to `w:headerReference`/`w:footerReference`. The
//! section-boundary resolver this crate adds on top (`sections` module)
//! walks these fields backward across `Document::children` rather than
//! requiring every section to carry its own copy.
//!
//! `HeaderReference`/`FooterReference`/`PageSize`/`PageMargin`/`DocGrid`/
//! `PageNumType` are not part of the retrieved pack (filtered from
//! `docx-core/src/types/`); reconstructed here from this file's call-site
//! contract (builder names, default values, and the `build_to` attribute
//! order visible below).

use std::io::Write;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::documents::header::{Footer, Header};
use crate::documents::BuildXML;
use crate::error::ParseAttrError;
use crate::types::{PageOrientationType, SectionType};
use crate::xml_builder::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
    pub orientation: PageOrientationType,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: 11906,
            height: 16838,
            orientation: PageOrientationType::Portrait,
        }
    }
}

impl PageSize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, w: u32) -> Self {
        self.width = w;
        self
    }

    pub fn height(mut self, h: u32) -> Self {
        self.height = h;
        self
    }

    pub fn orient(mut self, o: PageOrientationType) -> Self {
        self.orientation = o;
        if o == PageOrientationType::Landscape && self.width < self.height {
            std::mem::swap(&mut self.width, &mut self.height);
        }
        self
    }
}

impl BuildXML for PageSize {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs = vec![
            ("w:w".to_string(), self.width.to_string()),
            ("w:h".to_string(), self.height.to_string()),
        ];
        if self.orientation == PageOrientationType::Landscape {
            attrs.push(("w:orient".to_string(), "landscape".to_string()));
        }
        let refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        XMLBuilder::from(stream)
            .closed_with_attrs("w:pgSz", &refs)?
            .into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargin {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
    pub header: i32,
    pub footer: i32,
    pub gutter: i32,
}

impl Default for PageMargin {
    fn default() -> Self {
        Self {
            top: 1985,
            right: 1701,
            bottom: 1701,
            left: 1701,
            header: 851,
            footer: 992,
            gutter: 0,
        }
    }
}

impl PageMargin {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn top(mut self, v: i32) -> Self {
        self.top = v;
        self
    }
    pub fn right(mut self, v: i32) -> Self {
        self.right = v;
        self
    }
    pub fn bottom(mut self, v: i32) -> Self {
        self.bottom = v;
        self
    }
    pub fn left(mut self, v: i32) -> Self {
        self.left = v;
        self
    }
    pub fn header(mut self, v: i32) -> Self {
        self.header = v;
        self
    }
    pub fn footer(mut self, v: i32) -> Self {
        self.footer = v;
        self
    }
    pub fn gutter(mut self, v: i32) -> Self {
        self.gutter = v;
        self
    }
}

impl BuildXML for PageMargin {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs(
                "w:pgMar",
                &[
                    ("w:top", &self.top.to_string()),
                    ("w:right", &self.right.to_string()),
                    ("w:bottom", &self.bottom.to_string()),
                    ("w:left", &self.left.to_string()),
                    ("w:header", &self.header.to_string()),
                    ("w:footer", &self.footer.to_string()),
                    ("w:gutter", &self.gutter.to_string()),
                ],
            )?
            .into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocGridType {
    Default,
    Lines,
    LinesAndChars,
    SnapToChars,
}

impl DocGridType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "default" => Some(DocGridType::Default),
            "lines" => Some(DocGridType::Lines),
            "linesAndChars" => Some(DocGridType::LinesAndChars),
            "snapToChars" => Some(DocGridType::SnapToChars),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            DocGridType::Default => "default",
            DocGridType::Lines => "lines",
            DocGridType::LinesAndChars => "linesAndChars",
            DocGridType::SnapToChars => "snapToChars",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocGrid {
    pub grid_type: Option<DocGridType>,
    pub line_pitch: Option<usize>,
    pub char_space: Option<isize>,
}

impl DocGrid {
    pub fn with_empty() -> Self {
        Self::default()
    }
    pub fn grid_type(mut self, t: DocGridType) -> Self {
        self.grid_type = Some(t);
        self
    }
    pub fn line_pitch(mut self, v: usize) -> Self {
        self.line_pitch = Some(v);
        self
    }
    pub fn char_space(mut self, v: isize) -> Self {
        self.char_space = Some(v);
        self
    }
}

impl BuildXML for DocGrid {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs: Vec<(String, String)> = Vec::new();
        if let Some(t) = self.grid_type {
            attrs.push(("w:type".into(), t.to_xml_str().to_string()));
        }
        if let Some(v) = self.line_pitch {
            attrs.push(("w:linePitch".into(), v.to_string()));
        }
        if let Some(v) = self.char_space {
            attrs.push(("w:charSpace".into(), v.to_string()));
        }
        let refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        XMLBuilder::from(stream)
            .closed_with_attrs("w:docGrid", &refs)?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageNumType {
    pub start: Option<u32>,
    pub chap_style: Option<String>,
}

impl PageNumType {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn start(mut self, v: u32) -> Self {
        self.start = Some(v);
        self
    }
    pub fn chap_style(mut self, v: impl Into<String>) -> Self {
        self.chap_style = Some(v.into());
        self
    }
}

impl BuildXML for PageNumType {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs: Vec<(String, String)> = Vec::new();
        if let Some(v) = self.start {
            attrs.push(("w:start".into(), v.to_string()));
        }
        if let Some(v) = &self.chap_style {
            attrs.push(("w:chapStyle".into(), v.clone()));
        }
        let refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        XMLBuilder::from(stream)
            .closed_with_attrs("w:pgNumType", &refs)?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderReference {
    pub ref_type: String,
    pub rid: String,
}

impl HeaderReference {
    pub fn new(ref_type: impl Into<String>, rid: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.into(),
            rid: rid.into(),
        }
    }
}

impl BuildXML for HeaderReference {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs("w:headerReference", &[("w:type", &self.ref_type), ("r:id", &self.rid)])?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterReference {
    pub ref_type: String,
    pub rid: String,
}

impl FooterReference {
    pub fn new(ref_type: impl Into<String>, rid: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.into(),
            rid: rid.into(),
        }
    }
}

impl BuildXML for FooterReference {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs("w:footerReference", &[("w:type", &self.ref_type), ("r:id", &self.rid)])?
            .into_inner()
    }
}

/// `w:sectPr`. Header/footer content for the three kinds (`default`,
/// `first`, `even`) is stored inline as `(rid, Header)`/`(rid, Footer)`
/// pairs, same as the reference it writes, so a section round-trips without
/// depending on a resolver pass. The `sections` module builds on top of this
/// to partition a whole document into sections and fill in inherited
/// references section-to-section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperty {
    pub page_size: PageSize,
    pub page_margin: PageMargin,
    pub columns: usize,
    pub space: usize,
    pub title_pg: bool,
    pub text_direction: String,
    pub doc_grid: Option<DocGrid>,
    pub header_reference: Option<HeaderReference>,
    pub header: Option<(String, Header)>,
    pub first_header_reference: Option<HeaderReference>,
    pub first_header: Option<(String, Header)>,
    pub even_header_reference: Option<HeaderReference>,
    pub even_header: Option<(String, Header)>,
    pub footer_reference: Option<FooterReference>,
    pub footer: Option<(String, Footer)>,
    pub first_footer_reference: Option<FooterReference>,
    pub first_footer: Option<(String, Footer)>,
    pub even_footer_reference: Option<FooterReference>,
    pub even_footer: Option<(String, Footer)>,
    pub section_type: Option<SectionType>,
    pub page_num_type: Option<PageNumType>,
}

impl Default for SectionProperty {
    fn default() -> Self {
        Self {
            page_size: PageSize::new(),
            page_margin: PageMargin::new(),
            columns: 1,
            space: 425,
            title_pg: false,
            text_direction: "lrTb".to_string(),
            doc_grid: None,
            header_reference: None,
            header: None,
            first_header_reference: None,
            first_header: None,
            even_header_reference: None,
            even_header: None,
            footer_reference: None,
            footer: None,
            first_footer_reference: None,
            first_footer: None,
            even_footer_reference: None,
            even_footer: None,
            section_type: None,
            page_num_type: None,
        }
    }
}

impl SectionProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    pub fn page_margin(mut self, margin: PageMargin) -> Self {
        self.page_margin = margin;
        self
    }

    pub fn page_orient(mut self, o: PageOrientationType) -> Self {
        self.page_size = self.page_size.orient(o);
        self
    }

    pub fn doc_grid(mut self, g: DocGrid) -> Self {
        self.doc_grid = Some(g);
        self
    }

    pub fn text_direction(mut self, direction: impl Into<String>) -> Self {
        self.text_direction = direction.into();
        self
    }

    pub fn title_pg(mut self) -> Self {
        self.title_pg = true;
        self
    }

    pub fn header(mut self, h: Header, rid: &str) -> Self {
        self.header_reference = Some(HeaderReference::new("default", rid));
        self.header = Some((rid.to_string(), h));
        self
    }

    pub fn first_header(mut self, h: Header, rid: &str) -> Self {
        self.first_header_reference = Some(HeaderReference::new("first", rid));
        self.first_header = Some((rid.to_string(), h));
        self.title_pg = true;
        self
    }

    pub fn first_header_without_title_pg(mut self, h: Header, rid: &str) -> Self {
        self.first_header_reference = Some(HeaderReference::new("first", rid));
        self.first_header = Some((rid.to_string(), h));
        self
    }

    pub fn even_header(mut self, h: Header, rid: &str) -> Self {
        self.even_header_reference = Some(HeaderReference::new("even", rid));
        self.even_header = Some((rid.to_string(), h));
        self
    }

    pub fn footer(mut self, f: Footer, rid: &str) -> Self {
        self.footer_reference = Some(FooterReference::new("default", rid));
        self.footer = Some((rid.to_string(), f));
        self
    }

    pub fn first_footer(mut self, f: Footer, rid: &str) -> Self {
        self.first_footer_reference = Some(FooterReference::new("first", rid));
        self.first_footer = Some((rid.to_string(), f));
        self.title_pg = true;
        self
    }

    pub fn first_footer_without_title_pg(mut self, f: Footer, rid: &str) -> Self {
        self.first_footer_reference = Some(FooterReference::new("first", rid));
        self.first_footer = Some((rid.to_string(), f));
        self
    }

    pub fn even_footer(mut self, f: Footer, rid: &str) -> Self {
        self.even_footer_reference = Some(FooterReference::new("even", rid));
        self.even_footer = Some((rid.to_string(), f));
        self
    }

    pub fn get_headers(&self) -> Vec<&(String, Header)> {
        [&self.header, &self.first_header, &self.even_header]
            .into_iter()
            .filter_map(|h| h.as_ref())
            .collect()
    }

    pub fn get_footers(&self) -> Vec<&(String, Footer)> {
        [&self.footer, &self.first_footer, &self.even_footer]
            .into_iter()
            .filter_map(|f| f.as_ref())
            .collect()
    }

    pub fn section_type(mut self, t: SectionType) -> Self {
        self.section_type = Some(t);
        self
    }

    pub fn page_num_type(mut self, p: PageNumType) -> Self {
        self.page_num_type = Some(p);
        self
    }
}

impl BuildXML for SectionProperty {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_section_property()?
            .add_child(&self.page_size)?
            .add_child(&self.page_margin)?
            .closed_with_attrs(
                "w:cols",
                &[("w:space", &self.space.to_string()), ("w:num", &self.columns.to_string())],
            )?
            .add_optional_child(&self.doc_grid)?
            .add_optional_child(&self.header_reference)?
            .add_optional_child(&self.first_header_reference)?
            .add_optional_child(&self.even_header_reference)?
            .add_optional_child(&self.footer_reference)?
            .add_optional_child(&self.first_footer_reference)?
            .add_optional_child(&self.even_footer_reference)?
            .add_optional_child(&self.page_num_type)?
            .apply_if(self.text_direction != "lrTb", |b| {
                b.closed_with_attrs("w:textDirection", &[("w:val", &self.text_direction)])
            })?
            .apply_opt(self.section_type, |t, b| b.closed_with_attrs("w:type", &[("w:val", t.to_xml_str())]))?
            .apply_if(self.title_pg, |b| b.closed("w:titlePg"))?
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
struct SectionPageSizeXml {
    #[serde(rename = "@w", alias = "@w:w", default)]
    w: Option<String>,
    #[serde(rename = "@h", alias = "@w:h", default)]
    h: Option<String>,
    #[serde(rename = "@orient", alias = "@w:orient", default)]
    orient: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SectionPageMarginXml {
    #[serde(rename = "@top", alias = "@w:top", default)]
    top: Option<String>,
    #[serde(rename = "@right", alias = "@w:right", default)]
    right: Option<String>,
    #[serde(rename = "@bottom", alias = "@w:bottom", default)]
    bottom: Option<String>,
    #[serde(rename = "@left", alias = "@w:left", default)]
    left: Option<String>,
    #[serde(rename = "@header", alias = "@w:header", default)]
    header: Option<String>,
    #[serde(rename = "@footer", alias = "@w:footer", default)]
    footer: Option<String>,
    #[serde(rename = "@gutter", alias = "@w:gutter", default)]
    gutter: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SectionDocGridXml {
    #[serde(rename = "@type", alias = "@w:type", default)]
    grid_type: Option<String>,
    #[serde(rename = "@linePitch", alias = "@w:linePitch", default)]
    line_pitch: Option<String>,
    #[serde(rename = "@charSpace", alias = "@w:charSpace", default)]
    char_space: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SectionPageNumTypeXml {
    #[serde(rename = "@start", alias = "@w:start", default)]
    start: Option<String>,
    #[serde(rename = "@chapStyle", alias = "@w:chapStyle", default)]
    chap_style: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SectionReferenceXml {
    #[serde(rename = "@type", alias = "@w:type", default)]
    ref_type: Option<String>,
    #[serde(rename = "@id", alias = "@w:id", alias = "@r:id", default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
enum SectionPropertyChildXml {
    #[serde(rename = "pgMar", alias = "w:pgMar")]
    PageMargin(SectionPageMarginXml),
    #[serde(rename = "pgSz", alias = "w:pgSz")]
    PageSize(SectionPageSizeXml),
    #[serde(rename = "docGrid", alias = "w:docGrid")]
    DocGrid(SectionDocGridXml),
    #[serde(rename = "pgNumType", alias = "w:pgNumType")]
    PageNumType(SectionPageNumTypeXml),
    #[serde(rename = "headerReference", alias = "w:headerReference")]
    HeaderReference(SectionReferenceXml),
    #[serde(rename = "footerReference", alias = "w:footerReference")]
    FooterReference(SectionReferenceXml),
    #[serde(rename = "textDirection", alias = "w:textDirection")]
    TextDirection(XmlValueAttr),
    #[serde(rename = "type", alias = "w:type")]
    SectionType(XmlValueAttr),
    #[serde(rename = "titlePg", alias = "w:titlePg")]
    TitlePg(IgnoredAny),
    #[serde(rename = "cols", alias = "w:cols")]
    Cols(IgnoredAny),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct SectionPropertyXml {
    #[serde(rename = "$value", default)]
    children: Vec<SectionPropertyChildXml>,
}

/// A malformed `w:pgMar` dxa value is a `ParseAttrError` (`spec.md` §8.5's
/// named scenario), not a silently-kept default margin. Parsed via `f64`
/// first since Word itself occasionally emits a fractional dxa value.
fn parse_dxa(element: &str, attr_name: &str, raw: Option<String>) -> Result<Option<i32>, ParseAttrError> {
    match raw {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<f64>()
            .map(|n| Some(n as i32))
            .map_err(|e| ParseAttrError::new(element, attr_name, v, e)),
    }
}

impl<'de> Deserialize<'de> for SectionProperty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let xml = SectionPropertyXml::deserialize(deserializer)?;
        let mut sp = SectionProperty::new();
        for child in xml.children {
            match child {
                SectionPropertyChildXml::PageMargin(v) => {
                    let mut m = PageMargin::new();
                    if let Some(x) = parse_dxa("w:pgMar", "w:top", v.top).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.top(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:right", v.right).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.right(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:bottom", v.bottom).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.bottom(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:left", v.left).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.left(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:header", v.header).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.header(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:footer", v.footer).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.footer(x);
                    }
                    if let Some(x) = parse_dxa("w:pgMar", "w:gutter", v.gutter).map_err(|e| D::Error::custom(e.to_custom_message()))? {
                        m = m.gutter(x);
                    }
                    sp = sp.page_margin(m);
                }
                SectionPropertyChildXml::PageSize(v) => {
                    let mut size = PageSize::new();
                    if let Some(w) = v.w.and_then(|x| x.parse().ok()) {
                        size = size.width(w);
                    }
                    if let Some(h) = v.h.and_then(|x| x.parse().ok()) {
                        size = size.height(h);
                    }
                    if v.orient.as_deref() == Some("landscape") {
                        size = size.orient(PageOrientationType::Landscape);
                    }
                    sp = sp.page_size(size);
                }
                SectionPropertyChildXml::DocGrid(v) => {
                    let mut g = DocGrid::with_empty();
                    if let Some(t) = v.grid_type.as_deref().and_then(DocGridType::from_xml_str) {
                        g = g.grid_type(t);
                    }
                    if let Some(v) = v.line_pitch.and_then(|x| x.parse().ok()) {
                        g = g.line_pitch(v);
                    }
                    if let Some(v) = v.char_space.and_then(|x| x.parse().ok()) {
                        g = g.char_space(v);
                    }
                    sp = sp.doc_grid(g);
                }
                SectionPropertyChildXml::PageNumType(v) => {
                    let mut p = PageNumType::new();
                    if let Some(v) = v.start.and_then(|x| x.parse().ok()) {
                        p = p.start(v);
                    }
                    if let Some(v) = v.chap_style {
                        p = p.chap_style(v);
                    }
                    sp = sp.page_num_type(p);
                }
                SectionPropertyChildXml::HeaderReference(v) => {
                    let rid = v.id.unwrap_or_default();
                    let ref_type = v.ref_type.unwrap_or_else(|| "default".to_string());
                    match ref_type.as_str() {
                        "first" => sp.first_header_reference = Some(HeaderReference::new(ref_type, rid)),
                        "even" => sp.even_header_reference = Some(HeaderReference::new(ref_type, rid)),
                        _ => sp.header_reference = Some(HeaderReference::new(ref_type, rid)),
                    }
                }
                SectionPropertyChildXml::FooterReference(v) => {
                    let rid = v.id.unwrap_or_default();
                    let ref_type = v.ref_type.unwrap_or_else(|| "default".to_string());
                    match ref_type.as_str() {
                        "first" => sp.first_footer_reference = Some(FooterReference::new(ref_type, rid)),
                        "even" => sp.even_footer_reference = Some(FooterReference::new(ref_type, rid)),
                        _ => sp.footer_reference = Some(FooterReference::new(ref_type, rid)),
                    }
                }
                SectionPropertyChildXml::TextDirection(v) => {
                    if let Some(v) = v.val {
                        sp = sp.text_direction(v);
                    }
                }
                SectionPropertyChildXml::SectionType(v) => {
                    if let Some(t) = v.val.as_deref().and_then(SectionType::from_xml_str) {
                        sp = sp.section_type(t);
                    }
                }
                SectionPropertyChildXml::TitlePg(_) => sp = sp.title_pg(),
                SectionPropertyChildXml::Cols(_) | SectionPropertyChildXml::Unknown => {}
            }
        }
        Ok(sp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_section_property_default() {
        let c = SectionProperty::new();
        let b = c.build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838" /><w:pgMar w:top="1985" w:right="1701" w:bottom="1701" w:left="1701" w:header="851" w:footer="992" w:gutter="0" /><w:cols w:space="425" w:num="1" /></w:sectPr>"#
        );
    }

    #[test]
    fn test_section_property_with_footer() {
        let c = SectionProperty::new().footer(Footer::new(), "rId6");
        let b = c.build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838" /><w:pgMar w:top="1985" w:right="1701" w:bottom="1701" w:left="1701" w:header="851" w:footer="992" w:gutter="0" /><w:cols w:space="425" w:num="1" /><w:footerReference w:type="default" r:id="rId6" /></w:sectPr>"#
        );
    }

    #[test]
    fn test_section_property_with_title_pg() {
        let c = SectionProperty::new().title_pg();
        let b = c.build();
        assert!(str::from_utf8(&b).unwrap().ends_with("<w:titlePg /></w:sectPr>"));
    }

    #[test]
    fn test_get_headers_and_footers() {
        let c = SectionProperty::new()
            .header(Header::new(), "rId1")
            .even_footer(Footer::new(), "rId2");
        assert_eq!(c.get_headers().len(), 1);
        assert_eq!(c.get_footers().len(), 1);
    }

    #[test]
    fn test_malformed_page_margin_is_parse_attr_error() {
        let xml = r#"<w:sectPr><w:pgMar w:top="not-a-number" w:right="1701" w:bottom="1701" w:left="1701" w:header="851" w:footer="992" w:gutter="0" /></w:sectPr>"#;
        let err = quick_xml::de::from_str::<SectionProperty>(xml).unwrap_err();
        let parse_err = crate::error::ParseAttrError::from_custom_message(&err.to_string())
            .expect("error should carry a recoverable ParseAttrError");
        assert!(parse_err.element.ends_with("pgMar"));
        assert_eq!(parse_err.attr, "w:top");
        assert_eq!(parse_err.raw, "not-a-number");
    }
}
