//! `w:r` and its leaf children, `spec.md` §4.3.
//!
//! Grounded on `docx-core/src/documents/elements/run.rs` (`Run`, `RunChild`,
//! the `RunChildXml`/`run_child_from_xml` read path). The leaf element
//! structs (`Text`, `Tab`, `Break`, ...) were filtered out of the retrieved
//! pack as separate files; they are reconstructed here from the call sites
//! (`add_text`, `xml:space="preserve"` in `run.rs`'s own tests) and kept as
//! part of this module rather than split out, since there is no teacher file
//! boundary to mirror for them.

use std::io::Write;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::comments::CommentReference;
use crate::documents::opaque::OpaqueNode;
use crate::documents::BuildXML;
use crate::escape::replace_escaped;
use crate::types::attr;
use crate::types::{BreakType, FieldCharType};
use crate::xml_builder::*;

use super::run_property::RunProperty;

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// `w:t`/`w:delText` only need `xml:space="preserve"` when trimming the text
/// would change it (`spec.md` §3 invariant 5); Word and this crate otherwise
/// leave the attribute off entirely rather than writing a spurious `default`.
fn needs_preserve_space(text: &str) -> bool {
    text.trim() != text
}

impl BuildXML for Text {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let b = XMLBuilder::from(stream);
        let b = if needs_preserve_space(&self.text) {
            b.open_with_attrs("w:t", &[("xml:space", "preserve")])?
        } else {
            b.open("w:t")?
        };
        b.text(&self.text)?.close()?.into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteText {
    pub text: String,
}

impl DeleteText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl BuildXML for DeleteText {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let b = XMLBuilder::from(stream);
        let b = if needs_preserve_space(&self.text) {
            b.open_with_attrs("w:delText", &[("xml:space", "preserve")])?
        } else {
            b.open("w:delText")?
        };
        b.text(&self.text)?.close()?.into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tab;

impl Tab {
    pub fn new() -> Self {
        Self
    }
}

impl BuildXML for Tab {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream).closed("w:tab")?.into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Break {
    pub break_type: BreakType,
}

impl Break {
    pub fn new(break_type: BreakType) -> Self {
        Self { break_type }
    }
}

impl BuildXML for Break {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs("w:br", &[("w:type", self.break_type.to_xml_str())])?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sym {
    pub font: String,
    pub char_code: String,
}

impl Sym {
    pub fn new(font: impl Into<String>, char_code: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            char_code: char_code.into(),
        }
    }
}

impl BuildXML for Sym {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs(
                "w:sym",
                &[("w:font", &self.font), ("w:char", &self.char_code)],
            )?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChar {
    pub field_char_type: FieldCharType,
    pub dirty: bool,
}

impl FieldChar {
    pub fn new(field_char_type: FieldCharType) -> Self {
        Self {
            field_char_type,
            dirty: false,
        }
    }

    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }
}

impl BuildXML for FieldChar {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let mut attrs = vec![("w:fldCharType", self.field_char_type.to_xml_str())];
        if self.dirty {
            attrs.push(("w:dirty", "true"));
        }
        XMLBuilder::from(stream)
            .closed_with_attrs("w:fldChar", &attrs)?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrText {
    pub instr: String,
}

impl InstrText {
    pub fn new(instr: impl Into<String>) -> Self {
        Self { instr: instr.into() }
    }
}

impl BuildXML for InstrText {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open("w:instrText")?
            .text(&self.instr)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteReference {
    pub id: usize,
}

impl FootnoteReference {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl BuildXML for FootnoteReference {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs("w:footnoteReference", &[("w:id", &self.id.to_string())])?
            .into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cr;

impl Cr {
    pub fn new() -> Self {
        Self
    }
}

impl BuildXML for Cr {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream).closed("w:cr")?.into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoBreakHyphen;

impl NoBreakHyphen {
    pub fn new() -> Self {
        Self
    }
}

impl BuildXML for NoBreakHyphen {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream).closed("w:noBreakHyphen")?.into_inner()
    }
}

/// `w:ptab` (absolute-position tab). Its three attributes are mandatory in
/// the schema; this crate round-trips whatever it read and defaults a
/// freshly-built one to the values Word itself writes for a plain tab stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PTab {
    pub alignment: String,
    pub relative_to: String,
    pub leader: String,
}

impl Default for PTab {
    fn default() -> Self {
        Self {
            alignment: "left".to_string(),
            relative_to: "margin".to_string(),
            leader: "none".to_string(),
        }
    }
}

impl PTab {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildXML for PTab {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs(
                "w:ptab",
                &[
                    ("w:alignment", self.alignment.as_str()),
                    ("w:relativeTo", self.relative_to.as_str()),
                    ("w:leader", self.leader.as_str()),
                ],
            )?
            .into_inner()
    }
}

/// `w:lastRenderedPageBreak`, the marker Word leaves behind from its last
/// layout pass. Carries no data; its presence is what
/// `crate::text::page_break` splits a paragraph on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastRenderedPageBreak;

impl LastRenderedPageBreak {
    pub fn new() -> Self {
        Self
    }
}

impl BuildXML for LastRenderedPageBreak {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream).closed("w:lastRenderedPageBreak")?.into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunChild {
    Text(Text),
    Sym(Sym),
    DeleteText(DeleteText),
    Tab(Tab),
    Break(Break),
    Cr(Cr),
    NoBreakHyphen(NoBreakHyphen),
    PTab(PTab),
    LastRenderedPageBreak(LastRenderedPageBreak),
    FieldChar(FieldChar),
    InstrText(InstrText),
    FootnoteReference(FootnoteReference),
    CommentReference(CommentReference),
    /// Content this crate has no typed model for (`spec.md` §3 invariant 1).
    Unrecognized(OpaqueNode),
}

impl BuildXML for RunChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            RunChild::Text(t) => t.build_to(stream),
            RunChild::Sym(t) => t.build_to(stream),
            RunChild::DeleteText(t) => t.build_to(stream),
            RunChild::Tab(t) => t.build_to(stream),
            RunChild::Cr(t) => t.build_to(stream),
            RunChild::NoBreakHyphen(t) => t.build_to(stream),
            RunChild::PTab(t) => t.build_to(stream),
            RunChild::LastRenderedPageBreak(t) => t.build_to(stream),
            RunChild::Break(t) => t.build_to(stream),
            RunChild::FieldChar(t) => t.build_to(stream),
            RunChild::InstrText(t) => t.build_to(stream),
            RunChild::FootnoteReference(t) => t.build_to(stream),
            RunChild::CommentReference(t) => t.build_to(stream),
            RunChild::Unrecognized(n) => n.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    pub run_property: RunProperty,
    pub children: Vec<RunChild>,
}

impl Run {
    pub fn new() -> Run {
        Default::default()
    }

    pub fn add_text(mut self, text: impl Into<String>) -> Run {
        self.children
            .push(RunChild::Text(Text::new(text.into().replace('\n', ""))));
        self
    }

    pub fn add_delete_text(mut self, text: impl Into<String>) -> Run {
        self.children.push(RunChild::DeleteText(DeleteText::new(text.into())));
        self
    }

    pub fn add_tab(mut self) -> Run {
        self.children.push(RunChild::Tab(Tab::new()));
        self
    }

    pub fn add_break(mut self, t: BreakType) -> Run {
        self.children.push(RunChild::Break(Break::new(t)));
        self
    }

    pub fn add_cr(mut self) -> Run {
        self.children.push(RunChild::Cr(Cr::new()));
        self
    }

    pub fn add_no_break_hyphen(mut self) -> Run {
        self.children.push(RunChild::NoBreakHyphen(NoBreakHyphen::new()));
        self
    }

    pub fn add_ptab(mut self) -> Run {
        self.children.push(RunChild::PTab(PTab::new()));
        self
    }

    pub fn add_last_rendered_page_break(mut self) -> Run {
        self.children
            .push(RunChild::LastRenderedPageBreak(LastRenderedPageBreak::new()));
        self
    }

    pub fn add_comment_reference(mut self, id: usize) -> Run {
        self.children.push(RunChild::CommentReference(CommentReference::new(id)));
        self
    }

    pub fn style(mut self, s: impl Into<String>) -> Run {
        self.run_property = self.run_property.style(s);
        self
    }

    pub fn size(mut self, s: usize) -> Run {
        self.run_property = self.run_property.size(s);
        self
    }

    pub fn bold(mut self) -> Run {
        self.run_property = self.run_property.bold();
        self
    }

    pub fn disable_bold(mut self) -> Run {
        self.run_property = self.run_property.disable_bold();
        self
    }

    pub fn italic(mut self) -> Run {
        self.run_property = self.run_property.italic();
        self
    }

    pub fn disable_italic(mut self) -> Run {
        self.run_property = self.run_property.disable_italic();
        self
    }

    pub fn color(mut self, c: impl Into<String>) -> Run {
        self.run_property = self.run_property.color(c);
        self
    }

    pub fn underline(mut self, line_type: impl Into<String>) -> Run {
        self.run_property = self.run_property.underline(line_type);
        self
    }

    pub fn fonts(mut self, f: super::run_property::RunFonts) -> Run {
        self.run_property = self.run_property.fonts(f);
        self
    }

    pub(crate) fn set_property(mut self, p: RunProperty) -> Run {
        self.run_property = p;
        self
    }

    /// Collects the text content of the run, in document order: editable
    /// `w:t` runs plus the fixed substitutions `spec.md` §4.2 assigns the
    /// non-editable atoms (`w:tab`/`w:ptab` -> "\t", `w:cr` -> "\n",
    /// `w:noBreakHyphen` -> "-"). `w:br` is omitted here since its
    /// substitution depends on break type; see `crate::text::atoms`, which
    /// this method does not need to duplicate that logic for.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            match c {
                RunChild::Text(t) => out.push_str(&t.text),
                RunChild::Tab(_) | RunChild::PTab(_) => out.push('\t'),
                RunChild::Cr(_) => out.push('\n'),
                RunChild::NoBreakHyphen(_) => out.push('-'),
                _ => {}
            }
        }
        out
    }
}

impl BuildXML for Run {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_run()?
            .add_child(&self.run_property)?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlTextNode {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct XmlBreakNode {
    #[serde(rename = "@type", alias = "@w:type", default)]
    break_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlSymNode {
    #[serde(rename = "@font", alias = "@w:font", default)]
    font: Option<String>,
    #[serde(rename = "@char", alias = "@w:char", default)]
    char_code: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlFieldCharNode {
    #[serde(rename = "@fldCharType", alias = "@w:fldCharType", default)]
    field_char_type: Option<String>,
    #[serde(rename = "@dirty", alias = "@w:dirty", default)]
    dirty: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlFootnoteReferenceNode {
    #[serde(rename = "@id", alias = "@w:id", default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlPTabNode {
    #[serde(rename = "@alignment", alias = "@w:alignment", default)]
    alignment: Option<String>,
    #[serde(rename = "@relativeTo", alias = "@w:relativeTo", default)]
    relative_to: Option<String>,
    #[serde(rename = "@leader", alias = "@w:leader", default)]
    leader: Option<String>,
}

fn break_from_xml(node: XmlBreakNode) -> Break {
    let break_type = node
        .break_type
        .as_deref()
        .and_then(BreakType::from_xml_str)
        .unwrap_or(BreakType::TextWrapping);
    Break::new(break_type)
}

fn field_char_from_xml(node: XmlFieldCharNode) -> FieldChar {
    let t = node
        .field_char_type
        .as_deref()
        .and_then(FieldCharType::from_xml_str)
        .unwrap_or(FieldCharType::Begin);
    let mut f = FieldChar::new(t);
    if matches!(node.dirty.as_deref(), Some("true") | Some("1")) {
        f = f.dirty();
    }
    f
}

fn ptab_from_xml(node: XmlPTabNode) -> PTab {
    PTab {
        alignment: node.alignment.unwrap_or_else(|| "left".to_string()),
        relative_to: node.relative_to.unwrap_or_else(|| "margin".to_string()),
        leader: node.leader.unwrap_or_else(|| "none".to_string()),
    }
}

/// Walks `w:r`'s element map directly instead of through a
/// `#[serde(other)]`-backed enum, so unmatched tags keep their name and land
/// in `RunChild::Unrecognized(OpaqueNode)` instead of being silently dropped
/// the way the hidden fallback identifier would.
struct RunVisitor;

impl<'de> Visitor<'de> for RunVisitor {
    type Value = Run;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a w:r element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut run_property = None;
        let mut children = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "rPr" | "w:rPr" => run_property = Some(map.next_value()?),
                "t" | "w:t" => {
                    let node: XmlTextNode = map.next_value()?;
                    children.push(RunChild::Text(Text::new(replace_escaped(&node.text))));
                }
                "sym" | "w:sym" => {
                    let node: XmlSymNode = map.next_value()?;
                    if let (Some(font), Some(char_code)) = (node.font, node.char_code) {
                        children.push(RunChild::Sym(Sym::new(font, char_code)));
                    }
                }
                "delText" | "w:delText" => {
                    let node: XmlTextNode = map.next_value()?;
                    children.push(RunChild::DeleteText(DeleteText::new(replace_escaped(&node.text))));
                }
                "tab" | "w:tab" => {
                    let _: IgnoredAny = map.next_value()?;
                    children.push(RunChild::Tab(Tab::new()));
                }
                "br" | "w:br" => {
                    let node: XmlBreakNode = map.next_value()?;
                    children.push(RunChild::Break(break_from_xml(node)));
                }
                "cr" | "w:cr" => {
                    let _: IgnoredAny = map.next_value()?;
                    children.push(RunChild::Cr(Cr::new()));
                }
                "noBreakHyphen" | "w:noBreakHyphen" => {
                    let _: IgnoredAny = map.next_value()?;
                    children.push(RunChild::NoBreakHyphen(NoBreakHyphen::new()));
                }
                "ptab" | "w:ptab" => {
                    let node: XmlPTabNode = map.next_value()?;
                    children.push(RunChild::PTab(ptab_from_xml(node)));
                }
                "lastRenderedPageBreak" | "w:lastRenderedPageBreak" => {
                    let _: IgnoredAny = map.next_value()?;
                    children.push(RunChild::LastRenderedPageBreak(LastRenderedPageBreak::new()));
                }
                "fldChar" | "w:fldChar" => {
                    let node: XmlFieldCharNode = map.next_value()?;
                    children.push(RunChild::FieldChar(field_char_from_xml(node)));
                }
                "instrText" | "w:instrText" => {
                    let node: XmlTextNode = map.next_value()?;
                    children.push(RunChild::InstrText(InstrText::new(replace_escaped(&node.text))));
                }
                "footnoteReference" | "w:footnoteReference" => {
                    let node: XmlFootnoteReferenceNode = map.next_value()?;
                    if let Some(id) = node.id.and_then(|v| v.parse::<usize>().ok()) {
                        children.push(RunChild::FootnoteReference(FootnoteReference::new(id)));
                    }
                }
                "commentReference" | "w:commentReference" => {
                    children.push(RunChild::CommentReference(map.next_value()?));
                }
                "$text" => {
                    let _: String = map.next_value()?;
                }
                other => {
                    let mut node: OpaqueNode = map.next_value()?;
                    node.tag = other.to_string();
                    children.push(RunChild::Unrecognized(node));
                }
            }
        }
        Ok(Run {
            run_property: run_property.unwrap_or_default(),
            children,
        })
    }
}

impl<'de> Deserialize<'de> for Run {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RunVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build() {
        let b = Run::new().add_text("Hello").build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:r><w:rPr /><w:t>Hello</w:t></w:r>"#
        );
    }

    #[test]
    fn test_build_preserves_space_only_when_trimming_would_change_text() {
        let plain = Text::new("Hello").build();
        assert_eq!(str::from_utf8(&plain).unwrap(), r#"<w:t>Hello</w:t>"#);

        let padded = Text::new(" Hello ").build();
        assert_eq!(
            str::from_utf8(&padded).unwrap(),
            r#"<w:t xml:space="preserve"> Hello </w:t>"#
        );

        let padded_delete = DeleteText::new("Hello ").build();
        assert_eq!(
            str::from_utf8(&padded_delete).unwrap(),
            r#"<w:delText xml:space="preserve">Hello </w:delText>"#
        );
    }

    #[test]
    fn test_underline() {
        let b = Run::new().add_text("Hello").underline("single").build();
        assert_eq!(
            str::from_utf8(&b).unwrap(),
            r#"<w:r><w:rPr><w:u w:val="single" /></w:rPr><w:t>Hello</w:t></w:r>"#
        );
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let xml = r#"<w:r><w:rPr><w:b/></w:rPr><w:t>Hello</w:t></w:r>"#;
        let r: Run = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(r.plain_text(), "Hello");
        assert!(r.run_property.bold.is_on());
    }

    #[test]
    fn test_plain_text_includes_atom_substitutions() {
        let r = Run::new()
            .add_text("a")
            .add_cr()
            .add_text("b")
            .add_tab()
            .add_no_break_hyphen();
        assert_eq!(r.plain_text(), "a\nb\t-");
    }

    #[test]
    fn test_last_rendered_page_break_roundtrip() {
        let xml = r#"<w:r><w:rPr/><w:t>a</w:t><w:lastRenderedPageBreak/><w:t>b</w:t></w:r>"#;
        let r: Run = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(
            r.children,
            vec![
                RunChild::Text(Text::new("a")),
                RunChild::LastRenderedPageBreak(LastRenderedPageBreak::new()),
                RunChild::Text(Text::new("b")),
            ]
        );
    }

    #[test]
    fn test_cr_no_break_hyphen_ptab_roundtrip() {
        let xml = r#"<w:r><w:rPr/><w:cr/><w:noBreakHyphen/><w:ptab w:alignment="center" w:relativeTo="margin" w:leader="dot"/></w:r>"#;
        let r: Run = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(
            r.children,
            vec![
                RunChild::Cr(Cr::new()),
                RunChild::NoBreakHyphen(NoBreakHyphen::new()),
                RunChild::PTab(PTab {
                    alignment: "center".to_string(),
                    relative_to: "margin".to_string(),
                    leader: "dot".to_string(),
                }),
            ]
        );
    }
}
