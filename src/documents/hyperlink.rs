//! `w:hyperlink`, `spec.md` §4.3.
//!
//! Grounded on `docx-core/src/documents/elements/hyperlink.rs`'s
//! `HyperlinkData`/`Hyperlink` shape (external vs. anchor), trimmed of the
//! `create_hyperlink_rid`/`generate_hyperlink_id` WASM-bridge ID generators
//! this crate does not carry (relationship IDs are assigned by the `opc`
//! module at save time instead).

use std::io::Write;

use serde::{Deserialize, Deserializer};

use crate::documents::bookmark::{BookmarkEnd, BookmarkStart};
use crate::documents::paragraph::ParagraphChild;
use crate::documents::run::Run;
use crate::documents::track_change::{Delete, Insert};
use crate::documents::BuildXML;
use crate::types::HyperlinkType;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub enum HyperlinkData {
    External { rid: String },
    Anchor { anchor: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlink {
    pub data: HyperlinkData,
    pub history: bool,
    pub children: Vec<ParagraphChild>,
}

impl Hyperlink {
    pub fn new(target: impl Into<String>, kind: HyperlinkType) -> Self {
        let data = match kind {
            HyperlinkType::External => HyperlinkData::External { rid: target.into() },
            HyperlinkType::Anchor => HyperlinkData::Anchor {
                anchor: target.into(),
            },
        };
        Self {
            data,
            history: true,
            children: Vec::new(),
        }
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(ParagraphChild::Run(Box::new(run)));
        self
    }

    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(|c| match c {
                ParagraphChild::Run(r) => r.plain_text(),
                _ => String::new(),
            })
            .collect()
    }
}

impl BuildXML for Hyperlink {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        let history = if self.history { "1" } else { "0" };
        let mut attrs: Vec<(&str, &str)> = vec![("w:history", history)];
        match &self.data {
            HyperlinkData::External { rid } => attrs.push(("r:id", rid)),
            HyperlinkData::Anchor { anchor } => attrs.push(("w:anchor", anchor)),
        }
        XMLBuilder::from(stream)
            .open_with_attrs("w:hyperlink", &attrs)?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlIdNode {
    #[serde(rename = "@id", alias = "@w:id", default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlBookmarkStartNode {
    #[serde(rename = "@id", alias = "@w:id", default)]
    id: Option<String>,
    #[serde(rename = "@name", alias = "@w:name", default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
enum HyperlinkChildXml {
    #[serde(rename = "r", alias = "w:r")]
    Run(Run),
    #[serde(rename = "bookmarkStart", alias = "w:bookmarkStart")]
    BookmarkStart(XmlBookmarkStartNode),
    #[serde(rename = "bookmarkEnd", alias = "w:bookmarkEnd")]
    BookmarkEnd(XmlIdNode),
    #[serde(rename = "ins", alias = "w:ins")]
    Insert(Insert),
    #[serde(rename = "del", alias = "w:del")]
    Delete(Delete),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct HyperlinkXml {
    #[serde(rename = "@id", alias = "@r:id", default)]
    rid: Option<String>,
    #[serde(rename = "@anchor", alias = "@w:anchor", default)]
    anchor: Option<String>,
    #[serde(rename = "@history", alias = "@w:history", default)]
    history: Option<String>,
    #[serde(rename = "$value", default)]
    children: Vec<HyperlinkChildXml>,
}

impl<'de> Deserialize<'de> for Hyperlink {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let xml = HyperlinkXml::deserialize(deserializer)?;
        let data = match (xml.rid, xml.anchor) {
            (Some(rid), _) => HyperlinkData::External { rid },
            (None, Some(anchor)) => HyperlinkData::Anchor { anchor },
            (None, None) => return Err(D::Error::custom("hyperlink missing r:id and w:anchor")),
        };
        let history = !matches!(xml.history.as_deref(), Some("0") | Some("false"));
        let children = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                HyperlinkChildXml::Run(r) => Some(ParagraphChild::Run(Box::new(r))),
                HyperlinkChildXml::BookmarkStart(n) => {
                    let id = n.id.and_then(|v| v.parse().ok())?;
                    let name = n.name?;
                    Some(ParagraphChild::BookmarkStart(BookmarkStart::new(id, name)))
                }
                HyperlinkChildXml::BookmarkEnd(n) => {
                    let id = n.id.and_then(|v| v.parse().ok())?;
                    Some(ParagraphChild::BookmarkEnd(BookmarkEnd::new(id)))
                }
                HyperlinkChildXml::Insert(i) => Some(ParagraphChild::Insert(Box::new(i))),
                HyperlinkChildXml::Delete(d) => Some(ParagraphChild::Delete(Box::new(d))),
                HyperlinkChildXml::Unknown => None,
            })
            .collect();
        Ok(Hyperlink {
            data,
            history,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str;

    #[test]
    fn test_build_anchor() {
        let h = Hyperlink::new("ToC1", HyperlinkType::Anchor).add_run(Run::new().add_text("hello"));
        assert_eq!(
            str::from_utf8(&h.build()).unwrap(),
            r#"<w:hyperlink w:history="1" w:anchor="ToC1"><w:r><w:rPr /><w:t>hello</w:t></w:r></w:hyperlink>"#
        );
    }
}
