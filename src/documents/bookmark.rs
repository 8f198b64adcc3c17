//! `w:bookmarkStart`/`w:bookmarkEnd`, preserved verbatim for round-trip.

use std::io::Write;

use serde::{Deserialize, Deserializer};

use crate::documents::BuildXML;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkStart {
    pub id: usize,
    pub name: String,
}

impl BookmarkStart {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl BuildXML for BookmarkStart {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs(
                "w:bookmarkStart",
                &[("w:id", &self.id.to_string()), ("w:name", &self.name)],
            )?
            .into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkEnd {
    pub id: usize,
}

impl BookmarkEnd {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl BuildXML for BookmarkEnd {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .closed_with_attrs("w:bookmarkEnd", &[("w:id", &self.id.to_string())])?
            .into_inner()
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlBookmarkStartNode {
    #[serde(rename = "@id", alias = "@w:id", default)]
    id: Option<String>,
    #[serde(rename = "@name", alias = "@w:name", default)]
    name: Option<String>,
}

impl<'de> Deserialize<'de> for BookmarkStart {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let node = XmlBookmarkStartNode::deserialize(deserializer)?;
        let id = node
            .id
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| D::Error::custom("bookmarkStart missing w:id"))?;
        let name = node
            .name
            .ok_or_else(|| D::Error::custom("bookmarkStart missing w:name"))?;
        Ok(BookmarkStart { id, name })
    }
}

#[derive(Debug, Deserialize, Default)]
struct XmlIdNode {
    #[serde(rename = "@id", alias = "@w:id", default)]
    id: Option<String>,
}

impl<'de> Deserialize<'de> for BookmarkEnd {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let node = XmlIdNode::deserialize(deserializer)?;
        let id = node
            .id
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| D::Error::custom("bookmarkEnd missing w:id"))?;
        Ok(BookmarkEnd { id })
    }
}
