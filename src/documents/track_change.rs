//! `w:ins`/`w:del` preservation, `spec.md` Non-goals: parsed and re-emitted
//! unchanged, no new revision is computed by this crate.
//!
//! Grounded on `docx-core/src/documents/elements/insert.rs`/`delete.rs`.
//! `DeleteText` children of a `w:del` reuse `run::DeleteText` directly
//! rather than a parallel type, since the wire shape is identical.

use std::io::Write;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::documents::run::Run;
use crate::documents::BuildXML;
use crate::xml_builder::*;

#[derive(Debug, Clone, PartialEq)]
pub enum InsertChild {
    Run(Box<Run>),
    Delete(Box<Delete>),
}

impl BuildXML for InsertChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            InsertChild::Run(r) => r.build_to(stream),
            InsertChild::Delete(d) => d.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insert {
    pub author: String,
    pub date: String,
    pub children: Vec<InsertChild>,
}

impl Insert {
    pub fn new(run: Run) -> Self {
        Self {
            author: String::new(),
            date: String::new(),
            children: vec![InsertChild::Run(Box::new(run))],
        }
    }

    pub fn author(mut self, a: impl Into<String>) -> Self {
        self.author = a.into();
        self
    }

    pub fn date(mut self, d: impl Into<String>) -> Self {
        self.date = d.into();
        self
    }

    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(|c| match c {
                InsertChild::Run(r) => r.plain_text(),
                InsertChild::Delete(_) => String::new(),
            })
            .collect()
    }
}

impl BuildXML for Insert {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_insert()?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteChild {
    Run(Box<Run>),
}

impl BuildXML for DeleteChild {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        match self {
            DeleteChild::Run(r) => r.build_to(stream),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delete {
    pub author: String,
    pub date: String,
    pub children: Vec<DeleteChild>,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildXML for Delete {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .open_delete()?
            .add_children(&self.children)?
            .close()?
            .into_inner()
    }
}

#[derive(Debug, Deserialize)]
enum InsertChildXml {
    #[serde(rename = "r", alias = "w:r")]
    Run(Run),
    #[serde(rename = "del", alias = "w:del")]
    Delete(Delete),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct InsertXml {
    #[serde(rename = "@author", alias = "@w:author", default)]
    author: Option<String>,
    #[serde(rename = "@date", alias = "@w:date", default)]
    date: Option<String>,
    #[serde(rename = "$value", default)]
    children: Vec<InsertChildXml>,
}

impl<'de> Deserialize<'de> for Insert {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let xml = InsertXml::deserialize(deserializer)?;
        let children = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                InsertChildXml::Run(r) => Some(InsertChild::Run(Box::new(r))),
                InsertChildXml::Delete(d) => Some(InsertChild::Delete(Box::new(d))),
                InsertChildXml::Unknown => None,
            })
            .collect();
        Ok(Insert {
            author: xml.author.unwrap_or_default(),
            date: xml.date.unwrap_or_default(),
            children,
        })
    }
}

#[derive(Debug, Deserialize)]
enum DeleteChildXml {
    #[serde(rename = "r", alias = "w:r")]
    Run(Run),
    #[serde(rename = "delText", alias = "w:delText")]
    DeleteText(IgnoredAny),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct DeleteXml {
    #[serde(rename = "@author", alias = "@w:author", default)]
    author: Option<String>,
    #[serde(rename = "@date", alias = "@w:date", default)]
    date: Option<String>,
    #[serde(rename = "$value", default)]
    children: Vec<DeleteChildXml>,
}

impl<'de> Deserialize<'de> for Delete {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let xml = DeleteXml::deserialize(deserializer)?;
        let children = xml
            .children
            .into_iter()
            .filter_map(|c| match c {
                DeleteChildXml::Run(r) => Some(DeleteChild::Run(Box::new(r))),
                DeleteChildXml::DeleteText(_) | DeleteChildXml::Unknown => None,
            })
            .collect();
        Ok(Delete {
            author: xml.author.unwrap_or_default(),
            date: xml.date.unwrap_or_default(),
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
    fn test_build_insert() {
        let i = Insert::new(Run::new().add_text("Hello"));
        assert_eq!(
            str::from_utf8(&i.build()).unwrap(),
            r#"<w:ins><w:r><w:rPr /><w:t>Hello</w:t></w:r></w:ins>"#
        );
    }
}
