//! `docProps/core.xml` and `docProps/app.xml`, `spec.md` §4.6/§6.
//!
//! Neither part has a base teacher file in the retrieved pack — `docx-core`
//! only carries `reader/custom_properties.rs`, for the distinct
//! `docProps/custom.xml` part. `CoreProperties`/`AppProperties` follow that
//! file's `FromXMLQuickXml` entry-point convention and `comment_extended.rs`'s
//! camelCase element-name style, since neither `dc:title`-style Dublin Core
//! names nor `Application`/`Pages`-style extended-properties names are
//! camelCase `w:` elements to begin with.

use std::fmt;
use std::io::Write;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::documents::BuildXML;
use crate::error::DocError;
use crate::xml_builder::*;

const CORE_PROPERTY_MAX_LEN: usize = 255;

/// `docProps/core.xml`'s Dublin Core metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub category: Option<String>,
    pub content_status: Option<String>,
    pub language: Option<String>,
}

impl CoreProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.title = Some(v.into());
        self
    }

    pub fn subject(mut self, v: impl Into<String>) -> Self {
        self.subject = Some(v.into());
        self
    }

    pub fn creator(mut self, v: impl Into<String>) -> Self {
        self.creator = Some(v.into());
        self
    }

    pub fn keywords(mut self, v: impl Into<String>) -> Self {
        self.keywords = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.description = Some(v.into());
        self
    }

    pub fn last_modified_by(mut self, v: impl Into<String>) -> Self {
        self.last_modified_by = Some(v.into());
        self
    }

    pub fn revision(mut self, v: u32) -> Self {
        self.revision = Some(v);
        self
    }

    pub fn created(mut self, v: impl Into<String>) -> Self {
        self.created = Some(v.into());
        self
    }

    pub fn modified(mut self, v: impl Into<String>) -> Self {
        self.modified = Some(v.into());
        self
    }

    pub fn category(mut self, v: impl Into<String>) -> Self {
        self.category = Some(v.into());
        self
    }

    pub fn content_status(mut self, v: impl Into<String>) -> Self {
        self.content_status = Some(v.into());
        self
    }

    pub fn language(mut self, v: impl Into<String>) -> Self {
        self.language = Some(v.into());
        self
    }

    /// `spec.md` §4.6's 255-character limit on every core property string.
    pub fn validate(&self) -> Result<(), DocError> {
        let fields: [(&str, &Option<String>); 9] = [
            ("dc:title", &self.title),
            ("dc:subject", &self.subject),
            ("dc:creator", &self.creator),
            ("cp:keywords", &self.keywords),
            ("dc:description", &self.description),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("cp:category", &self.category),
            ("cp:contentStatus", &self.content_status),
            ("dc:language", &self.language),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                let len = v.chars().count();
                if len > CORE_PROPERTY_MAX_LEN {
                    return Err(DocError::DomainConstraintViolation {
                        property: name.to_string(),
                        len,
                    });
                }
            }
        }
        Ok(())
    }
}

impl BuildXML for CoreProperties {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_with_attrs(
                "cp:coreProperties",
                &[
                    (
                        "xmlns:cp",
                        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                    ),
                    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                    ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                    ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
                    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
                ],
            )?
            .apply_opt(self.title.as_deref(), |v, b| b.open("dc:title")?.text(v)?.close())?
            .apply_opt(self.subject.as_deref(), |v, b| b.open("dc:subject")?.text(v)?.close())?
            .apply_opt(self.creator.as_deref(), |v, b| b.open("dc:creator")?.text(v)?.close())?
            .apply_opt(self.keywords.as_deref(), |v, b| b.open("cp:keywords")?.text(v)?.close())?
            .apply_opt(self.description.as_deref(), |v, b| b.open("dc:description")?.text(v)?.close())?
            .apply_opt(self.last_modified_by.as_deref(), |v, b| {
                b.open("cp:lastModifiedBy")?.text(v)?.close()
            })?
            .apply_opt(self.revision.map(|v| v.to_string()).as_deref(), |v, b| {
                b.open("cp:revision")?.text(v)?.close()
            })?
            .apply_opt(self.created.as_deref(), |v, b| {
                b.open_with_attrs("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")])?
                    .text(v)?
                    .close()
            })?
            .apply_opt(self.modified.as_deref(), |v, b| {
                b.open_with_attrs("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")])?
                    .text(v)?
                    .close()
            })?
            .apply_opt(self.category.as_deref(), |v, b| b.open("cp:category")?.text(v)?.close())?
            .apply_opt(self.content_status.as_deref(), |v, b| {
                b.open("cp:contentStatus")?.text(v)?.close()
            })?
            .apply_opt(self.language.as_deref(), |v, b| b.open("dc:language")?.text(v)?.close())?
            .close()?
            .into_inner()
    }
}

struct CorePropertiesVisitor;

impl<'de> Visitor<'de> for CorePropertiesVisitor {
    type Value = CoreProperties;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a cp:coreProperties element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        #[derive(Debug, Deserialize, Default)]
        struct TextNode {
            #[serde(rename = "$text", default)]
            text: String,
        }
        let mut props = CoreProperties::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "title" | "dc:title" => props.title = Some(map.next_value::<TextNode>()?.text),
                "subject" | "dc:subject" => props.subject = Some(map.next_value::<TextNode>()?.text),
                "creator" | "dc:creator" => props.creator = Some(map.next_value::<TextNode>()?.text),
                "keywords" | "cp:keywords" => props.keywords = Some(map.next_value::<TextNode>()?.text),
                "description" | "dc:description" => props.description = Some(map.next_value::<TextNode>()?.text),
                "lastModifiedBy" | "cp:lastModifiedBy" => {
                    props.last_modified_by = Some(map.next_value::<TextNode>()?.text)
                }
                "revision" | "cp:revision" => {
                    props.revision = map.next_value::<TextNode>()?.text.parse().ok();
                }
                "created" | "dcterms:created" => props.created = Some(map.next_value::<TextNode>()?.text),
                "modified" | "dcterms:modified" => props.modified = Some(map.next_value::<TextNode>()?.text),
                "category" | "cp:category" => props.category = Some(map.next_value::<TextNode>()?.text),
                "contentStatus" | "cp:contentStatus" => {
                    props.content_status = Some(map.next_value::<TextNode>()?.text)
                }
                "language" | "dc:language" => props.language = Some(map.next_value::<TextNode>()?.text),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(props)
    }
}

impl<'de> Deserialize<'de> for CoreProperties {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CorePropertiesVisitor)
    }
}

crate::reader::impl_from_xml_via_quick!(CoreProperties);

/// `docProps/app.xml`'s extended (application) properties. No 255-character
/// limit applies here: `spec.md` §4.6 only names that constraint for core
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppProperties {
    pub application: Option<String>,
    pub template: Option<String>,
    pub pages: Option<u32>,
    pub words: Option<u32>,
    pub characters: Option<u32>,
    pub company: Option<String>,
    pub lines: Option<u32>,
    pub paragraphs: Option<u32>,
}

impl AppProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn application(mut self, v: impl Into<String>) -> Self {
        self.application = Some(v.into());
        self
    }

    pub fn template(mut self, v: impl Into<String>) -> Self {
        self.template = Some(v.into());
        self
    }

    pub fn pages(mut self, v: u32) -> Self {
        self.pages = Some(v);
        self
    }

    pub fn words(mut self, v: u32) -> Self {
        self.words = Some(v);
        self
    }

    pub fn characters(mut self, v: u32) -> Self {
        self.characters = Some(v);
        self
    }

    pub fn company(mut self, v: impl Into<String>) -> Self {
        self.company = Some(v.into());
        self
    }

    pub fn lines(mut self, v: u32) -> Self {
        self.lines = Some(v);
        self
    }

    pub fn paragraphs(mut self, v: u32) -> Self {
        self.paragraphs = Some(v);
        self
    }
}

impl BuildXML for AppProperties {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>> {
        XMLBuilder::from(stream)
            .declaration(Some(true))?
            .open_with_attrs(
                "Properties",
                &[
                    (
                        "xmlns",
                        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
                    ),
                    ("xmlns:vt", "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"),
                ],
            )?
            .apply_opt(self.application.as_deref(), |v, b| b.open("Application")?.text(v)?.close())?
            .apply_opt(self.template.as_deref(), |v, b| b.open("Template")?.text(v)?.close())?
            .apply_opt(self.pages.map(|v| v.to_string()).as_deref(), |v, b| b.open("Pages")?.text(v)?.close())?
            .apply_opt(self.words.map(|v| v.to_string()).as_deref(), |v, b| b.open("Words")?.text(v)?.close())?
            .apply_opt(self.characters.map(|v| v.to_string()).as_deref(), |v, b| {
                b.open("Characters")?.text(v)?.close()
            })?
            .apply_opt(self.company.as_deref(), |v, b| b.open("Company")?.text(v)?.close())?
            .apply_opt(self.lines.map(|v| v.to_string()).as_deref(), |v, b| b.open("Lines")?.text(v)?.close())?
            .apply_opt(self.paragraphs.map(|v| v.to_string()).as_deref(), |v, b| {
                b.open("Paragraphs")?.text(v)?.close()
            })?
            .close()?
            .into_inner()
    }
}

struct AppPropertiesVisitor;

impl<'de> Visitor<'de> for AppPropertiesVisitor {
    type Value = AppProperties;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a Properties element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        #[derive(Debug, Deserialize, Default)]
        struct TextNode {
            #[serde(rename = "$text", default)]
            text: String,
        }
        let mut props = AppProperties::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "Application" => props.application = Some(map.next_value::<TextNode>()?.text),
                "Template" => props.template = Some(map.next_value::<TextNode>()?.text),
                "Pages" => props.pages = map.next_value::<TextNode>()?.text.parse().ok(),
                "Words" => props.words = map.next_value::<TextNode>()?.text.parse().ok(),
                "Characters" => props.characters = map.next_value::<TextNode>()?.text.parse().ok(),
                "Company" => props.company = Some(map.next_value::<TextNode>()?.text),
                "Lines" => props.lines = map.next_value::<TextNode>()?.text.parse().ok(),
                "Paragraphs" => props.paragraphs = map.next_value::<TextNode>()?.text.parse().ok(),
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }
        Ok(props)
    }
}

impl<'de> Deserialize<'de> for AppProperties {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AppPropertiesVisitor)
    }
}

crate::reader::impl_from_xml_via_quick!(AppProperties);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FromXML;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_rejects_long_title() {
        let props = CoreProperties::new().title("x".repeat(256));
        let err = props.validate().unwrap_err();
        match err {
            DocError::DomainConstraintViolation { property, len } => {
                assert_eq!(property, "dc:title");
                assert_eq!(len, 256);
            }
            other => panic!("expected DomainConstraintViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_short_fields() {
        let props = CoreProperties::new().title("short").creator("me");
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_roundtrip_core_properties() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>Report</dc:title>
<dc:creator>Jane</dc:creator>
<cp:revision>3</cp:revision>
</cp:coreProperties>"#;
        let props = CoreProperties::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(props.title.as_deref(), Some("Report"));
        assert_eq!(props.creator.as_deref(), Some("Jane"));
        assert_eq!(props.revision, Some(3));
    }

    #[test]
    fn test_roundtrip_app_properties() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>Microsoft Office Word</Application>
<Pages>2</Pages>
<Words>143</Words>
</Properties>"#;
        let props = AppProperties::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(props.application.as_deref(), Some("Microsoft Office Word"));
        assert_eq!(props.pages, Some(2));
        assert_eq!(props.words, Some(143));
    }
}
