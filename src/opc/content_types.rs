//! `[Content_Types].xml` — content-type classification, `spec.md` §6.
//!
//! New code: classifies parts by extension/path against the fixed
//! relationship-type list `spec.md` §6 names (`officeDocument,
//! coreProperties, extendedProperties, styles, settings, numbering,
//! comments, footnotes, endnotes, fontTable, theme, webSettings, header,
//! footer, image`), using the standard OPC content-type strings Word itself
//! writes for each.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use zip::read::ZipArchive;

use crate::error::ReaderError;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const SETTINGS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
pub const NUMBERING: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub const COMMENTS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
pub const FOOTNOTES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footnotes+xml";
pub const ENDNOTES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.endnotes+xml";
pub const FONT_TABLE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.fontTable+xml";
pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub const WEB_SETTINGS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.webSettings+xml";
pub const HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const EXTENDED_PROPERTIES: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

fn default_content_type_for(name: &str) -> String {
    if name.ends_with(".rels") {
        return RELATIONSHIPS.to_string();
    }
    match name {
        "word/document.xml" => MAIN_DOCUMENT.to_string(),
        "word/styles.xml" => STYLES.to_string(),
        "word/settings.xml" => SETTINGS.to_string(),
        "word/numbering.xml" => NUMBERING.to_string(),
        "word/comments.xml" => COMMENTS.to_string(),
        "word/footnotes.xml" => FOOTNOTES.to_string(),
        "word/endnotes.xml" => ENDNOTES.to_string(),
        "word/fontTable.xml" => FONT_TABLE.to_string(),
        "word/webSettings.xml" => WEB_SETTINGS.to_string(),
        "docProps/core.xml" => CORE_PROPERTIES.to_string(),
        "docProps/app.xml" => EXTENDED_PROPERTIES.to_string(),
        _ if name.starts_with("word/theme/") => THEME.to_string(),
        _ if name.starts_with("word/header") => HEADER.to_string(),
        _ if name.starts_with("word/footer") => FOOTER.to_string(),
        _ if name.starts_with("word/media/") => image_content_type(name),
        _ => "application/octet-stream".to_string(),
    }
}

fn image_content_type(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Per-part `<Override>` entries read from `[Content_Types].xml`, keyed by
/// `/`-prefixed part name. Parts not listed here fall back to
/// `default_content_type_for`'s extension/path-based guess.
pub fn classify(name: &str, overrides: &BTreeMap<String, String>) -> String {
    let key = format!("/{name}");
    overrides
        .get(&key)
        .cloned()
        .unwrap_or_else(|| default_content_type_for(name))
}

#[derive(Debug, Deserialize)]
struct OverrideXml {
    #[serde(rename = "@PartName", default)]
    part_name: String,
    #[serde(rename = "@ContentType", default)]
    content_type: String,
}

#[derive(Debug, Deserialize)]
struct DefaultXml {
    #[serde(rename = "@Extension", default)]
    extension: String,
    #[serde(rename = "@ContentType", default)]
    content_type: String,
}

#[derive(Debug, Deserialize)]
enum TypesChildXml {
    Override(OverrideXml),
    Default(DefaultXml),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Default)]
struct TypesXml {
    #[serde(rename = "$value", default)]
    children: Vec<TypesChildXml>,
}

/// Reads `[Content_Types].xml` out of the archive, if present, returning its
/// `<Override PartName=".." ContentType=".."/>` entries. `<Default>`
/// extension-based entries are folded in as synthetic overrides so callers
/// only need one lookup table.
pub fn read_overrides<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<BTreeMap<String, String>, ReaderError> {
    let mut overrides = BTreeMap::new();
    let Ok(mut entry) = archive.by_name(CONTENT_TYPES_PART) else {
        return Ok(overrides);
    };
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    drop(entry);
    let xml: TypesXml = quick_xml::de::from_reader(buf.as_slice())?;
    for child in xml.children {
        match child {
            TypesChildXml::Override(o) => {
                overrides.insert(o.part_name, o.content_type);
            }
            TypesChildXml::Default(_) => {}
            TypesChildXml::Unknown => {}
        }
    }
    Ok(overrides)
}

/// Serializes a fresh `[Content_Types].xml` for `Package::save`, re-deriving
/// each part's content type rather than caching the archive's original
/// `<Default>`/`<Override>` shape (this crate always writes `<Override>`
/// entries, which Word accepts identically).
pub fn build_content_types_xml(parts: &BTreeMap<String, crate::opc::Part>) -> Vec<u8> {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    for part in parts.values() {
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            part.name,
            crate::escape::escape(&part.content_type)
        ));
    }
    xml.push_str("</Types>");
    xml.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_type_for_document() {
        assert_eq!(default_content_type_for("word/document.xml"), MAIN_DOCUMENT);
    }

    #[test]
    fn test_default_content_type_for_image() {
        assert_eq!(default_content_type_for("word/media/image1.png"), "image/png");
    }

    #[test]
    fn test_classify_prefers_override() {
        let mut overrides = BTreeMap::new();
        overrides.insert("/word/document.xml".to_string(), "custom/type".to_string());
        assert_eq!(classify("word/document.xml", &overrides), "custom/type");
    }
}
