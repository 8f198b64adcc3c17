//! Fixed prefix <-> URI registry and Clark notation helpers.
//!
//! The prefix set matches exactly what the teacher's `Document::build` emits
//! on `w:document` (see `documents/document.rs`'s `test_document`), plus the
//! `cp`/`dc`/`dcterms`/`xsi` set needed for core properties parts that the
//! teacher does not model but this crate adds (see SPEC_FULL.md §4.6).

use crate::error::{UnknownNamespacePrefix, UnknownNamespaceUri};

/// `(prefix, uri)` pairs, in the order the teacher writes them on the root
/// `w:document` element.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("o", "urn:schemas-microsoft-com:office:office"),
    (
        "r",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
    ),
    ("v", "urn:schemas-microsoft-com:vml"),
    (
        "w",
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    ),
    ("w10", "urn:schemas-microsoft-com:office:word"),
    (
        "wp",
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing",
    ),
    (
        "wps",
        "http://schemas.microsoft.com/office/word/2010/wordprocessingShape",
    ),
    (
        "wpg",
        "http://schemas.microsoft.com/office/word/2010/wordprocessingGroup",
    ),
    (
        "mc",
        "http://schemas.openxmlformats.org/markup-compatibility/2006",
    ),
    (
        "wp14",
        "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing",
    ),
    ("w14", "http://schemas.microsoft.com/office/word/2012/wordml"),
    ("w15", "http://schemas.microsoft.com/office/word/2012/wordml"),
    (
        "a",
        "http://schemas.openxmlformats.org/drawingml/2006/main",
    ),
    (
        "pic",
        "http://schemas.openxmlformats.org/drawingml/2006/picture",
    ),
    (
        "cp",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    ),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("dcmitype", "http://purl.org/dc/dcmitype/"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    (
        "ct",
        "http://schemas.openxmlformats.org/package/2006/content-types",
    ),
    (
        "pr",
        "http://schemas.openxmlformats.org/package/2006/relationships",
    ),
];

pub fn uri_for_prefix(prefix: &str) -> Result<&'static str, UnknownNamespacePrefix> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
        .ok_or_else(|| UnknownNamespacePrefix {
            prefix: prefix.to_string(),
        })
}

pub fn prefix_for_uri(uri: &str) -> Result<&'static str, UnknownNamespaceUri> {
    NAMESPACES
        .iter()
        .find(|(_, u)| *u == uri)
        .map(|(p, _)| *p)
        .ok_or_else(|| UnknownNamespaceUri {
            uri: uri.to_string(),
        })
}

/// Converts `w:p` to Clark notation
/// `{http://schemas.openxmlformats.org/wordprocessingml/2006/main}p`.
pub fn to_clark(qname: &str) -> Result<String, UnknownNamespacePrefix> {
    match qname.split_once(':') {
        Some((prefix, local)) => Ok(format!("{{{}}}{}", uri_for_prefix(prefix)?, local)),
        None => Ok(qname.to_string()),
    }
}

/// Parses Clark notation `{uri}local` back into `prefix:local`.
pub fn from_clark(clark: &str) -> Result<String, UnknownNamespaceUri> {
    if let Some(rest) = clark.strip_prefix('{') {
        if let Some((uri, local)) = rest.split_once('}') {
            return Ok(format!("{}:{}", prefix_for_uri(uri)?, local));
        }
    }
    Ok(clark.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_clark() {
        assert_eq!(
            to_clark("w:p").unwrap(),
            "{http://schemas.openxmlformats.org/wordprocessingml/2006/main}p"
        );
    }

    #[test]
    fn test_roundtrip() {
        let clark = to_clark("w:sectPr").unwrap();
        assert_eq!(from_clark(&clark).unwrap(), "w:sectPr");
    }

    #[test]
    fn test_unknown_prefix() {
        assert!(uri_for_prefix("zz").is_err());
    }
}
