//! `_rels/*.rels` — OPC relationship parts, `spec.md` §6.
//!
//! Grounded on `docx-core/src/reader/rels.rs` one-to-one; `Rels`/`RId` are
//! reconstructed from that file's call-site contract (`Rels { rels }`,
//! `(rel_type, id, target)` triples) since `reader/mod.rs`'s own type
//! definitions were filtered from the retrieved pack.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::reader::impl_from_xml_via_quick;

pub type RId = String;

/// One package's worth of relationships, as `(rel-type, rId, target)`
/// triples — the flat shape `spec.md` §6's `Package.Rels()`/`Part.Rels()`
/// contract describes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rels {
    pub rels: Vec<(String, RId, String)>,
}

impl Rels {
    pub fn by_id(&self, id: &str) -> Option<&(String, RId, String)> {
        self.rels.iter().find(|(_, rid, _)| rid == id)
    }

    pub fn by_type<'a>(&'a self, rel_type_suffix: &str) -> Vec<&'a (String, RId, String)> {
        self.rels
            .iter()
            .filter(|(ty, _, _)| ty.ends_with(rel_type_suffix))
            .collect()
    }

    /// Adds a relationship for `target` under `rel_type` if one doesn't
    /// already exist, synthesizing a fresh `rId` (`spec.md` §6's relationship
    /// contract doesn't mandate any particular `rId` scheme, only that it be
    /// unique within the part). Used when saving a document that was built
    /// fresh rather than opened from an existing package, so parts added
    /// through the builder API (styles, numbering, comments, core/app
    /// properties) are discoverable again on the next open.
    pub fn ensure(&mut self, rel_type: &str, target: &str) {
        if self.rels.iter().any(|(ty, _, tgt)| ty == rel_type && tgt == target) {
            return;
        }
        let next_n = self
            .rels
            .iter()
            .filter_map(|(_, rid, _)| rid.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0)
            + 1;
        self.rels.push((rel_type.to_string(), format!("rId{next_n}"), target.to_string()));
    }

    /// `_rels/*.rels` serialization, the write-side counterpart to this
    /// type's hand-rolled `Deserialize`.
    pub fn build_xml(&self) -> Vec<u8> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (rel_type, id, target) in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                crate::escape::escape(id),
                crate::escape::escape(rel_type),
                crate::escape::escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml.into_bytes()
    }
}

#[derive(Debug, Deserialize)]
struct RelationshipXml {
    #[serde(rename = "@Type", default)]
    rel_type: String,
    #[serde(rename = "@Id", default)]
    id: String,
    #[serde(rename = "@Target", default)]
    target: String,
}

#[derive(Debug, Deserialize)]
enum RelationshipsChildXml {
    Relationship(RelationshipXml),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct RelationshipsXml {
    #[serde(rename = "$value", default)]
    children: Vec<RelationshipsChildXml>,
}

impl<'de> Deserialize<'de> for Rels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let xml = RelationshipsXml::deserialize(deserializer)?;
        let mut rels = Vec::new();
        for child in xml.children {
            if let RelationshipsChildXml::Relationship(r) = child {
                rels.push((r.rel_type, r.id, r.target));
            }
        }
        Ok(Rels { rels })
    }
}

impl_from_xml_via_quick!(Rels);

/// `_rels/<name>.rels` for a given part path, per the OPC convention the
/// teacher's `find_rels_filename` encodes.
pub fn rels_path_for(part_path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = part_path.as_ref();
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    Some(dir.join("_rels").join(file_name).with_extension(
        format!("{}.rels", path.extension().and_then(|e| e.to_str()).unwrap_or("xml")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FromXML;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml" />
</Relationships>"#;
        let c = Rels::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(
            c.rels,
            vec![(
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties".to_owned(),
                "rId1".to_owned(),
                "docProps/core.xml".to_owned(),
            )]
        );
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("word/document.xml").unwrap(),
            PathBuf::from("word/_rels/document.xml.rels")
        );
    }

    #[test]
    fn test_by_type() {
        let rels = Rels {
            rels: vec![(
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header".to_owned(),
                "rId2".to_owned(),
                "word/header1.xml".to_owned(),
            )],
        };
        assert_eq!(rels.by_type("header").len(), 1);
        assert!(rels.by_id("rId2").is_some());
    }

    #[test]
    fn test_ensure_adds_once_and_build_xml_round_trips() {
        let mut rels = Rels::default();
        rels.ensure("http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles", "styles.xml");
        rels.ensure("http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles", "styles.xml");
        assert_eq!(rels.rels.len(), 1);
        assert_eq!(rels.rels[0].1, "rId1");

        let xml = rels.build_xml();
        let reparsed = Rels::from_xml(&xml).unwrap();
        assert_eq!(reparsed, rels);
    }

    #[test]
    fn test_ensure_picks_next_free_rid() {
        let mut rels = Rels {
            rels: vec![("x".to_string(), "rId3".to_string(), "a.xml".to_string())],
        };
        rels.ensure("y", "b.xml");
        assert_eq!(rels.rels[1].1, "rId4");
    }
}
