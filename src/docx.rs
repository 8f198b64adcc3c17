//! Top-level `.docx` facade, `spec.md` §6.
//!
//! New code: ties this crate's package layer ([`crate::opc`]), part readers
//! ([`crate::reader`]), and typed document model ([`crate::documents`])
//! together the way the separate `docx-rs` top crate does for `docx-core` —
//! that crate was filtered from the retrieved pack, so there is no teacher
//! file for `Docx` itself; it is grounded on `opc::Package`'s
//! open/save/rels contract and on `documents::Document`'s builder surface.

use std::io::{Cursor, Read, Seek, Write};

use crate::documents::core_properties::{AppProperties, CoreProperties};
use crate::documents::header::{Footer, Header};
use crate::documents::numbering::Numbering;
use crate::documents::section_property::SectionProperty;
use crate::documents::style::Styles;
use crate::documents::{Comments, Document, DocumentChild, Paragraph, Table};
use crate::error::ReaderError;
use crate::opc::content_types;
use crate::opc::{Package, Part};
use crate::reader::rels::Rels;
use crate::reader::FromXML;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const COMMENTS_PART: &str = "word/comments.xml";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";
const APP_PROPERTIES_PART: &str = "docProps/app.xml";

const STYLES_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const NUMBERING_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const COMMENTS_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
const CORE_PROPERTIES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const APP_PROPERTIES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// A parsed (or freshly built) `.docx` package: the typed [`Document`] plus
/// every other part as raw bytes, so opening and re-saving a document this
/// crate has no typed model for part of doesn't silently drop content
/// (`spec.md` §3 invariant 1, lifted to the package level).
#[derive(Debug, Clone)]
pub struct Docx {
    pub document: Document,
    pub styles: Option<Styles>,
    pub numbering: Option<Numbering>,
    pub comments: Option<Comments>,
    pub core_properties: Option<CoreProperties>,
    pub app_properties: Option<AppProperties>,
    package: Package,
}

impl Default for Docx {
    fn default() -> Self {
        Self::new()
    }
}

impl Docx {
    pub fn new() -> Self {
        Docx {
            document: Document::new(),
            styles: None,
            numbering: None,
            comments: None,
            core_properties: None,
            app_properties: None,
            package: Package::default(),
        }
    }

    /// `spec.md` §6's `OpenBytes(bytes)`, lifted to the document level.
    pub fn open(bytes: &[u8]) -> Result<Self, ReaderError> {
        Self::open_reader(Cursor::new(bytes))
    }

    /// `spec.md` §6's `OpenReader(readerAt, size)`: parses the package,
    /// then `word/document.xml`, then resolves every header/footer
    /// reference a section property carries into the `Header`/`Footer`
    /// content its target part holds, then loads styles/numbering/comments
    /// (document-relative parts) and core/app properties (package-root
    /// parts) when the package carries them.
    pub fn open_reader<R: Read + Seek>(reader: R) -> Result<Self, ReaderError> {
        let package = Package::open_reader(reader)?;
        let document_part = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| ReaderError::PartNotFound(DOCUMENT_PART.to_string()))?;
        let mut document = Document::from_xml(document_part.blob.as_slice())?;
        let rels = package.part_rels(DOCUMENT_PART)?;

        resolve_section_header_footers(&mut document.section_property, &package, &rels)?;
        for child in &mut document.children {
            if let DocumentChild::Paragraph(p) = child {
                if let Some(sp) = &mut p.property.section_property {
                    resolve_section_header_footers(sp, &package, &rels)?;
                }
            }
        }

        let styles = resolve_part::<Styles>(&package, &rels, STYLES_REL_TYPE)?;
        let numbering = resolve_part::<Numbering>(&package, &rels, NUMBERING_REL_TYPE)?;
        let comments = resolve_part::<Comments>(&package, &rels, COMMENTS_REL_TYPE)?;

        let package_rels = package.rels()?;
        let core_properties = resolve_root_part::<CoreProperties>(&package, &package_rels, CORE_PROPERTIES_REL_TYPE)?;
        let app_properties = resolve_root_part::<AppProperties>(&package, &package_rels, APP_PROPERTIES_REL_TYPE)?;

        Ok(Docx {
            document,
            styles,
            numbering,
            comments,
            core_properties,
            app_properties,
            package,
        })
    }

    /// `spec.md` §6's `Package.Save(writer)`, lifted to the document level:
    /// re-serializes `word/document.xml` and every populated
    /// styles/numbering/comments/core-properties/app-properties field, and
    /// carries every other part through unchanged. Relationship entries are
    /// synthesized via [`Rels::ensure`] for parts that weren't already
    /// linked (e.g. ones added through the builder API on a freshly built
    /// `Docx`), so the saved package round-trips through `open_reader`.
    pub fn save<W: Write + Seek>(&self, writer: W) -> Result<(), ReaderError> {
        let mut package = self.package.clone();
        package.parts.insert(
            DOCUMENT_PART.to_string(),
            Part {
                name: DOCUMENT_PART.to_string(),
                content_type: content_types::MAIN_DOCUMENT.to_string(),
                blob: self.document.build(),
            },
        );

        let mut document_rels = package.part_rels(DOCUMENT_PART)?;
        write_part(&mut package, &mut document_rels, STYLES_PART, content_types::STYLES, STYLES_REL_TYPE, &self.styles);
        write_part(
            &mut package,
            &mut document_rels,
            NUMBERING_PART,
            content_types::NUMBERING,
            NUMBERING_REL_TYPE,
            &self.numbering,
        );
        write_part(
            &mut package,
            &mut document_rels,
            COMMENTS_PART,
            content_types::COMMENTS,
            COMMENTS_REL_TYPE,
            &self.comments,
        );
        package.parts.insert(
            DOCUMENT_RELS_PART.to_string(),
            Part {
                name: DOCUMENT_RELS_PART.to_string(),
                content_type: content_types::RELATIONSHIPS.to_string(),
                blob: document_rels.build_xml(),
            },
        );

        let mut package_rels = package.rels()?;
        write_part(
            &mut package,
            &mut package_rels,
            CORE_PROPERTIES_PART,
            content_types::CORE_PROPERTIES,
            CORE_PROPERTIES_REL_TYPE,
            &self.core_properties,
        );
        write_part(
            &mut package,
            &mut package_rels,
            APP_PROPERTIES_PART,
            content_types::EXTENDED_PROPERTIES,
            APP_PROPERTIES_REL_TYPE,
            &self.app_properties,
        );
        package.parts.insert(
            PACKAGE_RELS_PART.to_string(),
            Part {
                name: PACKAGE_RELS_PART.to_string(),
                content_type: content_types::RELATIONSHIPS.to_string(),
                blob: package_rels.build_xml(),
            },
        );

        package.save(writer)
    }

    pub fn add_paragraph(mut self, p: Paragraph) -> Self {
        self.document = self.document.add_paragraph(p);
        self
    }

    pub fn add_table(mut self, t: Table) -> Self {
        self.document = self.document.add_table(t);
        self
    }

    pub fn styles(mut self, s: Styles) -> Self {
        self.styles = Some(s);
        self
    }

    pub fn numbering(mut self, n: Numbering) -> Self {
        self.numbering = Some(n);
        self
    }

    pub fn comments(mut self, c: Comments) -> Self {
        self.comments = Some(c);
        self
    }

    pub fn core_properties(mut self, c: CoreProperties) -> Self {
        self.core_properties = Some(c);
        self
    }

    pub fn app_properties(mut self, a: AppProperties) -> Self {
        self.app_properties = Some(a);
        self
    }

    /// `spec.md` §4.2's `ReplaceText(old, new)`, applied to every paragraph
    /// in the body, including ones nested inside tables. Returns the total
    /// number of replacements performed.
    pub fn replace_text(&mut self, old: &str, new: &str) -> usize {
        crate::text::replace_text_in_document(&mut self.document, old, new)
    }
}

/// Looks up `rel_type` in `rels`, then loads and parses the target part if
/// both the relationship and the part exist. Returns `Ok(None)` rather than
/// an error when either is missing: not every document carries every
/// optional part. `target` is resolved relative to `word/`, matching
/// `document.xml`'s own relationships.
fn resolve_part<T: FromXML>(package: &Package, rels: &Rels, rel_type: &str) -> Result<Option<T>, ReaderError> {
    let Some((_, _, target)) = rels.by_type(rel_type).into_iter().next() else {
        return Ok(None);
    };
    match package.part(&normalize_target(target)) {
        Some(part) => Ok(Some(T::from_xml(part.blob.as_slice())?)),
        None => Ok(None),
    }
}

/// Like [`resolve_part`] but for package-root relationships (`_rels/.rels`),
/// whose targets are already package-root-relative (e.g. `docProps/core.xml`)
/// rather than relative to `word/`.
fn resolve_root_part<T: FromXML>(package: &Package, rels: &Rels, rel_type: &str) -> Result<Option<T>, ReaderError> {
    let Some((_, _, target)) = rels.by_type(rel_type).into_iter().next() else {
        return Ok(None);
    };
    match package.part(target.trim_start_matches('/')) {
        Some(part) => Ok(Some(T::from_xml(part.blob.as_slice())?)),
        None => Ok(None),
    }
}

/// Serializes `value` into `package` at `part_name` under `content_type`,
/// and registers a relationship for it in `rels` if one isn't already
/// present.
fn write_part<T: crate::documents::BuildXML>(
    package: &mut Package,
    rels: &mut Rels,
    part_name: &str,
    content_type: &str,
    rel_type: &str,
    value: &Option<T>,
) {
    let Some(value) = value else { return };
    package.parts.insert(
        part_name.to_string(),
        Part {
            name: part_name.to_string(),
            content_type: content_type.to_string(),
            blob: value.build(),
        },
    );
    let target = part_name
        .rsplit_once('/')
        .map(|(_, file)| file.to_string())
        .unwrap_or_else(|| part_name.to_string());
    let target = if part_name.starts_with("docProps/") {
        format!("docProps/{target}")
    } else {
        target
    };
    rels.ensure(rel_type, &target);
}

fn normalize_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("word/{target}"),
    }
}

fn resolve_header(package: &Package, rels: &Rels, rid: &str) -> Result<Option<Header>, ReaderError> {
    let Some((_, _, target)) = rels.by_id(rid) else {
        return Ok(None);
    };
    match package.part(&normalize_target(target)) {
        Some(part) => Ok(Some(Header::from_xml(part.blob.as_slice())?)),
        None => Ok(None),
    }
}

fn resolve_footer(package: &Package, rels: &Rels, rid: &str) -> Result<Option<Footer>, ReaderError> {
    let Some((_, _, target)) = rels.by_id(rid) else {
        return Ok(None);
    };
    match package.part(&normalize_target(target)) {
        Some(part) => Ok(Some(Footer::from_xml(part.blob.as_slice())?)),
        None => Ok(None),
    }
}

/// Fills in `SectionProperty`'s `header`/`footer` content fields from the
/// `headerReference`/`footerReference` rIds a freshly-deserialized section
/// property only carries as bare rIds (`documents::section_property` has no
/// package access of its own to do this itself).
fn resolve_section_header_footers(sp: &mut SectionProperty, package: &Package, rels: &Rels) -> Result<(), ReaderError> {
    if let Some(r) = sp.header_reference.clone() {
        if let Some(h) = resolve_header(package, rels, &r.rid)? {
            sp.header = Some((r.rid, h));
        }
    }
    if let Some(r) = sp.first_header_reference.clone() {
        if let Some(h) = resolve_header(package, rels, &r.rid)? {
            sp.first_header = Some((r.rid, h));
        }
    }
    if let Some(r) = sp.even_header_reference.clone() {
        if let Some(h) = resolve_header(package, rels, &r.rid)? {
            sp.even_header = Some((r.rid, h));
        }
    }
    if let Some(r) = sp.footer_reference.clone() {
        if let Some(f) = resolve_footer(package, rels, &r.rid)? {
            sp.footer = Some((r.rid, f));
        }
    }
    if let Some(r) = sp.first_footer_reference.clone() {
        if let Some(f) = resolve_footer(package, rels, &r.rid)? {
            sp.first_footer = Some((r.rid, f));
        }
    }
    if let Some(r) = sp.even_footer_reference.clone() {
        if let Some(f) = resolve_footer(package, rels, &r.rid)? {
            sp.even_footer = Some((r.rid, f));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::run::Run;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn save_and_reopen(docx: &Docx) -> Docx {
        let mut buf = Cursor::new(Vec::new());
        docx.save(&mut buf).unwrap();
        buf.set_position(0);
        Docx::open_reader(buf).unwrap()
    }

    #[test]
    fn test_new_docx_round_trips_through_save_and_open() {
        let docx = Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("hello")));
        let reopened = save_and_reopen(&docx);
        assert_eq!(reopened.document.children.len(), 1);
        match &reopened.document.children[0] {
            DocumentChild::Paragraph(p) => assert_eq!(p.plain_text(), "hello"),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_replace_text_across_document() {
        let mut docx = Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Hello, world")));
        let n = docx.replace_text("world", "Rust");
        assert_eq!(n, 1);
        match &docx.document.children[0] {
            DocumentChild::Paragraph(p) => assert_eq!(p.plain_text(), "Hello, Rust"),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_target_handles_relative_and_absolute() {
        assert_eq!(normalize_target("header1.xml"), "word/header1.xml");
        assert_eq!(normalize_target("/word/header1.xml"), "word/header1.xml");
    }

    #[test]
    fn test_styles_numbering_comments_core_properties_round_trip() {
        use crate::documents::comments::{Comment, Comments};
        use crate::documents::core_properties::CoreProperties;
        use crate::documents::numbering::{AbstractNum, Level, Num, Numbering};
        use crate::documents::style::{Style, Styles};
        use crate::types::StyleType;

        let docx = Docx::new()
            .styles(Styles::new().add_style(Style::new("Normal", StyleType::Paragraph).name("Normal")))
            .numbering(
                Numbering::new()
                    .add_abstract_num(AbstractNum::new(0).add_level(Level::new(0, 1, "bullet", "\u{f0b7}", "left")))
                    .add_num(Num::new(1, 0)),
            )
            .comments(Comments::new().add_comment(Comment::new(0).author("Jane")))
            .core_properties(CoreProperties::new().title("Report"));

        let reopened = save_and_reopen(&docx);
        assert_eq!(reopened.styles.unwrap().find("Normal").unwrap().name.as_deref(), Some("Normal"));
        assert!(reopened.numbering.unwrap().abstract_num_for(1).is_some());
        assert_eq!(reopened.comments.unwrap().find(0).unwrap().author.as_deref(), Some("Jane"));
        assert_eq!(reopened.core_properties.unwrap().title.as_deref(), Some("Report"));
    }
}
